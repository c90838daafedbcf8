use std::collections::HashMap;

use crate::ast::{Chart, Entity};
use crate::config::Sizes;
use crate::metrics::TextMeasure;
use crate::theme::Theme;

use super::text::{self, LabelOptions, LabelSource};
use super::types::{Element, Group, Shape, Style, TextAnchor};

/// Arc color defaults an entity imposes on the arcs it participates in.
#[derive(Debug, Clone, Default)]
pub struct ArcColors {
    pub line: Option<String>,
    pub text: Option<String>,
    pub text_bg: Option<String>,
}

/// Horizontal placement of the chart's entities, fixed before any row
/// is laid out.
#[derive(Debug, Default)]
pub struct EntityColumns {
    centers: HashMap<String, f32>,
    arc_colors: HashMap<String, ArcColors>,
    /// First x past the last column; every full-width element spans
    /// up to here.
    pub x_hwm: f32,
    /// Header row height, raised to fit the tallest entity label.
    pub entity_height: f32,
}

impl EntityColumns {
    pub fn center(&self, name: &str) -> Option<f32> {
        self.centers.get(name).copied()
    }

    pub fn arc_colors(&self, name: &str) -> Option<&ArcColors> {
        self.arc_colors.get(name)
    }
}

fn entity_label_lines(
    entity: &Entity,
    sizes: &Sizes,
    metrics: &dyn TextMeasure,
    font_size: f32,
) -> Vec<String> {
    text::split_label(
        entity.display_label(),
        LabelSource::Entity,
        sizes.entity_width,
        sizes.word_wrap_arcs,
        metrics,
        font_size,
    )
}

/// Assigns every entity a column and builds the header box groups.
/// Column i is centered at `i * spacing + entity_width / 2`.
pub fn assign_columns(
    chart: &Chart,
    theme: &Theme,
    sizes: &Sizes,
    metrics: &dyn TextMeasure,
) -> (EntityColumns, Vec<Group>) {
    let mut columns = EntityColumns::default();
    let text_height = metrics.text_height(theme.font_size);
    let lw = sizes.line_width;

    // The line-width margin is added after the high-water mark, so
    // even the default-height box grows by it.
    let mut tallest = sizes.entity_height;
    let mut labels = Vec::with_capacity(chart.entities.len());
    for entity in &chart.entities {
        let lines = entity_label_lines(entity, sizes, metrics, theme.font_size);
        let block = lines.len() as f32 * (text_height + 1.0);
        tallest = tallest.max(block);
        labels.push(lines);
    }
    let tallest = tallest + 2.0 * lw;
    columns.entity_height = tallest;

    let mut groups = Vec::with_capacity(chart.entities.len());
    for (i, entity) in chart.entities.iter().enumerate() {
        let x = i as f32 * sizes.inter_entity_spacing;
        columns
            .centers
            .insert(entity.name.clone(), x + sizes.entity_width / 2.0);
        columns.arc_colors.insert(
            entity.name.clone(),
            ArcColors {
                line: entity.arclinecolor.clone(),
                text: entity.arctextcolor.clone(),
                text_bg: entity.arctextbgcolor.clone(),
            },
        );

        let mut group = Group::new();
        let mut rect = Element::new(
            Shape::Rect {
                x,
                y: 0.0,
                width: sizes.entity_width,
                height: tallest,
                rx: 0.0,
                ry: 0.0,
            },
            "entity",
        );
        rect.style = Style {
            line_color: entity.linecolor.clone(),
            text_color: None,
            fill_color: entity.textbgcolor.clone(),
        };
        group.push(rect);
        group.append(text::create_label(
            &labels[i],
            LabelOptions {
                start_x: x,
                start_y: tallest / 2.0,
                width: sizes.entity_width,
                anchor: TextAnchor::Middle,
                class: "entity-text",
                style: Style {
                    line_color: None,
                    text_color: entity.textcolor.clone(),
                    fill_color: None,
                },
                url: entity.url.clone(),
                id: entity.id.clone(),
                idurl: entity.idurl.clone(),
                textbg: None,
            },
            theme,
            metrics,
        ));
        groups.push(group);
    }

    columns.x_hwm = chart.entities.len() as f32 * sizes.inter_entity_spacing;
    (columns, groups)
}
