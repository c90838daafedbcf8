use crate::ast::Arc;

use super::error::LayoutError;
use super::kind::{self, AggregateKind};
use super::text::{self, LabelOptions, LabelSource};
use super::types::{
    Element, Group, LifelineRow, Placed, Shape, Style, TextAnchor,
};
use super::{spans::PendingSpan, LayoutContext};

/// Everything the row pass produces. Inline expression boxes are not
/// here: they stay pending until every row height is final.
#[derive(Debug, Default)]
pub struct RowArtifacts {
    pub sequence: Vec<Placed>,
    pub notes: Vec<Placed>,
    pub lifelines: Vec<LifelineRow>,
}

fn center(ctx: &LayoutContext, name: &str) -> Result<f32, LayoutError> {
    ctx.columns
        .center(name)
        .ok_or_else(|| LayoutError::UnknownEntity {
            name: name.to_owned(),
        })
}

/// Arc colors resolved against the from-entity's arc color defaults.
struct ArcStyle {
    line: Option<String>,
    text: Option<String>,
    text_bg: Option<String>,
}

fn effective_style(ctx: &LayoutContext, arc: &Arc) -> ArcStyle {
    let defaults = arc
        .from
        .as_deref()
        .and_then(|name| ctx.columns.arc_colors(name));
    let inherit = |own: &Option<String>, entity: Option<&String>| {
        own.clone().or_else(|| entity.cloned())
    };
    ArcStyle {
        line: inherit(&arc.linecolor, defaults.and_then(|d| d.line.as_ref())),
        text: inherit(&arc.textcolor, defaults.and_then(|d| d.text.as_ref())),
        text_bg: inherit(&arc.textbgcolor, defaults.and_then(|d| d.text_bg.as_ref())),
    }
}

/// Full drawable width of the chart, used by elements that span every
/// column.
fn full_width(ctx: &LayoutContext) -> f32 {
    ctx.columns.x_hwm - ctx.sizes.inter_entity_spacing + ctx.sizes.entity_width
}

struct LabelSpec<'a> {
    label: &'a str,
    start_x: f32,
    start_y: f32,
    width: f32,
    anchor: TextAnchor,
}

fn label_group(ctx: &LayoutContext, arc: &Arc, style: &ArcStyle, spec: LabelSpec<'_>) -> Group {
    if spec.label.is_empty() {
        return Group::new();
    }
    let lines = text::split_label(
        spec.label,
        LabelSource::Arc(arc),
        spec.width,
        ctx.sizes.word_wrap_arcs,
        ctx.metrics,
        ctx.theme.font_size,
    );
    text::create_label(
        &lines,
        LabelOptions {
            start_x: spec.start_x,
            start_y: spec.start_y,
            width: spec.width,
            anchor: spec.anchor,
            class: "label",
            style: Style {
                line_color: None,
                text_color: style.text.clone(),
                fill_color: None,
            },
            url: arc.url.clone(),
            id: arc.id.clone(),
            idurl: arc.idurl.clone(),
            textbg: style.text_bg.clone(),
        },
        ctx.theme,
        ctx.metrics,
    )
}

/// `...`, `|||` and `---`: rows without a message. The first two are a
/// centered label over the gap; `---` adds a comment line, spanning
/// either its two entities or the whole chart.
fn empty_arc(ctx: &LayoutContext, arc: &Arc) -> Result<Group, LayoutError> {
    let style = effective_style(ctx, arc);
    let span = match (arc.from.as_deref(), arc.to.as_deref()) {
        (Some(from), Some(to)) => {
            let a = center(ctx, from)?;
            let b = center(ctx, to)?;
            Some((a.min(b), a.max(b)))
        }
        _ => None,
    };
    let (label_start, label_width) = match span {
        Some((lo, hi)) => (lo, hi - lo),
        None => (0.0, full_width(ctx)),
    };

    let mut group = Group::new();
    if arc.kind == "---" {
        let spacing = ctx.sizes.inter_entity_spacing;
        let lw = ctx.sizes.line_width;
        let (x1, x2, class) = match span {
            Some((lo, hi)) => {
                let corr = ctx.max_depth.saturating_sub(arc.depth) as f32 * 2.0 * lw;
                (
                    lo - (spacing + 2.0 * lw) / 2.0 - corr,
                    hi + (spacing + 2.0 * lw) / 2.0 + corr,
                    "striped",
                )
            }
            None => (0.0, full_width(ctx), "dotted"),
        };
        let mut line = Element::new(
            Shape::Line {
                x1,
                y1: 0.0,
                x2,
                y2: 0.0,
                double: false,
            },
            class,
        );
        line.style.line_color = style.line.clone();
        group.push(line);
    }
    if let Some(label) = arc.label.as_deref() {
        group.append(label_group(
            ctx,
            arc,
            &style,
            LabelSpec {
                label,
                start_x: label_start,
                start_y: 0.0,
                width: label_width,
                anchor: TextAnchor::Middle,
            },
        ));
    }
    Ok(group)
}

fn box_shape(arc: &Arc, ctx: &LayoutContext, start: f32, width: f32, height: f32) -> Shape {
    match arc.kind.as_str() {
        "rbox" => Shape::Rect {
            x: start,
            y: -height / 2.0,
            width,
            height,
            rx: ctx.config.rbox_corner_radius,
            ry: ctx.config.rbox_corner_radius,
        },
        "abox" => Shape::ABox {
            x: start,
            y: 0.0,
            width,
            height,
        },
        "note" => Shape::Note {
            x: start,
            y: -height / 2.0,
            width,
            height,
            fold: ctx.config.note_fold_size,
        },
        _ => Shape::Rect {
            x: start,
            y: -height / 2.0,
            width,
            height,
            rx: 0.0,
            ry: 0.0,
        },
    }
}

/// `box`, `rbox`, `abox`, `note`: a shape between two columns, sized to
/// its wrapped label but never below the row height.
fn box_arc(ctx: &LayoutContext, arc: &Arc, from: &str, to: &str) -> Result<Group, LayoutError> {
    let style = effective_style(ctx, arc);
    let a = center(ctx, from)?;
    let b = center(ctx, to)?;
    let (lo, hi) = (a.min(b), a.max(b));
    let spacing = ctx.sizes.inter_entity_spacing;
    let lw = ctx.sizes.line_width;

    let width = (hi - lo) + spacing - 2.0 * lw;
    let start = lo - (spacing - 2.0 * lw) / 2.0;

    let label = label_group(
        ctx,
        arc,
        &style,
        LabelSpec {
            label: arc.label.as_deref().unwrap_or(""),
            start_x: start,
            start_y: 0.0,
            width,
            anchor: TextAnchor::Middle,
        },
    );
    let label_height = label.bbox(ctx.metrics).height;
    let height = (label_height + 2.0 * lw).max(ctx.sizes.arc_row_height - 2.0 * lw);

    let mut shape = Element::new(box_shape(arc, ctx, start, width, height), "box");
    shape.style = Style {
        line_color: style.line.clone(),
        text_color: None,
        fill_color: style.text_bg.clone(),
    };

    let mut group = Group::new();
    group.push(shape);
    group.append(label);
    Ok(group)
}

/// First stage of inline expression layout: the folded tag carrying the
/// kind (and label) in the expression's own row. The enclosing box is
/// registered as pending and resolved after the last row.
fn inline_expression(
    ctx: &LayoutContext,
    arc: &Arc,
    from: &str,
    to: &str,
    row: usize,
) -> Result<(Group, PendingSpan), LayoutError> {
    let style = effective_style(ctx, arc);
    let a = center(ctx, from)?;
    let b = center(ctx, to)?;
    let (lo, hi) = (a.min(b), a.max(b));
    let spacing = ctx.sizes.inter_entity_spacing;
    let lw = ctx.sizes.line_width;
    let fold = ctx.config.label_fold_size;
    let depth_corr = ctx.max_depth.saturating_sub(arc.depth) as f32 * 2.0 * lw;

    let max_width = (hi - lo) + (spacing - 2.0 * lw) - fold - lw;
    let start = lo - (spacing - 3.0 * lw) / 2.0 - depth_corr;

    let tag_text = match arc.label.as_deref() {
        Some(label) if !label.is_empty() => format!("{}: {}", arc.kind, label),
        _ => arc.kind.clone(),
    };
    let label = label_group(
        ctx,
        arc,
        &style,
        LabelSpec {
            label: &tag_text,
            start_x: start + lw - max_width / 2.0,
            start_y: ctx.sizes.arc_row_height / 4.0,
            width: max_width,
            anchor: TextAnchor::Start,
        },
    );
    let bbox = label.bbox(ctx.metrics);
    let tag_height = (bbox.height + 2.0 * lw).max(ctx.sizes.arc_row_height / 2.0 - 2.0 * lw);
    let tag_width = (bbox.width + 2.0 * lw).min(max_width);

    let mut tag = Element::new(
        Shape::EdgeRemark {
            x: start,
            y: 0.0,
            width: tag_width - lw + fold,
            height: tag_height,
            fold,
        },
        "box",
    );
    tag.style = Style {
        line_color: style.line.clone(),
        text_color: None,
        fill_color: style.text_bg.clone(),
    };

    let mut group = Group::new();
    group.push(tag);
    group.append(label);

    let box_width = (hi - lo) + spacing - 2.0 * lw;
    let box_start = lo - (spacing - 2.0 * lw) / 2.0;
    let span = PendingSpan {
        row,
        numberofrows: arc.numberofrows.unwrap_or(0),
        start_x: box_start - depth_corr,
        width: box_width + 2.0 * depth_corr,
        linecolor: style.line,
        textbgcolor: style.text_bg,
    };
    Ok((group, span))
}

/// A message line between two columns, or the u-turn loop when both
/// ends are the same entity. `label` is handed in separately so the
/// broadcast fan-out can suppress it on the individual segments.
fn line_arc(
    ctx: &LayoutContext,
    arc: &Arc,
    x_from: f32,
    x_to: f32,
    label: Option<&str>,
) -> Group {
    let style = effective_style(ctx, arc);
    let spacing = ctx.sizes.inter_entity_spacing;
    let row_height = ctx.sizes.arc_row_height;
    let class = kind::style_class(&arc.kind);
    let double = kind::is_double_line(&arc.kind);

    let mut x_to = x_to;
    if kind::is_lost_message(&arc.kind) {
        x_to = x_from + (x_to - x_from) * 3.0 / 4.0;
    }

    let mut gradient = ctx.sizes.arc_gradient;
    let mut y_to = 0.0;
    if let Some(skip) = arc.arcskip {
        y_to = skip * row_height;
        gradient = y_to;
    }

    // Single-line labels get a trailing break so the text sits above
    // the line instead of on it.
    let label = label.map(|l| {
        if !l.is_empty() && !l.contains("\\n") {
            format!("{l}\\n")
        } else {
            l.to_owned()
        }
    });

    let mut group = Group::new();
    if x_from == x_to {
        let height = 2.0 * (row_height / 5.0);
        let width = spacing / 3.0;
        if double {
            group.push(Element::new(
                Shape::UTurn {
                    x: x_from,
                    y1: (height - 4.0) / 2.0,
                    y2: y_to - 2.0 + height,
                    width: width - 4.0,
                },
                class,
            ));
            group.push(Element::new(
                Shape::UTurn {
                    x: x_from,
                    y1: (height + 4.0) / 2.0,
                    y2: y_to + 6.0 + height,
                    width,
                },
                class,
            ));
        } else {
            group.push(Element::new(
                Shape::UTurn {
                    x: x_from,
                    y1: height / 2.0,
                    y2: y_to + height,
                    width,
                },
                class,
            ));
        }
        for element in &mut group.elements {
            element.style.line_color = style.line.clone();
        }
        if let Some(label) = label.as_deref() {
            group.append(label_group(
                ctx,
                arc,
                &style,
                LabelSpec {
                    label,
                    start_x: x_from + 2.0 - spacing / 2.0,
                    start_y: -row_height / 5.0,
                    width: spacing,
                    anchor: TextAnchor::Start,
                },
            ));
        }
    } else {
        let mut line = Element::new(
            Shape::Line {
                x1: x_from,
                y1: 0.0,
                x2: x_to,
                y2: gradient,
                double,
            },
            class,
        );
        line.style.line_color = style.line.clone();
        group.push(line);
        if let Some(label) = label.as_deref() {
            group.append(label_group(
                ctx,
                arc,
                &style,
                LabelSpec {
                    label,
                    start_x: x_from,
                    start_y: 0.0,
                    width: x_to - x_from,
                    anchor: TextAnchor::Middle,
                },
            ));
        }
    }
    group
}

/// `a -> *`: one label-less segment to every other entity, plus a
/// single label spanning the whole chart just above the row center.
fn broadcast(
    ctx: &LayoutContext,
    arc: &Arc,
    from: &str,
) -> Result<Vec<Group>, LayoutError> {
    let x_from = center(ctx, from)?;
    let mut groups = Vec::new();
    for entity in &ctx.chart.entities {
        if entity.name == from {
            continue;
        }
        let x_to = center(ctx, &entity.name)?;
        groups.push(line_arc(ctx, arc, x_from, x_to, None));
    }
    if let Some(label) = arc.label.as_deref() {
        let style = effective_style(ctx, arc);
        let lw = ctx.sizes.line_width;
        groups.push(label_group(
            ctx,
            arc,
            &style,
            LabelSpec {
                label,
                start_x: 0.0,
                start_y: -ctx.text_height / 2.0 - lw,
                width: full_width(ctx),
                anchor: TextAnchor::Middle,
            },
        ));
    }
    Ok(groups)
}

fn lifeline_row(ctx: &LayoutContext, y: f32, height: f32, omitted: bool) -> LifelineRow {
    let height = height.max(ctx.sizes.arc_row_height);
    let mut lines = Vec::with_capacity(ctx.chart.entities.len());
    let mut x = ctx.sizes.entity_width / 2.0;
    for entity in &ctx.chart.entities {
        let mut line = Element::new(
            Shape::Line {
                x1: x,
                y1: -height / 2.0,
                x2: x,
                y2: height / 2.0,
                double: false,
            },
            "lifeline",
        );
        line.style.line_color = entity.linecolor.clone();
        lines.push(line);
        x += ctx.sizes.inter_entity_spacing;
    }
    LifelineRow {
        y,
        height,
        omitted,
        lines,
    }
}

enum Layer {
    Sequence,
    Notes,
}

/// Lays the chart's rows out top to bottom. Every group is built in
/// row-local coordinates; the ledger's resolved y anchors it afterwards.
pub fn build_rows(ctx: &mut LayoutContext) -> Result<RowArtifacts, LayoutError> {
    let mut out = RowArtifacts::default();
    let lw = ctx.sizes.line_width;

    // Lifeline band between the entity headers and the first row.
    let lead = ctx.rows.get(-1);
    out.lifelines
        .push(lifeline_row(ctx, lead.y, ctx.sizes.arc_row_height, false));

    ctx.rows.clear();
    for (row_index, row) in ctx.chart.rows.iter().enumerate() {
        ctx.rows.set(row_index, None, None);
        let mut omit = false;
        let mut groups: Vec<(Layer, Group)> = Vec::new();

        for arc in row {
            match kind::classify(&arc.kind) {
                Some(AggregateKind::EmptyArc) => {
                    omit = arc.kind == "...";
                    groups.push((Layer::Sequence, empty_arc(ctx, arc)?));
                }
                Some(AggregateKind::Box) => {
                    if let (Some(from), Some(to)) = (arc.from.as_deref(), arc.to.as_deref()) {
                        groups.push((Layer::Notes, box_arc(ctx, arc, from, to)?));
                    }
                }
                Some(AggregateKind::InlineExpression) => {
                    if let (Some(from), Some(to)) = (arc.from.as_deref(), arc.to.as_deref()) {
                        let (group, span) = inline_expression(ctx, arc, from, to, row_index)?;
                        groups.push((Layer::Notes, group));
                        ctx.pending.push(span);
                    }
                }
                _ => {
                    let (Some(from), Some(to)) = (arc.from.as_deref(), arc.to.as_deref()) else {
                        continue;
                    };
                    if arc.is_broadcast() {
                        for group in broadcast(ctx, arc, from)? {
                            groups.push((Layer::Sequence, group));
                        }
                    } else {
                        let x_from = center(ctx, from)?;
                        let x_to = center(ctx, to)?;
                        groups.push((
                            Layer::Sequence,
                            line_arc(ctx, arc, x_from, x_to, arc.label.as_deref()),
                        ));
                    }
                }
            }
        }

        for (_, group) in &groups {
            if !group.is_empty() {
                let bbox = group.bbox(ctx.metrics);
                ctx.rows.raise(row_index, bbox.height + 2.0 * lw);
            }
        }

        let info = ctx.rows.get(row_index as isize);
        out.lifelines
            .push(lifeline_row(ctx, info.y, info.height, omit));
        for (layer, group) in groups {
            let placed = Placed { y: info.y, group };
            match layer {
                Layer::Sequence => out.sequence.push(placed),
                Layer::Notes => out.notes.push(placed),
            }
        }
    }
    Ok(out)
}
