use crate::ast::Arc;
use crate::metrics::TextMeasure;
use crate::theme::Theme;

use super::kind::{self, AggregateKind};
use super::types::{Element, Group, Shape, Style, TextAnchor};

/// Where a label is coming from. Label handling differs slightly between
/// the chart surfaces: entity headers always wrap, arc labels only wrap
/// when the chart asks for it.
#[derive(Debug, Clone, Copy)]
pub enum LabelSource<'a> {
    Entity,
    Arc(&'a Arc),
}

/// Undoes the escaping the parser leaves in label text.
pub fn unescape(label: &str) -> String {
    label.replace("\\\"", "\"")
}

fn hard_lines(label: &str) -> Vec<String> {
    label.split("\\n").map(str::to_owned).collect()
}

/// Greedy word-packing of one line into chunks of at most `max_chars`
/// characters. Words longer than the budget are emitted whole.
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    out.push(current);
    out
}

/// Wraps on explicit `\n` breaks first, then packs each piece to the
/// character budget. Re-running the result through the same budget is a
/// no-op.
pub fn wrap(label: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for line in hard_lines(label) {
        lines.extend(wrap_line(&line, max_chars.max(1)));
    }
    lines
}

fn should_wrap(source: LabelSource, word_wrap_arcs: bool) -> bool {
    match source {
        LabelSource::Entity => true,
        LabelSource::Arc(arc) => {
            kind::classify(&arc.kind) == Some(AggregateKind::Box) || word_wrap_arcs
        }
    }
}

/// Splits a label into display lines for a surface `width` pixels wide.
pub fn split_label(
    label: &str,
    source: LabelSource,
    width: f32,
    word_wrap_arcs: bool,
    metrics: &dyn TextMeasure,
    font_size: f32,
) -> Vec<String> {
    let label = unescape(label);
    if should_wrap(source, word_wrap_arcs) {
        let max_chars = metrics.max_chars_for_width(width.abs(), font_size);
        wrap(&label, max_chars)
    } else {
        hard_lines(&label)
    }
}

pub struct LabelOptions<'a> {
    pub start_x: f32,
    pub start_y: f32,
    pub width: f32,
    pub anchor: TextAnchor,
    pub class: &'a str,
    pub style: Style,
    pub url: Option<String>,
    pub id: Option<String>,
    pub idurl: Option<String>,
    pub textbg: Option<String>,
}

/// Lays out a multi-line label as a vertically centered stack of text
/// elements, with optional per-line background rectangles. The first
/// line carries the id anchor; links without an explicit text color get
/// the theme link color.
pub fn create_label(
    lines: &[String],
    opts: LabelOptions<'_>,
    theme: &Theme,
    metrics: &dyn TextMeasure,
) -> Group {
    let mut group = Group::default();
    if lines.is_empty() {
        return group;
    }
    let font_size = theme.font_size;
    let text_height = metrics.text_height(font_size);
    let middle = opts.start_x + opts.width / 2.0;
    let count = lines.len() as f32;

    let mut style = opts.style.clone();
    if opts.url.is_some() && style.text_color.is_none() {
        style.text_color = Some(theme.link_color.clone());
    }

    for (i, line) in lines.iter().enumerate() {
        let y = opts.start_y - (count - 1.0) * (text_height + 1.0) / 2.0
            + text_height / 4.0
            + i as f32 * (text_height + 1.0);
        // Start-anchored text still begins at the computed middle; the
        // anchor only changes which side of that x the glyphs land on.
        let shape = Shape::Text {
            x: middle,
            y,
            text: line.clone(),
            font_size,
            anchor: opts.anchor,
        };
        // Every line gets a backing rect; it only picks up a fill when
        // the arc or entity sets textbgcolor.
        let bbox = shape.bbox(metrics);
        let mut rect = Element::new(
            Shape::Rect {
                x: bbox.x,
                y: bbox.y,
                width: bbox.width,
                height: bbox.height,
                rx: 0.0,
                ry: 0.0,
            },
            "label-text-background",
        );
        rect.style.fill_color = opts.textbg.clone();
        group.push(rect);
        let mut element = Element::new(shape, opts.class);
        element.style = style.clone();
        element.url = opts.url.clone();
        if i == 0 {
            element.id = opts.id.clone();
            element.idurl = opts.idurl.clone();
        }
        group.push(element);
    }
    group
}
