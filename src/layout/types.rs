use serde::Serialize;

use crate::metrics::TextMeasure;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BBox {
    pub fn union(self, other: BBox) -> BBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        BBox {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAnchor {
    Middle,
    Start,
}

/// Geometry primitives the rendering backend knows how to draw. All
/// coordinates inside a row group are row-local: y 0 is the vertical
/// center of the row, and [`Placed`] carries the row anchor.
#[derive(Debug, Clone, Serialize)]
pub enum Shape {
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        double: bool,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rx: f32,
        ry: f32,
    },
    /// Angular box with slanted left/right edges.
    ABox {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Note rectangle with a folded top-right corner.
    Note {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fold: f32,
    },
    /// Folded tab hugging the left edge of an inline expression.
    EdgeRemark {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fold: f32,
    },
    /// Self-reference loop: out from (x, y1), around to the right over
    /// `width`, back in at (x, y2).
    UTurn {
        x: f32,
        y1: f32,
        y2: f32,
        width: f32,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        anchor: TextAnchor,
    },
}

impl Shape {
    pub fn bbox(&self, metrics: &dyn TextMeasure) -> BBox {
        match self {
            Shape::Line { x1, y1, x2, y2, .. } => BBox {
                x: x1.min(*x2),
                y: y1.min(*y2),
                width: (x2 - x1).abs(),
                height: (y2 - y1).abs(),
            },
            Shape::Rect {
                x,
                y,
                width,
                height,
                ..
            }
            | Shape::ABox {
                x,
                y,
                width,
                height,
            }
            | Shape::Note {
                x,
                y,
                width,
                height,
                ..
            }
            | Shape::EdgeRemark {
                x,
                y,
                width,
                height,
                ..
            } => BBox {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            },
            Shape::UTurn { x, y1, y2, width } => BBox {
                x: *x,
                y: y1.min(*y2),
                width: *width,
                height: (y2 - y1).abs(),
            },
            Shape::Text {
                x,
                y,
                text,
                font_size,
                anchor,
            } => {
                let width = metrics.text_width(text, *font_size);
                let height = metrics.text_height(*font_size);
                let x = match anchor {
                    TextAnchor::Middle => x - width / 2.0,
                    TextAnchor::Start => *x,
                };
                BBox {
                    x,
                    y: y - height / 2.0,
                    width,
                    height,
                }
            }
        }
    }
}

/// Visual attribute overrides; `None` means the css class decides.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Style {
    pub line_color: Option<String>,
    pub text_color: Option<String>,
    pub fill_color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Element {
    pub shape: Shape,
    pub class: String,
    pub style: Style,
    pub url: Option<String>,
    pub id: Option<String>,
    pub idurl: Option<String>,
}

impl Element {
    pub fn new(shape: Shape, class: &str) -> Self {
        Self {
            shape,
            class: class.to_string(),
            style: Style::default(),
            url: None,
            id: None,
            idurl: None,
        }
    }

    pub fn bbox(&self, metrics: &dyn TextMeasure) -> BBox {
        self.shape.bbox(metrics)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Group {
    pub elements: Vec<Element>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn append(&mut self, mut other: Group) {
        self.elements.append(&mut other.elements);
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn bbox(&self, metrics: &dyn TextMeasure) -> BBox {
        let mut iter = self.elements.iter();
        let Some(first) = iter.next() else {
            return BBox::default();
        };
        iter.fold(first.bbox(metrics), |acc, element| {
            acc.union(element.bbox(metrics))
        })
    }
}

/// A group anchored at an absolute y (usually a resolved row center).
#[derive(Debug, Clone, Serialize)]
pub struct Placed {
    pub y: f32,
    pub group: Group,
}

/// Lifeline band for one row: a vertical segment per entity, centered
/// on the row. Omitted rows (`...`) get a broken line style.
#[derive(Debug, Clone, Serialize)]
pub struct LifelineRow {
    pub y: f32,
    pub height: f32,
    pub omitted: bool,
    pub lines: Vec<Element>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Watermark {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub horizontal_transform: f32,
    pub vertical_transform: f32,
    pub watermark: Option<Watermark>,
}

/// The resolved layout. Field order is draw order: background first,
/// then lifelines, then entities and arcs, then note boxes, then
/// inline-expression span boxes on top.
#[derive(Debug, Clone, Serialize)]
pub struct ChartLayout {
    pub canvas: Canvas,
    pub background: Vec<Element>,
    pub lifelines: Vec<LifelineRow>,
    pub entities: Vec<Group>,
    pub sequence: Vec<Placed>,
    pub notes: Vec<Placed>,
    pub spans: Vec<Placed>,
}
