use super::error::LayoutError;
use super::rows::RowLedger;
use super::types::{Element, Group, Placed, Shape, Style};

/// An inline expression whose enclosing box cannot be emitted until the
/// rows it spans have all been laid out.
#[derive(Debug, Clone)]
pub struct PendingSpan {
    pub row: usize,
    pub numberofrows: usize,
    pub start_x: f32,
    pub width: f32,
    pub linecolor: Option<String>,
    pub textbgcolor: Option<String>,
}

/// Second stage of inline expression layout. Each pending span becomes
/// one box stretching from the top edge of its own row to the top edge
/// of the row just past its span.
pub fn resolve(
    pending: &[PendingSpan],
    rows: &RowLedger,
    row_count: usize,
) -> Result<Vec<Placed>, LayoutError> {
    let mut placed = Vec::with_capacity(pending.len());
    for span in pending {
        if span.row + span.numberofrows >= row_count {
            return Err(LayoutError::SpanPastEnd {
                row: span.row,
                declared: span.numberofrows,
                available: row_count - span.row - 1,
            });
        }
        let top = rows.get(span.row as isize);
        let bottom = rows.get((span.row + span.numberofrows + 1) as isize);
        let height = bottom.y - top.y;

        let mut group = Group::new();
        let mut rect = Element::new(
            Shape::Rect {
                x: span.start_x,
                y: 0.0,
                width: span.width,
                height,
                rx: 0.0,
                ry: 0.0,
            },
            "inline-expression",
        );
        rect.style = Style {
            line_color: span.linecolor.clone(),
            text_color: None,
            fill_color: span.textbgcolor.clone(),
        };
        group.push(rect);
        placed.push(Placed { y: top.y, group });
    }
    Ok(placed)
}
