use super::types::{Canvas, Element, Shape, Watermark};
use super::LayoutContext;

/// Sizes the canvas around the laid-out chart and derives the body
/// transform, the background rect, the optional watermark, and the
/// uniform post-scale a fixed `width` option asks for.
pub fn finish(ctx: &LayoutContext) -> (Canvas, Vec<Element>) {
    let sizes = &ctx.sizes;
    let depth_corr = if ctx.chart.depth > 0 {
        2.0 * (ctx.chart.depth + 1) as f32 * 2.0 * sizes.line_width
    } else {
        0.0
    };

    let mut width =
        ctx.chart.entities.len() as f32 * sizes.inter_entity_spacing + depth_corr;
    let last = ctx.rows.get(ctx.chart.rows.len() as isize - 1);
    let mut height = last.y + last.height / 2.0 + 2.0 * sizes.pad_vertical;
    let mut horizontal_transform =
        (sizes.inter_entity_spacing + depth_corr - sizes.entity_width) / 2.0;
    let mut vertical_transform = sizes.pad_vertical;
    let mut scale = 1.0;

    // In body coordinates, so it stays put when the transform shifts
    // the chart into the padded canvas.
    let mut background_rect = Element::new(
        Shape::Rect {
            x: -horizontal_transform,
            y: -vertical_transform,
            width,
            height,
            rx: 0.0,
            ry: 0.0,
        },
        "bglayer",
    );
    background_rect.style.fill_color = Some(ctx.theme.background.clone());

    let watermark = ctx.chart.options.watermark.as_ref().map(|text| Watermark {
        text: text.clone(),
        x: width / 2.0,
        y: height / 2.0,
        angle: -(height / width).atan().to_degrees(),
    });

    if let Some(fixed) = ctx.chart.options.width {
        scale = fixed / width;
        // Take the requested width verbatim; width * (fixed / width)
        // does not round-trip in f32.
        width = fixed;
        height *= scale;
        horizontal_transform *= scale;
        vertical_transform *= scale;
    }

    (
        Canvas {
            width,
            height,
            scale,
            horizontal_transform,
            vertical_transform,
            watermark,
        },
        vec![background_rect],
    )
}
