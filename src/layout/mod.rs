mod arcs;
mod canvas;
mod entities;
mod error;
mod kind;
mod rows;
mod spans;
mod text;
pub(crate) mod types;

pub use error::LayoutError;
pub use kind::{classify, is_double_line, is_lost_message, style_class, AggregateKind};
pub use types::*;

use crate::ast::Chart;
use crate::config::{LayoutConfig, Sizes};
use crate::metrics::TextMeasure;
use crate::theme::Theme;

use entities::EntityColumns;
use rows::RowLedger;
use spans::PendingSpan;

/// Everything one layout run threads through the passes. Built fresh
/// per run; nothing survives into the next chart.
struct LayoutContext<'a> {
    chart: &'a Chart,
    theme: &'a Theme,
    config: &'a LayoutConfig,
    metrics: &'a dyn TextMeasure,
    sizes: Sizes,
    max_depth: u32,
    text_height: f32,
    columns: EntityColumns,
    rows: RowLedger,
    pending: Vec<PendingSpan>,
}

/// Computes the full geometry of a chart: entity columns first, then
/// the rows top to bottom, then the inline-expression boxes once every
/// row height is known, and finally the canvas around it all.
pub fn compute_layout(
    chart: &Chart,
    theme: &Theme,
    config: &LayoutConfig,
    metrics: &dyn TextMeasure,
) -> Result<ChartLayout, LayoutError> {
    chart.validate()?;
    let sizes = Sizes::from_options(config, &chart.options);
    let (columns, entity_groups) = entities::assign_columns(chart, theme, &sizes, metrics);
    let entity_height = columns.entity_height;

    let mut ctx = LayoutContext {
        chart,
        theme,
        config,
        metrics,
        sizes,
        max_depth: chart.depth,
        text_height: metrics.text_height(theme.font_size),
        columns,
        rows: RowLedger::new(entity_height, sizes.arc_row_height),
        pending: Vec::new(),
    };

    let artifacts = arcs::build_rows(&mut ctx)?;
    let span_boxes = spans::resolve(&ctx.pending, &ctx.rows, chart.rows.len())?;
    let (canvas, background) = canvas::finish(&ctx);

    Ok(ChartLayout {
        canvas,
        background,
        lifelines: artifacts.lifelines,
        entities: entity_groups,
        sequence: artifacts.sequence,
        notes: artifacts.notes,
        spans: span_boxes,
    })
}
