use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::layout::ChartLayout;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("cannot write layout dump: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot serialize layout dump: {0}")]
    Json(#[from] serde_json::Error),
}

/// Header prepended to the serialized layout so dumps from different
/// charts can be compared at a glance.
#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub entity_count: usize,
    pub row_count: usize,
    pub element_count: usize,
    pub layout: &'a ChartLayout,
}

fn count_elements(layout: &ChartLayout) -> usize {
    let placed: usize = layout
        .sequence
        .iter()
        .chain(&layout.notes)
        .chain(&layout.spans)
        .map(|p| p.group.elements.len())
        .sum();
    let lifelines: usize = layout.lifelines.iter().map(|l| l.lines.len()).sum();
    let entities: usize = layout.entities.iter().map(|g| g.elements.len()).sum();
    placed + lifelines + entities + layout.background.len()
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a ChartLayout) -> Self {
        // Lifelines carry one extra band above the first row.
        let row_count = layout.lifelines.len().saturating_sub(1);
        let entity_count = layout.entities.len();
        LayoutDump {
            width: layout.canvas.width,
            height: layout.canvas.height,
            scale: layout.canvas.scale,
            entity_count,
            row_count,
            element_count: count_elements(layout),
            layout,
        }
    }
}

pub fn dump_to_string(layout: &ChartLayout) -> Result<String, DumpError> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(
        layout,
    ))?)
}

pub fn write_layout_dump(path: &Path, layout: &ChartLayout) -> Result<(), DumpError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &LayoutDump::from_layout(layout))?;
    Ok(())
}
