use serde::{Deserialize, Serialize};

use crate::ast::Options;

/// Base sizing constants for a chart. These are the pre-scale defaults;
/// the per-run [`Sizes`] applies the chart options on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub inter_entity_spacing: f32,
    pub entity_width: f32,
    pub entity_height: f32,
    pub arc_row_height: f32,
    pub line_width: f32,
    pub pad_vertical: f32,
    pub rbox_corner_radius: f32,
    pub note_fold_size: f32,
    /// Fold size of the inline-expression label tag.
    pub label_fold_size: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            inter_entity_spacing: 160.0,
            entity_width: 100.0,
            entity_height: 34.0,
            arc_row_height: 38.0,
            line_width: 2.0,
            pad_vertical: 3.0,
            rbox_corner_radius: 6.0,
            note_fold_size: 9.0,
            label_fold_size: 7.0,
        }
    }
}

/// Effective sizes for one layout run. Derived fresh from the config and
/// the chart options at the start of every run so nothing leaks between
/// runs: `hscale` scales entity width and inter-entity spacing,
/// `arcgradient` widens the rows and slopes the arcs, `wordwraparcs`
/// extends word-wrap to non-box arc labels.
#[derive(Debug, Clone, Copy)]
pub struct Sizes {
    pub inter_entity_spacing: f32,
    pub entity_width: f32,
    pub entity_height: f32,
    pub arc_row_height: f32,
    pub arc_gradient: f32,
    pub word_wrap_arcs: bool,
    pub line_width: f32,
    pub pad_vertical: f32,
}

impl Sizes {
    pub fn from_options(config: &LayoutConfig, options: &Options) -> Self {
        let mut sizes = Self {
            inter_entity_spacing: config.inter_entity_spacing,
            entity_width: config.entity_width,
            entity_height: config.entity_height,
            arc_row_height: config.arc_row_height,
            arc_gradient: 0.0,
            word_wrap_arcs: options.wordwraparcs,
            line_width: config.line_width,
            pad_vertical: config.pad_vertical,
        };
        if let Some(hscale) = options.hscale {
            sizes.inter_entity_spacing = hscale * config.inter_entity_spacing;
            sizes.entity_width = hscale * config.entity_width;
        }
        if let Some(gradient) = options.arcgradient {
            sizes.arc_row_height = gradient + config.arc_row_height;
            sizes.arc_gradient = gradient;
        }
        sizes
    }
}
