pub mod ast;
pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod metrics;
pub mod theme;

pub use ast::{Arc, Chart, Entity, Options, Row};
pub use config::LayoutConfig;
pub use layout::{compute_layout, ChartLayout, LayoutError};
pub use metrics::{CharMetrics, FontMetrics, TextMeasure};
pub use theme::Theme;
