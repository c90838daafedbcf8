use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::collections::HashSet;

/// Target name that fans an arc out to every other entity.
pub const BROADCAST: &str = "*";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AstError {
    #[error("duplicate entity name `{0}`")]
    DuplicateEntity(String),
}

/// A participant/column in the chart. Declaration order is the column order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub label: Option<String>,
    pub id: Option<String>,
    pub url: Option<String>,
    pub idurl: Option<String>,
    pub linecolor: Option<String>,
    pub textcolor: Option<String>,
    pub textbgcolor: Option<String>,
    pub arclinecolor: Option<String>,
    pub arctextcolor: Option<String>,
    pub arctextbgcolor: Option<String>,
}

impl Entity {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_label(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: Some(label.to_string()),
            ..Self::default()
        }
    }

    /// The text shown in the entity box; falls back to the name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// One relationship/event within a row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arc {
    pub kind: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub label: Option<String>,
    pub id: Option<String>,
    pub url: Option<String>,
    pub idurl: Option<String>,
    pub linecolor: Option<String>,
    pub textcolor: Option<String>,
    pub textbgcolor: Option<String>,
    /// Number of rows the arc skips forward before arriving.
    pub arcskip: Option<f32>,
    /// Nesting level inside inline expressions.
    pub depth: u32,
    /// Row count covered by an inline expression.
    pub numberofrows: Option<usize>,
}

impl Arc {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Self::default()
        }
    }

    pub fn between(kind: &str, from: &str, to: &str) -> Self {
        Self {
            kind: kind.to_string(),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            ..Self::default()
        }
    }

    pub fn labelled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn is_broadcast(&self) -> bool {
        self.to.as_deref() == Some(BROADCAST)
    }
}

/// One horizontal slot in time. Insertion order is vertical order.
pub type Row = Vec<Arc>;

/// Recognized rendering options. Unknown keys in serialized input are
/// ignored during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Options {
    pub hscale: Option<f32>,
    pub arcgradient: Option<f32>,
    #[serde(default)]
    pub wordwraparcs: bool,
    pub width: Option<f32>,
    pub watermark: Option<String>,
}

/// The parsed chart: entities in column order, arcs grouped into rows,
/// and the maximum inline-expression nesting depth computed upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub options: Options,
    pub entities: Vec<Entity>,
    pub rows: Vec<Row>,
    #[serde(default)]
    pub depth: u32,
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity names must be unique; two entities sharing a name makes
    /// column and arc resolution ambiguous.
    pub fn validate(&self) -> Result<(), AstError> {
        let mut seen = HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.name.as_str()) {
                return Err(AstError::DuplicateEntity(entity.name.clone()));
            }
        }
        Ok(())
    }
}
