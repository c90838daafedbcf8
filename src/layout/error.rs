use thiserror::Error;

use crate::ast::AstError;

/// The layout core degrades gracefully wherever it can (skipped arcs,
/// fallback kinds, omitted attributes). These are the only conditions
/// worth surfacing to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error(transparent)]
    Ast(#[from] AstError),

    #[error("arc references entity \"{name}\" which is not declared")]
    UnknownEntity { name: String },

    #[error(
        "inline expression at row {row} declares {declared} rows \
         but only {available} rows follow it"
    )]
    SpanPastEnd {
        row: usize,
        declared: usize,
        available: usize,
    },
}
