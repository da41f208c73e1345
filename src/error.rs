//! Error types
//!
//! The flattening and segmentation core never fails: incomplete data simply
//! stays incomplete. Errors only arise at the edges, when JSON-LD documents
//! or configuration are parsed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnoError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected {expected} at {path}, found {found}")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("compacted JSON-LD is not supported at {path}; expand the document first")]
    NotExpanded { path: String },

    #[error("invalid {datatype} literal {value:?} at {path}")]
    InvalidLiteral {
        path: String,
        datatype: &'static str,
        value: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = AnnoError> = std::result::Result<T, E>;
