//! Hard failures of the import pipeline.
//!
//! Row- and field-level problems never surface here: unparseable sub-fields
//! fall back to documented defaults and per-record upsert failures are
//! collected into the [`ImportSummary`](crate::events::models::ImportSummary).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("no import source found: neither {csv} nor {xlsx} exists")]
    NoSource { csv: String, xlsx: String },

    #[error("failed to read {path}: {message}")]
    Source { path: String, message: String },
}

impl ImportError {
    pub fn source(path: &str, err: impl std::fmt::Display) -> Self {
        ImportError::Source {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}
