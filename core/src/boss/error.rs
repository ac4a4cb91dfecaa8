//! Error types for boss encounters

use std::path::PathBuf;
use thiserror::Error;

/// Rejected phase transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    #[error("cannot move from phase {from} to {to}: phases only advance")]
    NotForward {
        from: &'static str,
        to: &'static str,
    },

    #[error("no fight is in progress")]
    NotEngaged,
}

/// Errors loading or validating an encounter definition
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read encounter definition {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse encounter definition {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse encounter definition")]
    Parse(#[from] toml::de::Error),

    #[error("invalid encounter definition: {reason}")]
    Invalid { reason: String },
}
