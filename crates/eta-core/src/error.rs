//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `EtaError` as one variant
//! where they need to surface configuration or parsing problems.

use thiserror::Error;

/// The top-level error type for `eta-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EtaError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `eta-*` crates.
pub type EtaResult<T> = Result<T, EtaError>;
