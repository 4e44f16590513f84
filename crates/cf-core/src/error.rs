//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CfError` as one variant
//! where they need to surface configuration problems.

use thiserror::Error;

/// The top-level error type for `cf-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CfError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `cf-*` crates.
pub type CfResult<T> = Result<T, CfError>;
