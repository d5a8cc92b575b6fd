//! Shared error type.
//!
//! Sub-crates define their own error enums (`StatsError`, `EngineError`) and
//! wrap `EvError` as one variant where they need it.

use thiserror::Error;

/// The top-level error type for `ev-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EvError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `ev-*` crates.
pub type EvResult<T> = Result<T, EvError>;
