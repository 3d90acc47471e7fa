//! # AppError
//!
//! Centralized error handling for the Ishi-Board ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all ib-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// No stone could be derived from the request host or the fallback field
    #[error("no stone could be resolved from the request")]
    Unresolved,

    /// Validation failure (e.g., missing nickname)
    #[error("validation error: {0}")]
    Validation(String),

    /// A post referenced a stone row that does not exist
    #[error("unknown stone: {0}")]
    UnknownStone(String),

    /// Infrastructure failure (e.g., DB down, constraint violation)
    #[error("storage error: {0}")]
    Storage(String),
}

/// A specialized Result type for Ishi-Board logic.
pub type Result<T> = std::result::Result<T, AppError>;
