// ─────────────────────────────────────────────────────────────────────
// AtmoFlux — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FluxError {
    #[error("bad {what} ('{value}'): {reason}")]
    Format {
        what: &'static str,
        value: String,
        reason: String,
    },

    #[error("unknown particle ({0})")]
    UnknownParticle(String),

    #[error("{quantity} out of range: {value} not in [{min}, {max}]")]
    Domain {
        quantity: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("shape mismatch: expected a sequence of length {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("NPZ error: {0}")]
    Npz(String),
}

impl FluxError {
    /// Shorthand for a [`FluxError::Domain`] over a named quantity.
    pub fn domain(quantity: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        FluxError::Domain {
            quantity: quantity.into(),
            value,
            min,
            max,
        }
    }

    /// Shorthand for a [`FluxError::Format`].
    pub fn format(what: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        FluxError::Format {
            what,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type FluxResult<T> = Result<T, FluxError>;
