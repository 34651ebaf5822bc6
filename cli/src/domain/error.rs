//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

// ── Service spec errors ───────────────────────────────────────────────────────

/// Errors raised while validating a service spec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("metadata.name is required")]
    MissingName,

    #[error("spec.deployment.method is required")]
    MissingMethod,

    #[error("Service '{0}' not found. Expected services/{0}/service.yaml")]
    NotFound(String),
}

// ── Provider errors ───────────────────────────────────────────────────────────

/// Outcome of a provider execution entry point that did not succeed.
///
/// `NotImplemented` means the feature is pending; `Failed` means execution was
/// attempted and went wrong. Callers branch on the variant, never on the text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{provider}.{operation} is not implemented yet")]
    NotImplemented {
        provider: &'static str,
        operation: &'static str,
    },

    #[error("{provider}.{operation} failed: {message}")]
    Failed {
        provider: &'static str,
        operation: &'static str,
        message: String,
    },
}

impl ProviderError {
    #[must_use]
    pub fn not_implemented(provider: &'static str, operation: &'static str) -> Self {
        Self::NotImplemented {
            provider,
            operation,
        }
    }

    #[must_use]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

// ── Process errors ────────────────────────────────────────────────────────────

/// Why a child process produced no exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0} not found in PATH")]
    NotFound(String),

    #[error("{program} timed out after {}s", timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
