//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod inventory;
pub mod operation;
pub mod probe;
pub mod service;
pub mod target;

pub use config::{DeckConfig, ProbeConfig};
pub use error::{CommandError, ProviderError, ServiceError};
pub use inventory::parse_inventory;
pub use service::ServiceSpec;
pub use target::{Target, TargetConnection, endpoint_for};
