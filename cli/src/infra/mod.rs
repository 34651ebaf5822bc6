//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, sockets
//! and TLS, the SQLite ledger, and YAML files on disk.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod inventory;
pub mod ledger;
pub mod network;
pub mod providers;
pub mod services;
pub mod tls;
