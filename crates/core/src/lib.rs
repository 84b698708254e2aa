//! # Wasfa Core
//!
//! Core business logic for the Wasfa prescription management system.
//!
//! This crate contains the domain layer and its persistence:
//! - Entities and the prescription status machine (`models`)
//! - SQLite repositories with paging, search and uniqueness queries
//!   (`repositories`)
//! - Domain services enforcing validation, uniqueness and status
//!   transitions (`services`)
//! - License activation flags and per-doctor settings stored through
//!   `wasfa_files`
//!
//! **No API concerns**: HTTP routing, status-code mapping and OpenAPI
//! documentation belong in `api-rest`.

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

pub use config::CoreConfig;
pub use error::{DomainError, DomainResult};

// Re-exported so binaries can name pool types without a direct sqlx
// dependency.
pub use sqlx;
