//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and API calls into use-case level APIs.
//! - Keep FFI/CLI callers decoupled from transport details.

pub mod auth_service;
