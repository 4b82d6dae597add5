//! Flutter bridge crate for the todolist core.
//!
//! Dart bindings are generated from `api` by flutter_rust_bridge codegen.

pub mod api;
