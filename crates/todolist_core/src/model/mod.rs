//! Client-side domain model for sessions, task lists and tasks.
//!
//! # Responsibility
//! - Define the records mirrored from the remote GraphQL service.
//! - Keep the authenticated identity in one explicit value.
//!
//! # Invariants
//! - Every list and task is identified by its server-assigned id.
//! - Local records only ever reflect server-confirmed state.

pub mod session;
pub mod todo;
pub mod todo_list;
