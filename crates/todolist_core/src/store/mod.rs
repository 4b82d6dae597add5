//! In-memory state stores synchronized with the remote API.
//!
//! # Responsibility
//! - Own the local collections the UI renders.
//! - Apply mutations only after the remote call confirmed them.
//!
//! # Invariants
//! - Ids are the only key used to reconcile local and remote entries.
//! - A failed call leaves the local collection unchanged.

use crate::api::ApiError;
use crate::model::todo::TodoId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod list_store;
pub mod task_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a bulk toggle where at least one update failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleAllFailure {
    /// Number of tasks whose update was confirmed and applied.
    pub updated: usize,
    /// Tasks whose update failed, in collection order.
    pub failed: Vec<TodoId>,
    /// Message of the first failure.
    pub message: String,
}

/// Store-level operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Operation needs a signed-in session.
    NotSignedIn,
    /// Task operation issued while no list is open.
    NoListOpen,
    /// Referenced entry is not in the local collection.
    UnknownEntry(String),
    /// Remote call failed.
    Api(ApiError),
    /// Some updates of a bulk toggle failed.
    ToggleAll(ToggleAllFailure),
}

impl StoreError {
    /// Message suitable for direct display to the user.
    pub fn message(&self) -> String {
        match self {
            Self::Api(err) => err.message(),
            other => other.to_string(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSignedIn => write!(f, "not signed in"),
            Self::NoListOpen => write!(f, "no todo list is open"),
            Self::UnknownEntry(id) => write!(f, "unknown entry: {id}"),
            Self::Api(err) => write!(f, "{err}"),
            Self::ToggleAll(failure) => write!(
                f,
                "{} of {} updates failed: {}",
                failure.failed.len(),
                failure.failed.len() + failure.updated,
                failure.message
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for StoreError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}
