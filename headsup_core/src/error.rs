// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

use crate::document::{CollectionId, ObjectId};

/// A single rule could not finish evaluating.
///
/// Rule errors are contained by the engine: the failing rule contributes no
/// warnings for the pass and every other rule still runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The active object handle no longer resolves.
    #[error("active object {0:?} no longer exists")]
    StaleActiveObject(ObjectId),
    /// A live entity points at data that is gone.
    #[error("{entity} refers to missing {what}")]
    DanglingReference {
        /// Name of the entity holding the reference.
        entity: String,
        /// What it refers to.
        what: &'static str,
    },
    /// The rule body panicked.
    #[error("rule panicked: {0}")]
    Panicked(String),
}

/// The visibility index could not be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisibilityError {
    /// The collection graph links back into itself.
    #[error("collection graph contains a cycle through {0:?}")]
    CollectionCycle(CollectionId),
    /// A collection lists a child the document does not know.
    #[error("collection {0:?} does not exist")]
    UnknownCollection(CollectionId),
}

/// A whole evaluation pass failed; the previous output is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassError {
    /// Rebuilding the visibility index failed.
    #[error("visibility rebuild failed: {0}")]
    Visibility(#[from] VisibilityError),
    /// The pass body panicked outside any single rule.
    #[error("pass panicked: {0}")]
    Panicked(String),
}

/// Configuration could not be loaded or saved.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text is malformed or has wrongly typed values.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("could not serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A rule key is neither a number in `1..=46` nor `custom`.
    #[error("unknown rule key `{0}`")]
    UnknownRule(String),
}

/// Shorthand for results of a single rule.
pub type RuleResult<T> = Result<T, RuleError>;

impl RuleError {
    /// Builds a [`RuleError::Panicked`] from a caught panic payload.
    #[must_use]
    pub fn from_panic(payload: &(dyn core::any::Any + Send)) -> Self {
        Self::Panicked(panic_message(payload))
    }
}

pub(crate) fn panic_message(payload: &(dyn core::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
