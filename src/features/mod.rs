//! Features: named, typed values attached to vertices and edges
//!
//! - `registry`: feature keys and their numeric IDs
//! - `store`: per-graph feature values, one typed column per feature
//! - `value`: value and entity kind types

pub mod registry;
pub mod store;
pub mod value;

pub use registry::{Feature, FeatureId, FeatureRegistry};
pub use store::{Column, ColumnStore, FeatureStore};
pub use value::{EntityKind, FeatureValue, ValueType};

use thiserror::Error;

/// Errors raised by feature registration and value access
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("{kind} feature key \"{key}\" already exists")]
    DuplicateKey { kind: EntityKind, key: String },

    #[error("{kind} feature \"{key}\" is not registered")]
    NotRegistered { kind: EntityKind, key: String },

    #[error("Feature \"{key}\" holds {expected} values, got {found}")]
    TypeMismatch {
        key: String,
        expected: ValueType,
        found: ValueType,
    },
}

pub type FeatureResult<T> = Result<T, FeatureError>;
