//! Raw binary persistence of a pooled graph and its feature values
//!
//! Entities are written under dense file IDs computed at write time, so a
//! stream does not depend on slot layout or stable IDs. Feature values go in
//! self-describing blocks keyed by feature key.

pub mod codec;
pub mod file_ids;
pub mod raw;
mod wire;

pub use file_ids::{FileIdToGraphMap, GraphToFileIdMap};
pub use raw::{read_graph, write_graph, RawSummary};

use crate::features::{EntityKind, ValueType};
use crate::graph::GraphError;
use std::io;
use thiserror::Error;

/// Stream magic number
pub const MAGIC: [u8; 4] = *b"CGRW";

/// Current stream format version
pub const FORMAT_VERSION: u32 = 1;

/// Raw stream errors
#[derive(Error, Debug)]
pub enum RawIoError {
    /// I/O error, including truncated streams
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Payload serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Not a raw graph stream (magic {0:?})")]
    BadMagic([u8; 4]),

    #[error("Unsupported stream version {0}")]
    UnsupportedVersion(u32),

    #[error("Unknown {kind} file ID {file_id}")]
    UnknownFileId { kind: EntityKind, file_id: u32 },

    #[error("{kind} feature \"{key}\" is registered as {expected} but stored as {found}")]
    SchemaMismatch {
        kind: EntityKind,
        key: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("Invalid {what} tag {tag}")]
    InvalidTag { what: &'static str, tag: u8 },

    #[error("Invalid UTF-8 in stream: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type RawIoResult<T> = Result<T, RawIoError>;
