//! Feature block bodies
//!
//! A body is `entryCount:u32` followed by `fileId:u32, value` entries. Bodies
//! are built in memory with `bytes` so the block length can be written ahead
//! of them, and decoded completely before anything is applied.

use super::file_ids::{FileIdToGraphMap, GraphToFileIdMap};
use super::wire::len_u32;
use super::{RawIoError, RawIoResult};
use crate::features::{Column, EntityKind, FeatureValue, ValueType};
use bytes::{Buf, BufMut, BytesMut};
use std::io;

fn truncated(what: &str) -> RawIoError {
    RawIoError::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("feature block truncated while reading {}", what),
    ))
}

fn need<B: Buf>(buf: &B, n: usize, what: &str) -> RawIoResult<()> {
    if buf.remaining() < n {
        return Err(truncated(what));
    }
    Ok(())
}

/// Append one value
pub fn encode_value<B: BufMut>(buf: &mut B, value: &FeatureValue) -> RawIoResult<()> {
    match value {
        FeatureValue::Int(i) => buf.put_i64_le(*i),
        FeatureValue::Double(d) => buf.put_f64_le(*d),
        FeatureValue::Bool(b) => buf.put_u8(u8::from(*b)),
        FeatureValue::Text(s) => {
            buf.put_u32_le(len_u32(s.len())?);
            buf.put_slice(s.as_bytes());
        }
        FeatureValue::DoubleArray(arr) => {
            buf.put_u32_le(len_u32(arr.len())?);
            for d in arr {
                buf.put_f64_le(*d);
            }
        }
    }
    Ok(())
}

/// Read one value of type `value_type`
pub fn decode_value<B: Buf>(buf: &mut B, value_type: ValueType) -> RawIoResult<FeatureValue> {
    let value = match value_type {
        ValueType::Int => {
            need(buf, 8, "int")?;
            FeatureValue::Int(buf.get_i64_le())
        }
        ValueType::Double => {
            need(buf, 8, "double")?;
            FeatureValue::Double(buf.get_f64_le())
        }
        ValueType::Bool => {
            need(buf, 1, "bool")?;
            match buf.get_u8() {
                0 => FeatureValue::Bool(false),
                1 => FeatureValue::Bool(true),
                tag => return Err(RawIoError::InvalidTag { what: "bool", tag }),
            }
        }
        ValueType::Text => {
            need(buf, 4, "text length")?;
            let len = buf.get_u32_le() as usize;
            need(buf, len, "text")?;
            let bytes = buf.copy_to_bytes(len);
            FeatureValue::Text(String::from_utf8(bytes.to_vec())?)
        }
        ValueType::DoubleArray => {
            need(buf, 4, "array length")?;
            let count = buf.get_u32_le() as usize;
            need(buf, count.saturating_mul(8), "array")?;
            let arr = (0..count).map(|_| buf.get_f64_le()).collect();
            FeatureValue::DoubleArray(arr)
        }
    };
    Ok(value)
}

/// Encode the values of `column` for entities that have a file ID
///
/// Returns `None` when no live entity holds a value.
pub fn encode_block(
    column: &Column,
    kind: EntityKind,
    idmap: &GraphToFileIdMap,
) -> RawIoResult<Option<BytesMut>> {
    let entries: Vec<(u32, FeatureValue)> = column
        .slots()
        .into_iter()
        .filter_map(|slot| {
            let file_id = idmap.file_id(kind, slot)?;
            column.get(slot).map(|value| (file_id, value))
        })
        .collect();
    if entries.is_empty() {
        return Ok(None);
    }

    let mut body = BytesMut::with_capacity(4 + entries.len() * 12);
    body.put_u32_le(len_u32(entries.len())?);
    for (file_id, value) in &entries {
        body.put_u32_le(*file_id);
        encode_value(&mut body, value)?;
    }
    Ok(Some(body))
}

/// Decode a whole block body into a fresh column addressed by slot
///
/// Bytes left over after the last entry mean the block is mis-framed.
pub fn decode_block<B: Buf>(
    mut body: B,
    kind: EntityKind,
    key: &str,
    value_type: ValueType,
    idmap: &FileIdToGraphMap,
) -> RawIoResult<Column> {
    need(&body, 4, "entry count")?;
    let count = body.get_u32_le();
    let mut column = Column::new(value_type);
    for _ in 0..count {
        need(&body, 4, "file ID")?;
        let file_id = body.get_u32_le();
        let slot = idmap
            .slot(kind, file_id)
            .ok_or(RawIoError::UnknownFileId { kind, file_id })?;
        let value = decode_value(&mut body, value_type)?;
        // decode_value only yields values of the requested type
        column
            .insert(slot, value)
            .map_err(|found| RawIoError::SchemaMismatch {
                kind,
                key: key.to_string(),
                expected: value_type,
                found,
            })?;
    }
    if body.has_remaining() {
        return Err(RawIoError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{} feature {:?}: {} bytes after the last entry",
                kind,
                key,
                body.remaining()
            ),
        )));
    }
    Ok(column)
}
