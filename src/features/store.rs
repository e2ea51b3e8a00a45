//! Columnar storage for feature values
//!
//! Values of one feature are kept in a typed column indexed by slot, so a
//! feature over a few hundred thousand spots is a handful of contiguous
//! vectors instead of one map entry per spot.

use super::registry::FeatureId;
use super::value::{EntityKind, FeatureValue, ValueType};
use super::{FeatureError, FeatureResult};
use crate::pool::SlotIndex;
use rustc_hash::FxHashMap;

/// A single feature column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Vec<Option<i64>>),
    Double(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
    DoubleArray(Vec<Option<Vec<f64>>>),
}

fn put<T>(v: &mut Vec<Option<T>>, idx: usize, value: T) -> Option<T> {
    if idx >= v.len() {
        v.resize_with(idx + 1, || None);
    }
    v[idx].replace(value)
}

fn take<T>(v: &mut [Option<T>], idx: usize) -> Option<T> {
    v.get_mut(idx).and_then(Option::take)
}

impl Column {
    pub fn new(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Int => Column::Int(Vec::new()),
            ValueType::Double => Column::Double(Vec::new()),
            ValueType::Bool => Column::Bool(Vec::new()),
            ValueType::Text => Column::Text(Vec::new()),
            ValueType::DoubleArray => Column::DoubleArray(Vec::new()),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Column::Int(_) => ValueType::Int,
            Column::Double(_) => ValueType::Double,
            Column::Bool(_) => ValueType::Bool,
            Column::Text(_) => ValueType::Text,
            Column::DoubleArray(_) => ValueType::DoubleArray,
        }
    }

    /// Store `value` at `slot`, returning the value it replaced
    ///
    /// Returns `None` without storing anything when the value has the wrong
    /// type; callers check the type first.
    fn set(&mut self, slot: SlotIndex, value: FeatureValue) -> Option<FeatureValue> {
        let idx = slot as usize;
        match (self, value) {
            (Column::Int(v), FeatureValue::Int(x)) => put(v, idx, x).map(FeatureValue::Int),
            (Column::Double(v), FeatureValue::Double(x)) => put(v, idx, x).map(FeatureValue::Double),
            (Column::Bool(v), FeatureValue::Bool(x)) => put(v, idx, x).map(FeatureValue::Bool),
            (Column::Text(v), FeatureValue::Text(x)) => put(v, idx, x).map(FeatureValue::Text),
            (Column::DoubleArray(v), FeatureValue::DoubleArray(x)) => {
                put(v, idx, x).map(FeatureValue::DoubleArray)
            }
            _ => None,
        }
    }

    /// Type-checked insert, used when building a column from decoded entries
    pub fn insert(&mut self, slot: SlotIndex, value: FeatureValue) -> Result<(), ValueType> {
        if value.value_type() != self.value_type() {
            return Err(value.value_type());
        }
        self.set(slot, value);
        Ok(())
    }

    pub fn get(&self, slot: SlotIndex) -> Option<FeatureValue> {
        let idx = slot as usize;
        match self {
            Column::Int(v) => v.get(idx).copied().flatten().map(FeatureValue::Int),
            Column::Double(v) => v.get(idx).copied().flatten().map(FeatureValue::Double),
            Column::Bool(v) => v.get(idx).copied().flatten().map(FeatureValue::Bool),
            Column::Text(v) => v.get(idx).and_then(|o| o.clone()).map(FeatureValue::Text),
            Column::DoubleArray(v) => v
                .get(idx)
                .and_then(|o| o.clone())
                .map(FeatureValue::DoubleArray),
        }
    }

    pub fn remove(&mut self, slot: SlotIndex) -> Option<FeatureValue> {
        let idx = slot as usize;
        match self {
            Column::Int(v) => take(v, idx).map(FeatureValue::Int),
            Column::Double(v) => take(v, idx).map(FeatureValue::Double),
            Column::Bool(v) => take(v, idx).map(FeatureValue::Bool),
            Column::Text(v) => take(v, idx).map(FeatureValue::Text),
            Column::DoubleArray(v) => take(v, idx).map(FeatureValue::DoubleArray),
        }
    }

    /// Slots holding a value, ascending
    pub fn slots(&self) -> Vec<SlotIndex> {
        fn set_slots<T>(v: &[Option<T>]) -> Vec<SlotIndex> {
            v.iter()
                .enumerate()
                .filter(|(_, o)| o.is_some())
                .map(|(i, _)| i as SlotIndex)
                .collect()
        }
        match self {
            Column::Int(v) => set_slots(v),
            Column::Double(v) => set_slots(v),
            Column::Bool(v) => set_slots(v),
            Column::Text(v) => set_slots(v),
            Column::DoubleArray(v) => set_slots(v),
        }
    }

    /// Number of slots holding a value
    pub fn len(&self) -> usize {
        fn count<T>(v: &[Option<T>]) -> usize {
            v.iter().filter(|o| o.is_some()).count()
        }
        match self {
            Column::Int(v) => count(v),
            Column::Double(v) => count(v),
            Column::Bool(v) => count(v),
            Column::Text(v) => count(v),
            Column::DoubleArray(v) => count(v),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Columns of one entity kind
#[derive(Debug, Default, Clone)]
pub struct ColumnStore {
    /// Mapping from feature ID -> Column
    columns: FxHashMap<FeatureId, Column>,
}

impl ColumnStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(&self, id: FeatureId) -> Option<&Column> {
        self.columns.get(&id)
    }

    pub fn replace_column(&mut self, id: FeatureId, column: Column) -> Option<Column> {
        self.columns.insert(id, column)
    }

    /// Drop the values of every feature at `slot`
    pub fn remove_slot(&mut self, slot: SlotIndex) {
        for column in self.columns.values_mut() {
            column.remove(slot);
        }
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }
}

/// Feature values of one graph, by entity kind
#[derive(Debug, Default, Clone)]
pub struct FeatureStore {
    vertex: ColumnStore,
    edge: ColumnStore,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self, kind: EntityKind) -> &ColumnStore {
        match kind {
            EntityKind::Vertex => &self.vertex,
            EntityKind::Edge => &self.edge,
        }
    }

    pub fn columns_mut(&mut self, kind: EntityKind) -> &mut ColumnStore {
        match kind {
            EntityKind::Vertex => &mut self.vertex,
            EntityKind::Edge => &mut self.edge,
        }
    }

    /// Set the value of feature `id` (of declared type `value_type`) at `slot`
    pub fn set(
        &mut self,
        kind: EntityKind,
        key: &str,
        id: FeatureId,
        value_type: ValueType,
        slot: SlotIndex,
        value: FeatureValue,
    ) -> FeatureResult<Option<FeatureValue>> {
        if value.value_type() != value_type {
            return Err(FeatureError::TypeMismatch {
                key: key.to_string(),
                expected: value_type,
                found: value.value_type(),
            });
        }
        let column = self
            .columns_mut(kind)
            .columns
            .entry(id)
            .or_insert_with(|| Column::new(value_type));
        Ok(column.set(slot, value))
    }

    pub fn get(&self, kind: EntityKind, id: FeatureId, slot: SlotIndex) -> Option<FeatureValue> {
        self.columns(kind).column(id)?.get(slot)
    }

    pub fn remove(&mut self, kind: EntityKind, id: FeatureId, slot: SlotIndex) -> Option<FeatureValue> {
        self.columns_mut(kind).columns.get_mut(&id)?.remove(slot)
    }

    pub fn clear(&mut self) {
        self.vertex.clear();
        self.edge.clear();
    }
}
