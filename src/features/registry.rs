//! Feature key registry
//!
//! Hands out short integer IDs for named features, separately for vertex and
//! edge features. A registry is shared (`Arc`) by every model that should
//! agree on feature IDs; tests simply create their own.

use super::value::{EntityKind, ValueType};
use super::{FeatureError, FeatureResult};
use crate::collection::IntObjectArrayMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Process-local numeric handle of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct FeatureId(pub u32);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureId({})", self.0)
    }
}

/// A registered feature
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub kind: EntityKind,
    pub key: String,
    pub value_type: ValueType,
    pub id: FeatureId,
}

/// Key and feature tables of one entity kind
#[derive(Debug, Default)]
struct KindTable {
    next_id: u32,
    key_ids: HashMap<String, FeatureId>,
    features: HashMap<String, Arc<Feature>>,
    by_id: IntObjectArrayMap<Arc<Feature>>,
}

impl KindTable {
    fn unique_id(&mut self, key: &str) -> FeatureId {
        if let Some(&id) = self.key_ids.get(key) {
            return id;
        }
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        self.key_ids.insert(key.to_string(), id);
        id
    }
}

/// Registry of vertex and edge features
///
/// Each kind has its own ID space starting at 0, guarded by one lock.
/// Registration is rare, lookups are frequent and short.
#[derive(Debug, Default)]
pub struct FeatureRegistry {
    vertex: Mutex<KindTable>,
    edge: Mutex<KindTable>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// New registry behind an `Arc`, ready to hand to models
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn table(&self, kind: EntityKind) -> MutexGuard<'_, KindTable> {
        let lock = match kind {
            EntityKind::Vertex => &self.vertex,
            EntityKind::Edge => &self.edge,
        };
        // tables stay consistent even if a holder panicked
        lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a feature under `key`
    ///
    /// Fails if `key` is already registered for `kind`; the existing
    /// feature is left untouched.
    pub fn register_feature(
        &self,
        kind: EntityKind,
        key: impl Into<String>,
        value_type: ValueType,
    ) -> FeatureResult<Arc<Feature>> {
        let key = key.into();
        let mut table = self.table(kind);
        if table.features.contains_key(&key) {
            return Err(FeatureError::DuplicateKey { kind, key });
        }

        let id = table.unique_id(&key);
        let feature = Arc::new(Feature {
            kind,
            key: key.clone(),
            value_type,
            id,
        });
        table.features.insert(key, Arc::clone(&feature));
        table.by_id.put(id.0, Arc::clone(&feature));

        debug!("Registered {} feature {:?} as {}", kind, feature.key, id);
        Ok(feature)
    }

    /// ID for `key`, allocated on first request
    pub fn unique_feature_id(&self, kind: EntityKind, key: &str) -> FeatureId {
        self.table(kind).unique_id(key)
    }

    pub fn feature(&self, kind: EntityKind, key: &str) -> Option<Arc<Feature>> {
        self.table(kind).features.get(key).cloned()
    }

    pub fn feature_by_id(&self, kind: EntityKind, id: FeatureId) -> Option<Arc<Feature>> {
        self.table(kind).by_id.get(id.0).cloned()
    }

    /// Registered features of `kind` in ascending ID order
    pub fn features(&self, kind: EntityKind) -> Vec<Arc<Feature>> {
        self.table(kind).by_id.values().cloned().collect()
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.table(kind).features.len()
    }
}
