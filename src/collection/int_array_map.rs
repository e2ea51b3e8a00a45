//! Dense map from small integer keys to values
//!
//! Keys index directly into a vector, which suits keys handed out by a
//! counter (feature IDs, file IDs): lookups are a bounds check and a load.

/// Map keyed by `u32` backed by a vector of optional entries
#[derive(Debug, Clone)]
pub struct IntObjectArrayMap<V> {
    entries: Vec<Option<V>>,
    size: usize,
}

impl<V> IntObjectArrayMap<V> {
    pub fn new() -> Self {
        IntObjectArrayMap {
            entries: Vec::new(),
            size: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        IntObjectArrayMap {
            entries: Vec::with_capacity(capacity),
            size: 0,
        }
    }

    /// Insert a mapping, returning the value previously stored under `key`
    pub fn put(&mut self, key: u32, value: V) -> Option<V> {
        let idx = key as usize;
        if idx >= self.entries.len() {
            self.entries.resize_with(idx + 1, || None);
        }
        let previous = self.entries[idx].replace(value);
        if previous.is_none() {
            self.size += 1;
        }
        previous
    }

    pub fn get(&self, key: u32) -> Option<&V> {
        self.entries.get(key as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, key: u32) -> Option<&mut V> {
        self.entries.get_mut(key as usize)?.as_mut()
    }

    pub fn remove(&mut self, key: u32) -> Option<V> {
        let removed = self.entries.get_mut(key as usize)?.take();
        if removed.is_some() {
            self.size -= 1;
        }
        removed
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.size = 0;
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &V)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k as u32, v)))
    }
}

impl<V> Default for IntObjectArrayMap<V> {
    fn default() -> Self {
        Self::new()
    }
}
