use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Memoizing factory for engine handles, one handle per key.
///
/// Production builds exactly one handle at startup; this cache exists for
/// harnesses that drive several working directories in one process and want
/// to avoid redundant setup work per directory.
#[derive(Debug)]
pub struct HandleCache<K, V> {
    entries: Mutex<HashMap<K, Arc<V>>>,
}

impl<K: Eq + Hash + Clone, V> HandleCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the handle for `key`, building it with `factory` if absent.
    ///
    /// The lock is held while the factory runs, so two callers racing on the
    /// same key never build two handles.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &K,
        factory: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        let mut entries = self.entries.lock();
        if let Some(handle) = entries.get(key) {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(factory()?);
        entries.insert(key.clone(), Arc::clone(&handle));
        Ok(handle)
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone, V> Default for HandleCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
