//! Growable bookkeeping list for the orchestrator's Resources and Systems.

use crate::model::error::ModelError;

/// An append-only list that owns its items.
///
/// Starts with room for one item and grows by doubling when full. Growth goes through
/// `try_reserve`, so an allocation failure comes back as [`ModelError::Allocation`]
/// instead of aborting the process.
#[derive(Debug)]
pub struct Registry<T> {
    items: Vec<T>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(1),
        }
    }

    /// Appends `item`, doubling the backing storage when it is full.
    pub fn add(&mut self, item: T) -> Result<(), ModelError> {
        if self.items.len() == self.items.capacity() {
            let additional = self.items.capacity().max(1);
            self.items
                .try_reserve_exact(additional)
                .map_err(|e| ModelError::allocation("registry slot", e))?;
        }
        self.items.push(item);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Drops every owned item and releases the backing storage.
    ///
    /// Safe to call repeatedly; a second call finds nothing to release.
    pub fn clean(&mut self) {
        self.items = Vec::new();
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_registry_is_empty() {
        let registry: Registry<u32> = Registry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.capacity() >= 1);
    }

    #[test]
    fn test_clean_on_empty_registry_is_noop() {
        let mut registry: Registry<Arc<()>> = Registry::new();
        registry.clean();
        assert!(registry.is_empty());
        registry.clean();
        assert_eq!(registry.len(), 0);
        assert!(registry.get(0).is_none());
    }

    #[test]
    fn test_add_keeps_items_retrievable() {
        let mut registry = Registry::new();
        for i in 0..9 {
            registry.add(i).unwrap();
        }
        assert_eq!(registry.len(), 9);
        assert!(registry.capacity() >= 9);
        assert_eq!(registry.get(0), Some(&0));
        assert_eq!(registry.get(8), Some(&8));
        assert_eq!(registry.iter().copied().sum::<i32>(), 36);
    }

    #[test]
    fn test_clean_releases_items_once() {
        let shared = Arc::new(());
        let mut registry = Registry::new();
        registry.add(Arc::clone(&shared)).unwrap();
        registry.add(Arc::clone(&shared)).unwrap();
        assert_eq!(Arc::strong_count(&shared), 3);

        registry.clean();
        assert_eq!(Arc::strong_count(&shared), 1);
        assert!(registry.is_empty());

        // Idempotent.
        registry.clean();
        assert_eq!(Arc::strong_count(&shared), 1);
        assert_eq!(registry.len(), 0);
    }
}
