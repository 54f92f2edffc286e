// ── Generic reactive entity collection ──
//
// Insertion-ordered storage with lock-free reads and push-based change
// notification via `watch` channels.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use tokio::sync::watch;

/// A reactive, insertion-ordered collection for a single entity type.
///
/// Readers load the current map without locking. Writers replace the whole
/// map (`rcu`), so a reader never observes a half-applied change. Every
/// mutation rebuilds the snapshot that subscribers receive.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    /// Primary storage: key string -> entity, in insertion order.
    entries: ArcSwap<IndexMap<String, Arc<T>>>,

    /// Full snapshot, rebuilt on mutation for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            entries: ArcSwap::from_pointee(IndexMap::new()),
            snapshot,
        }
    }

    /// Insert or update an entity. Returns `true` if the key was new.
    /// An existing key keeps its position.
    pub(crate) fn upsert(&self, key: String, entity: T) -> bool {
        let entity = Arc::new(entity);
        let mut is_new = false;
        self.entries.rcu(|current| {
            let mut next = (**current).clone();
            is_new = next.insert(key.clone(), Arc::clone(&entity)).is_none();
            next
        });

        self.rebuild_snapshot();
        is_new
    }

    /// Apply `f` to the entity under `key`, returning the updated value.
    /// Returns `None` (and changes nothing) if the key is absent.
    pub(crate) fn update(&self, key: &str, f: impl Fn(&T) -> T) -> Option<Arc<T>> {
        let mut updated = None;
        self.entries.rcu(|current| {
            let mut next = (**current).clone();
            updated = next.get_mut(key).map(|slot| {
                let value = Arc::new(f(slot.as_ref()));
                *slot = Arc::clone(&value);
                value
            });
            next
        });

        if updated.is_some() {
            self.rebuild_snapshot();
        }
        updated
    }

    /// Replace the whole collection in one step.
    pub(crate) fn replace_all(&self, items: impl IntoIterator<Item = (String, T)>) {
        let next: IndexMap<String, Arc<T>> = items
            .into_iter()
            .map(|(k, v)| (k, Arc::new(v)))
            .collect();
        self.entries.store(Arc::new(next));
        self.rebuild_snapshot();
    }

    /// Look up an entity by its key.
    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.load().get(key).cloned()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.load().contains_key(key)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.load().len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all values into a snapshot vec and broadcast to subscribers.
    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<T>> = self.entries.load().values().cloned().collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_returns_true_for_new_key() {
        let col: EntityCollection<String> = EntityCollection::new();
        assert!(col.upsert("key1".into(), "hello".into()));
    }

    #[test]
    fn upsert_returns_false_for_existing_key() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert("key1".into(), "hello".into());
        assert!(!col.upsert("key1".into(), "world".into()));
        assert_eq!(*col.get("key1").unwrap(), "world");
    }

    #[test]
    fn snapshot_keeps_insertion_order() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert("b".into(), "first".into());
        col.upsert("a".into(), "second".into());
        col.upsert("b".into(), "first-updated".into());

        let snap = col.snapshot();
        let values: Vec<&str> = snap.iter().map(|s| s.as_str()).collect();
        assert_eq!(values, ["first-updated", "second"]);
    }

    #[test]
    fn update_missing_key_is_noop() {
        let col: EntityCollection<u32> = EntityCollection::new();
        col.upsert("a".into(), 1);
        assert!(col.update("zzz", |v| v + 1).is_none());
        assert_eq!(*col.update("a", |v| v + 1).unwrap(), 2);
    }

    #[test]
    fn replace_all_swaps_contents_in_order() {
        let col: EntityCollection<u32> = EntityCollection::new();
        col.upsert("z".into(), 9);
        col.replace_all([("c".into(), 3), ("a".into(), 1)]);

        let values: Vec<u32> = col.snapshot().iter().map(|v| **v).collect();
        assert_eq!(values, [3, 1]);
        assert!(!col.contains("z"));
        assert!(!col.is_empty());
    }

    #[test]
    fn subscribers_see_mutations() {
        let col: EntityCollection<u32> = EntityCollection::new();
        let mut rx = col.subscribe();
        col.upsert("a".into(), 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
