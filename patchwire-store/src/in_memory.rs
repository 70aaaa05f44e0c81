//! In-memory backing store.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use patchwire_core::store::{
    BackingStore, BackingStoreFactory, StoredValue, SubscriptionCallback,
};

/// One tracked entry.
struct StoreEntry {
    value: StoredValue,
    /// Whether initialization had completed when this write happened.
    written_after_init: bool,
    /// Baseline generation current at write time.
    generation: u64,
    /// Element count snapshot for collection values.
    baseline_len: Option<usize>,
}

impl StoreEntry {
    /// Changed iff written after initialization under the current
    /// baseline, or the live element count of a collection value has
    /// drifted from the snapshot taken at write time. In-place element
    /// replacement keeps the count and stays invisible; that limitation
    /// is what keeps this check O(1).
    fn is_changed(&self, current_generation: u64) -> bool {
        if self.written_after_init && self.generation == current_generation {
            return true;
        }
        match (self.baseline_len, self.value.collection_len()) {
            (Some(baseline), Some(live)) => live != baseline,
            _ => false,
        }
    }
}

/// Backing store keeping entries in process memory.
///
/// Committing a baseline bumps a generation counter instead of touching
/// entries, so completing initialization costs the same for ten entries
/// as for ten million; change checks compare an entry's recorded
/// generation (and, for collections, its element count snapshot) lazily
/// at read time.
pub struct InMemoryBackingStore {
    entries: DashMap<String, StoreEntry>,
    subscriptions: DashMap<String, SubscriptionCallback>,
    initialization_completed: AtomicBool,
    return_only_changed_values: AtomicBool,
    generation: AtomicU64,
}

impl InMemoryBackingStore {
    /// A store considers itself initialized from the start: a model
    /// built by user code is live immediately. The parse-node hooks
    /// flip this off for the span of payload hydration.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            subscriptions: DashMap::new(),
            initialization_completed: AtomicBool::new(true),
            return_only_changed_values: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    fn notify(&self, key: &str, previous: Option<&StoredValue>, value: &StoredValue) {
        // Snapshot first: a callback may subscribe or unsubscribe, and
        // the map must not be iterated while that happens.
        let callbacks: Vec<SubscriptionCallback> = self
            .subscriptions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for callback in callbacks {
            callback(key, previous, value);
        }
    }
}

impl Default for InMemoryBackingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BackingStore for InMemoryBackingStore {
    fn set(&self, key: &str, value: StoredValue) {
        let entry = StoreEntry {
            baseline_len: value.collection_len(),
            written_after_init: self.initialization_completed(),
            generation: self.generation.load(Ordering::SeqCst),
            value: value.clone(),
        };
        let previous = self
            .entries
            .insert(key.to_string(), entry)
            .map(|old| old.value);
        self.notify(key, previous.as_ref(), &value);
    }

    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.get(key).map(|entry| entry.value().value.clone())
    }

    fn enumerate(&self) -> Vec<(String, StoredValue)> {
        let only_changed = self.return_only_changed_values();
        let generation = self.generation.load(Ordering::SeqCst);
        self.entries
            .iter()
            .filter(|entry| !only_changed || entry.value().is_changed(generation))
            .map(|entry| (entry.key().clone(), entry.value().value.clone()))
            .collect()
    }

    fn enumerate_keys_for_values_changed_to_null(&self) -> Vec<String> {
        let generation = self.generation.load(Ordering::SeqCst);
        self.entries
            .iter()
            .filter(|entry| entry.value().value.is_null() && entry.value().is_changed(generation))
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn subscribe(&self, callback: SubscriptionCallback) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.subscribe_with_id(callback, id.clone());
        id
    }

    fn subscribe_with_id(&self, callback: SubscriptionCallback, subscription_id: String) {
        self.subscriptions.insert(subscription_id, callback);
    }

    fn unsubscribe(&self, subscription_id: &str) {
        self.subscriptions.remove(subscription_id);
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn initialization_completed(&self) -> bool {
        self.initialization_completed.load(Ordering::SeqCst)
    }

    fn set_initialization_completed(&self, completed: bool) {
        let was = self
            .initialization_completed
            .swap(completed, Ordering::SeqCst);
        if completed && !was {
            // New baseline: earlier writes stop counting as changes.
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn return_only_changed_values(&self) -> bool {
        self.return_only_changed_values.load(Ordering::SeqCst)
    }

    fn set_return_only_changed_values(&self, value: bool) {
        self.return_only_changed_values
            .store(value, Ordering::SeqCst);
    }
}

/// Factory producing [`InMemoryBackingStore`] instances.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackingStoreFactory;

impl BackingStoreFactory for InMemoryBackingStoreFactory {
    fn create_backing_store(&self) -> Arc<dyn BackingStore> {
        Arc::new(InMemoryBackingStore::new())
    }
}
