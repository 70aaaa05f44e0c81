//! Backing-store contract.

use std::sync::Arc;

use crate::store::value::StoredValue;

/// Callback notified on every store write with (key, previous, new).
pub type SubscriptionCallback =
    Arc<dyn Fn(&str, Option<&StoredValue>, &StoredValue) + Send + Sync>;

/// Per-model key/value store that tracks which keys changed since the
/// store last finished initialization.
///
/// All methods take `&self`; implementations use interior mutability so
/// a model, its parse hooks, and parent-store subscriptions can share
/// one instance. A store is single-writer by design: the owning model
/// drives it for its own lifetime.
pub trait BackingStore: Send + Sync {
    /// Record `value` under `key`, replacing any previous value. The
    /// entry counts as changed iff initialization has completed. Runs
    /// in O(1) with respect to the size of `value`: collection values
    /// only have their element count snapshotted, never their contents
    /// copied or walked. Every subscriber is notified exactly once with
    /// (key, previous, new).
    fn set(&self, key: &str, value: StoredValue);

    /// Current value for `key`. Unknown keys read as `None`, never an
    /// error. Reading does not affect change tracking.
    fn get(&self, key: &str) -> Option<StoredValue>;

    /// All entries, or only the changed ones while
    /// [`BackingStore::return_only_changed_values`] is set. A changed
    /// collection entry carries its live handle, so callers see the
    /// current contents.
    fn enumerate(&self) -> Vec<(String, StoredValue)>;

    /// Keys explicitly written to the null marker since initialization
    /// completed.
    fn enumerate_keys_for_values_changed_to_null(&self) -> Vec<String>;

    /// Register `callback` under a fresh id and return the id.
    fn subscribe(&self, callback: SubscriptionCallback) -> String;

    /// Register `callback` under a caller-chosen id, replacing any
    /// callback already registered under it.
    fn subscribe_with_id(&self, callback: SubscriptionCallback, subscription_id: String);

    /// Remove the subscription with the given id, if present.
    fn unsubscribe(&self, subscription_id: &str);

    /// Drop every tracked value. Subscriptions stay registered.
    fn clear(&self);

    /// Whether the owning model has finished initial population from a
    /// payload. While false, writes are hydration, not user changes.
    fn initialization_completed(&self) -> bool;

    /// Flip the initial-population state. Completing initialization
    /// commits a new change baseline and is O(1) regardless of how many
    /// entries the store holds.
    fn set_initialization_completed(&self, completed: bool);

    /// Whether reads are filtered down to changed entries.
    fn return_only_changed_values(&self) -> bool;

    /// Toggle the changed-entries filter, typically around a
    /// serialization pass.
    fn set_return_only_changed_values(&self, value: bool);
}
