//! Dirty propagation across nested backed models.

use std::sync::Arc;

use patchwire_core::store::{BackedModel, BackingStore};

/// Subscribe `child`'s store to `parent` so any later write inside the
/// child re-marks `key` as changed on the parent.
///
/// Models call this when assigning another backed model as a property
/// value; the child's change then surfaces at the parent's key without
/// the parent re-reading the child. Returns the subscription id so the
/// caller can disconnect when the property is reassigned.
///
/// The subscription only holds the parent weakly. The parent holds the
/// child value, the child's store holds this callback; a strong
/// reference back to the parent would close that loop into a cycle
/// neither store could ever drop.
pub fn connect_nested_store(
    parent: Arc<dyn BackingStore>,
    key: impl Into<String>,
    child: &dyn BackedModel,
) -> String {
    let key = key.into();
    let parent = Arc::downgrade(&parent);
    child.backing_store().subscribe(Arc::new(move |_child_key, _previous, _new| {
        let Some(parent) = parent.upgrade() else {
            return;
        };
        // Re-record the pointer entry under the current baseline.
        if let Some(current) = parent.get(&key) {
            parent.set(&key, current);
        }
    }))
}
