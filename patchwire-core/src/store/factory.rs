//! Store creation capability.

use std::sync::Arc;

use crate::store::backing_store::BackingStore;

/// Creates a fresh backing store for a newly constructed model.
///
/// Deliberately a single capability: the process-wide slot holding the
/// active factory must stay a store-creation seam and never grow into a
/// general service locator.
pub trait BackingStoreFactory: Send + Sync {
    /// Produce a store for one model instance.
    fn create_backing_store(&self) -> Arc<dyn BackingStore>;
}
