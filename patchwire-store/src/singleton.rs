//! Process-wide backing-store factory.
//!
//! Model constructors are invoked by generated code the application
//! developer does not author, so there is no dependency-injection path
//! for handing each model a store. The one deliberate piece of global
//! mutable state in the runtime is this slot: a single store-creation
//! capability, swappable at any time, read by every model constructor.

use std::sync::Arc;

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;

use patchwire_core::store::{BackingStore, BackingStoreFactory};

use crate::in_memory::InMemoryBackingStoreFactory;

struct FactoryHolder(Arc<dyn BackingStoreFactory>);

static ACTIVE_FACTORY: Lazy<ArcSwap<FactoryHolder>> = Lazy::new(|| {
    ArcSwap::from_pointee(FactoryHolder(Arc::new(InMemoryBackingStoreFactory)))
});

/// The factory used by models constructed from now on. Defaults to the
/// in-memory implementation.
pub fn backing_store_factory() -> Arc<dyn BackingStoreFactory> {
    ACTIVE_FACTORY.load().0.clone()
}

/// Replace the process-wide factory. The swap is atomic; stores that
/// already exist keep their original implementation.
pub fn set_backing_store_factory(factory: Arc<dyn BackingStoreFactory>) {
    tracing::debug!("replacing process-wide backing store factory");
    ACTIVE_FACTORY.store(Arc::new(FactoryHolder(factory)));
}

/// Create a store from the active factory. This is what generated model
/// constructors call.
pub fn new_backing_store() -> Arc<dyn BackingStore> {
    backing_store_factory().create_backing_store()
}
