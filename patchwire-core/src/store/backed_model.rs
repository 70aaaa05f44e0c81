//! Contract for models whose properties live in a backing store.

use std::sync::Arc;

use crate::serialization::parsable::Parsable;
use crate::store::backing_store::BackingStore;

/// A model that routes every property access through a backing store.
///
/// Generated models obtain their store from the process-wide factory at
/// construction and keep it for the model's lifetime. A model that
/// assigns another backed model (or a collection of them) as a property
/// is responsible for subscribing the nested store to its own, so deep
/// changes surface at the parent's key.
pub trait BackedModel: Parsable {
    /// The store holding this model's property values.
    fn backing_store(&self) -> Arc<dyn BackingStore>;

    /// View of this model as a plain parsable.
    fn as_parsable(&self) -> &dyn Parsable;
}
