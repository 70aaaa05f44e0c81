//! Backing-store seams.
//!
//! The store is the change-tracking half of the runtime: one instance
//! per model, holding property values plus enough metadata to answer
//! "what changed since the last baseline" without ever walking a
//! payload. This module defines the contracts; the in-memory
//! implementation lives in the store crate.

pub mod backed_model;
pub mod backing_store;
pub mod factory;
pub mod value;

pub use backed_model::BackedModel;
pub use backing_store::{BackingStore, SubscriptionCallback};
pub use factory::BackingStoreFactory;
pub use value::{CollectionHandle, StoredValue};
