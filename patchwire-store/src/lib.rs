//! # Patchwire Store
//!
//! Built-in backing store for the Patchwire runtime.
//!
//! This crate carries the pieces a generated client wires together to
//! get transparent partial-update tracking:
//! - [`InMemoryBackingStore`]: the default per-model change-tracking store
//! - the process-wide factory slot model constructors read
//! - the activation entry points that upgrade format factories (or whole
//!   registries) to backing-store-aware versions
//! - [`connect_nested_store`] for surfacing nested-model changes at the
//!   parent's key

pub mod activation;
pub mod in_memory;
pub mod nested;
pub mod singleton;

// Re-exports
pub use activation::{
    enable_backing_store_for_parse_node_factory,
    enable_backing_store_for_serialization_writer_factory, BackingStoreParseNodeFactory,
    BackingStoreSerializationWriterFactory,
};
pub use in_memory::{InMemoryBackingStore, InMemoryBackingStoreFactory};
pub use nested::connect_nested_store;
pub use singleton::{backing_store_factory, new_backing_store, set_backing_store_factory};
