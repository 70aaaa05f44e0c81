//! # Patchwire Core
//!
//! Core abstractions for the Patchwire client runtime.
//!
//! This crate provides the seams a generated API client programs
//! against: the parse-node and serialization-writer contracts with
//! their factories and content-type registries, the hook-splicing proxy
//! factories, and the backing-store contracts that give models
//! transparent partial-update tracking.

pub mod error;
pub mod serialization;
pub mod store;

// Re-exports
pub use error::WireError;
pub use serialization::{
    Parsable, ParsableFactory, ParsableHook, ParseNode, ParseNodeFactory,
    ParseNodeFactoryRegistry, ParseNodeProxyFactory, SerializationWriter,
    SerializationWriterFactory, SerializationWriterFactoryRegistry,
    SerializationWriterProxyFactory,
};
pub use store::{
    BackedModel, BackingStore, BackingStoreFactory, CollectionHandle, StoredValue,
    SubscriptionCallback,
};

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, WireError>;
