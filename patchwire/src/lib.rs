//! # Patchwire
//!
//! Client runtime for generated API clients with transparent
//! partial-update tracking.
//!
//! Patchwire represents server-described models as host objects whose
//! properties live in a per-model backing store. The store knows which
//! keys changed since the model finished hydrating, so a generated
//! client can emit PATCH-style payloads containing only changed fields,
//! without the model author writing diff logic and without the wire
//! format knowing the store exists.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! patchwire = { version = "0.1", features = ["store"] }
//! ```
//!
//! ```ignore
//! use patchwire::prelude::*;
//! use patchwire::backing::{
//!     enable_backing_store_for_parse_node_factory,
//!     enable_backing_store_for_serialization_writer_factory,
//! };
//!
//! // Upgrade the format factories once during client bootstrap.
//! let parse_factory = enable_backing_store_for_parse_node_factory(json_parse_factory);
//! let writer_factory = enable_backing_store_for_serialization_writer_factory(json_writer_factory);
//!
//! // Hydrate a model; change tracking resumes once population ends.
//! let node = parse_factory.get_root_parse_node("application/json", payload)?;
//! let user = node.get_object_value(User::create_from_node)?;
//!
//! // Mutate, then serialize only what changed.
//! user.set_display_name("Maya");
//! let mut writer = writer_factory.get_serialization_writer("application/json")?;
//! writer.write_object_value(None, &*user)?;
//! let patch_body = writer.serialized_content()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: includes `store`
//! - `store`: in-memory backing store, factory singleton, activation
//! - `full`: all features enabled

// Re-export core types and traits
pub use patchwire_core::*;

// Re-export the store crate under `backing`
#[cfg(feature = "patchwire-store")]
pub mod backing {
    //! Built-in backing store and activation entry points.
    pub use patchwire_store::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude module containing the most commonly used types and traits.
    //!
    //! ```
    //! use patchwire::prelude::*;
    //! ```

    pub use crate::{
        BackedModel, BackingStore, BackingStoreFactory, Parsable, ParseNode, ParseNodeFactory,
        Result, SerializationWriter, SerializationWriterFactory, StoredValue, WireError,
    };

    #[cfg(feature = "patchwire-store")]
    pub use crate::backing::{
        connect_nested_store, enable_backing_store_for_parse_node_factory,
        enable_backing_store_for_serialization_writer_factory, new_backing_store,
        InMemoryBackingStore, InMemoryBackingStoreFactory,
    };
}
