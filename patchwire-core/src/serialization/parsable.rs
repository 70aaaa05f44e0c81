//! Model contract shared by every wire format.

use std::any::Any;
use std::sync::Arc;

use crate::error::WireError;
use crate::serialization::parse_node::ParseNode;
use crate::serialization::serialization_writer::SerializationWriter;
use crate::store::BackedModel;

/// Factory signature for model types.
///
/// Generated models expose a static constructor with this shape; parse
/// nodes call it when materializing an object value, passing the node so
/// the constructor can pick a concrete type from a discriminator field.
pub type ParsableFactory = fn(&dyn ParseNode) -> Result<Box<dyn Parsable>, WireError>;

/// Callback invoked with a model around (de)serialization of its fields.
pub type ParsableHook = Arc<dyn Fn(&dyn Parsable) + Send + Sync>;

/// Contract implemented by every wire-serializable model.
///
/// Generated models implement this; the runtime only ever sees the trait
/// object, so everything that needs per-model behavior (field tables,
/// store access) hangs off these methods.
pub trait Parsable: Send + Sync + 'static {
    /// Populate this model's fields from a parse node.
    fn deserialize_fields(&mut self, node: &dyn ParseNode) -> Result<(), WireError>;

    /// Write this model's fields to the given writer.
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<(), WireError>;

    /// Backing-store view of this model, if it has one.
    ///
    /// Format-agnostic hooks use this to reach a model's store without
    /// knowing the concrete model type.
    fn as_backed_model(&self) -> Option<&dyn BackedModel> {
        None
    }

    /// Type-erased conversion so callers can recover the concrete model
    /// from a dynamic parse result.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}
