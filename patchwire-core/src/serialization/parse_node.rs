//! Parse-node abstraction for reading wire payloads.

use std::any::Any;

use crate::error::WireError;
use crate::serialization::parsable::{Parsable, ParsableFactory, ParsableHook};

/// A positioned cursor into a parsed wire payload.
///
/// Implementations must fire the assign-field hooks around every object
/// they materialize and hand installed hooks down to child nodes, so the
/// hooks observe nested objects too.
pub trait ParseNode: Send {
    /// Child node for the given identifier, if present. The child
    /// carries the hooks installed on this node.
    fn get_child_node(&self, identifier: &str) -> Result<Option<Box<dyn ParseNode>>, WireError>;

    fn get_string_value(&self) -> Result<Option<String>, WireError>;
    fn get_bool_value(&self) -> Result<Option<bool>, WireError>;
    fn get_i64_value(&self) -> Result<Option<i64>, WireError>;
    fn get_f64_value(&self) -> Result<Option<f64>, WireError>;

    /// The value at this position, independent of the wire format.
    fn get_raw_value(&self) -> Result<serde_json::Value, WireError>;

    /// Collection of scalar values at this position.
    fn get_collection_of_raw_values(&self) -> Result<Vec<serde_json::Value>, WireError>;

    /// Materialize the object at this position with the given factory.
    ///
    /// Fires the before-assign hook once the instance exists, populates
    /// its fields, then fires the after-assign hook.
    fn get_object_value(&self, factory: ParsableFactory) -> Result<Box<dyn Parsable>, WireError>;

    /// Materialize a collection of objects at this position. Hooks fire
    /// per element, exactly as in [`ParseNode::get_object_value`].
    fn get_collection_of_object_values(
        &self,
        factory: ParsableFactory,
    ) -> Result<Vec<Box<dyn Parsable>>, WireError>;

    fn on_before_assign_field_values(&self) -> Option<ParsableHook>;
    fn set_on_before_assign_field_values(&mut self, hook: Option<ParsableHook>);
    fn on_after_assign_field_values(&self) -> Option<ParsableHook>;
    fn set_on_after_assign_field_values(&mut self, hook: Option<ParsableHook>);
}

/// Creates parse nodes for payloads of a given content type.
pub trait ParseNodeFactory: Send + Sync {
    /// Content type this factory can parse, e.g. `application/json`.
    fn valid_content_type(&self) -> String;

    /// Produce a root parse node for the payload.
    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, WireError>;

    /// Type-erased view used by registries and activation code to
    /// recognize wrappers and registries without unwrapping them.
    fn as_any(&self) -> &dyn Any;
}
