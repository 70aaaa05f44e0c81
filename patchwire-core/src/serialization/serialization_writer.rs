//! Serialization-writer abstraction for producing wire payloads.

use std::any::Any;

use crate::error::WireError;
use crate::serialization::parsable::{Parsable, ParsableHook};

/// Incrementally builds a wire payload.
///
/// Implementations must fire the object-serialization hooks around every
/// object they write, including nested ones, so a hook can adjust a
/// model's state for exactly the span of its own serialization.
pub trait SerializationWriter: Send {
    fn write_string_value(&mut self, key: &str, value: &str) -> Result<(), WireError>;
    fn write_bool_value(&mut self, key: &str, value: bool) -> Result<(), WireError>;
    fn write_i64_value(&mut self, key: &str, value: i64) -> Result<(), WireError>;
    fn write_f64_value(&mut self, key: &str, value: f64) -> Result<(), WireError>;

    /// Write a format-independent value under `key`.
    fn write_raw_value(&mut self, key: &str, value: &serde_json::Value) -> Result<(), WireError>;

    /// Write an explicit null under `key`.
    fn write_null_value(&mut self, key: &str) -> Result<(), WireError>;

    /// Write a collection of scalar values under `key`.
    fn write_collection_of_raw_values(
        &mut self,
        key: &str,
        values: &[serde_json::Value],
    ) -> Result<(), WireError>;

    /// Write a nested object, firing the object-serialization hooks
    /// around it. A `None` key writes the payload's root object.
    fn write_object_value(
        &mut self,
        key: Option<&str>,
        value: &dyn Parsable,
    ) -> Result<(), WireError>;

    /// Write a collection of objects under `key`. Hooks fire per
    /// element, exactly as in [`SerializationWriter::write_object_value`].
    fn write_collection_of_object_values(
        &mut self,
        key: &str,
        values: &[&dyn Parsable],
    ) -> Result<(), WireError>;

    /// The serialized payload accumulated so far.
    fn serialized_content(&mut self) -> Result<Vec<u8>, WireError>;

    fn on_before_object_serialization(&self) -> Option<ParsableHook>;
    fn set_on_before_object_serialization(&mut self, hook: Option<ParsableHook>);
    fn on_after_object_serialization(&self) -> Option<ParsableHook>;
    fn set_on_after_object_serialization(&mut self, hook: Option<ParsableHook>);
}

/// Creates serialization writers for a given content type.
pub trait SerializationWriterFactory: Send + Sync {
    /// Content type this factory can produce, e.g. `application/json`.
    fn valid_content_type(&self) -> String;

    /// Produce a fresh writer for the content type.
    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, WireError>;

    /// Type-erased view used by registries and activation code to
    /// recognize wrappers and registries without unwrapping them.
    fn as_any(&self) -> &dyn Any;
}
