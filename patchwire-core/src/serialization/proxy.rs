//! Generic proxy factories that splice hooks into produced nodes and
//! writers.
//!
//! A proxy wraps a concrete format factory plus an on-before and an
//! on-after callback. Hooks are combined by composition, so independent
//! concerns (store activation, auditing, metrics) can stack over the
//! same factory without knowing about each other and without firing
//! twice when an already-wrapped factory is wrapped again by a
//! different concern.

use std::any::Any;
use std::sync::Arc;

use crate::error::WireError;
use crate::serialization::parsable::ParsableHook;
use crate::serialization::parse_node::{ParseNode, ParseNodeFactory};
use crate::serialization::serialization_writer::{
    SerializationWriter, SerializationWriterFactory,
};

/// Chain two optional hooks: `first` runs, then `then`.
fn compose(first: Option<ParsableHook>, then: Option<ParsableHook>) -> Option<ParsableHook> {
    match (first, then) {
        (Some(first), Some(then)) => Some(Arc::new(move |model| {
            first(model);
            then(model);
        })),
        (Some(first), None) => Some(first),
        (None, then) => then,
    }
}

/// Decorator over a [`ParseNodeFactory`] that installs the given hooks
/// on every node it produces, ahead of whatever hooks the node already
/// carries.
pub struct ParseNodeProxyFactory {
    concrete: Arc<dyn ParseNodeFactory>,
    on_before: Option<ParsableHook>,
    on_after: Option<ParsableHook>,
}

impl ParseNodeProxyFactory {
    /// Wrap `concrete` with the given callbacks.
    pub fn new(
        concrete: Arc<dyn ParseNodeFactory>,
        on_before: Option<ParsableHook>,
        on_after: Option<ParsableHook>,
    ) -> Self {
        Self {
            concrete,
            on_before,
            on_after,
        }
    }

    /// The wrapped factory.
    pub fn concrete(&self) -> &Arc<dyn ParseNodeFactory> {
        &self.concrete
    }
}

impl ParseNodeFactory for ParseNodeProxyFactory {
    fn valid_content_type(&self) -> String {
        self.concrete.valid_content_type()
    }

    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, WireError> {
        let mut node = self.concrete.get_root_parse_node(content_type, content)?;
        node.set_on_before_assign_field_values(compose(
            self.on_before.clone(),
            node.on_before_assign_field_values(),
        ));
        node.set_on_after_assign_field_values(compose(
            self.on_after.clone(),
            node.on_after_assign_field_values(),
        ));
        Ok(node)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Decorator over a [`SerializationWriterFactory`] that installs the
/// given hooks on every writer it produces, ahead of whatever hooks the
/// writer already carries.
pub struct SerializationWriterProxyFactory {
    concrete: Arc<dyn SerializationWriterFactory>,
    on_before: Option<ParsableHook>,
    on_after: Option<ParsableHook>,
}

impl SerializationWriterProxyFactory {
    /// Wrap `concrete` with the given callbacks.
    pub fn new(
        concrete: Arc<dyn SerializationWriterFactory>,
        on_before: Option<ParsableHook>,
        on_after: Option<ParsableHook>,
    ) -> Self {
        Self {
            concrete,
            on_before,
            on_after,
        }
    }

    /// The wrapped factory.
    pub fn concrete(&self) -> &Arc<dyn SerializationWriterFactory> {
        &self.concrete
    }
}

impl SerializationWriterFactory for SerializationWriterProxyFactory {
    fn valid_content_type(&self) -> String {
        self.concrete.valid_content_type()
    }

    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, WireError> {
        let mut writer = self.concrete.get_serialization_writer(content_type)?;
        writer.set_on_before_object_serialization(compose(
            self.on_before.clone(),
            writer.on_before_object_serialization(),
        ));
        writer.set_on_after_object_serialization(compose(
            self.on_after.clone(),
            writer.on_after_object_serialization(),
        ));
        Ok(writer)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
