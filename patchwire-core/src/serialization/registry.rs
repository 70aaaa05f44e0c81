//! Content-type registries for parse-node and writer factories.
//!
//! A registry maps content types to concrete factories and is itself a
//! factory, so callers can hold one seam regardless of how many formats
//! are wired in. Each registry has a process-wide default instance that
//! generated client bootstrap code populates.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::WireError;
use crate::serialization::parse_node::{ParseNode, ParseNodeFactory};
use crate::serialization::serialization_writer::{
    SerializationWriter, SerializationWriterFactory,
};

/// Strip content-type parameters, e.g. `application/json; charset=utf-8`
/// down to `application/json`.
fn normalize_content_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

/// Registry of parse-node factories keyed by content type.
#[derive(Default)]
pub struct ParseNodeFactoryRegistry {
    factories: DashMap<String, Arc<dyn ParseNodeFactory>>,
}

impl ParseNodeFactoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Process-wide default registry.
    pub fn default_instance() -> &'static ParseNodeFactoryRegistry {
        static INSTANCE: Lazy<ParseNodeFactoryRegistry> =
            Lazy::new(ParseNodeFactoryRegistry::new);
        &INSTANCE
    }

    /// Register `factory` under its own content type, replacing any
    /// previous registration for that type.
    pub fn register(&self, factory: Arc<dyn ParseNodeFactory>) {
        let content_type = factory.valid_content_type();
        tracing::debug!(%content_type, "registering parse node factory");
        self.factories.insert(content_type, factory);
    }

    /// The factory registered for `content_type`, if any. Lookup
    /// ignores content-type parameters.
    pub fn factory_for(&self, content_type: &str) -> Option<Arc<dyn ParseNodeFactory>> {
        self.factories
            .get(normalize_content_type(content_type))
            .map(|entry| entry.value().clone())
    }

    /// Registered content types.
    pub fn content_types(&self) -> Vec<String> {
        self.factories
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Visit every registered factory, replacing it when `replace`
    /// returns a substitute. Used by activation code to upgrade mapped
    /// factories in place instead of wrapping the registry itself.
    pub fn replace_each<F>(&self, replace: F)
    where
        F: Fn(&Arc<dyn ParseNodeFactory>) -> Option<Arc<dyn ParseNodeFactory>>,
    {
        let content_types = self.content_types();
        for content_type in content_types {
            let current = self
                .factories
                .get(&content_type)
                .map(|entry| entry.value().clone());
            if let Some(current) = current {
                if let Some(substitute) = replace(&current) {
                    self.factories.insert(content_type, substitute);
                }
            }
        }
    }
}

impl ParseNodeFactory for ParseNodeFactoryRegistry {
    fn valid_content_type(&self) -> String {
        self.content_types().join(", ")
    }

    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, WireError> {
        if content_type.is_empty() {
            return Err(WireError::EmptyContentType);
        }
        let factory = self
            .factory_for(content_type)
            .ok_or_else(|| WireError::NoFactoryForContentType(content_type.to_string()))?;
        factory.get_root_parse_node(content_type, content)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Registry of serialization-writer factories keyed by content type.
#[derive(Default)]
pub struct SerializationWriterFactoryRegistry {
    factories: DashMap<String, Arc<dyn SerializationWriterFactory>>,
}

impl SerializationWriterFactoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Process-wide default registry.
    pub fn default_instance() -> &'static SerializationWriterFactoryRegistry {
        static INSTANCE: Lazy<SerializationWriterFactoryRegistry> =
            Lazy::new(SerializationWriterFactoryRegistry::new);
        &INSTANCE
    }

    /// Register `factory` under its own content type, replacing any
    /// previous registration for that type.
    pub fn register(&self, factory: Arc<dyn SerializationWriterFactory>) {
        let content_type = factory.valid_content_type();
        tracing::debug!(%content_type, "registering serialization writer factory");
        self.factories.insert(content_type, factory);
    }

    /// The factory registered for `content_type`, if any. Lookup
    /// ignores content-type parameters.
    pub fn factory_for(&self, content_type: &str) -> Option<Arc<dyn SerializationWriterFactory>> {
        self.factories
            .get(normalize_content_type(content_type))
            .map(|entry| entry.value().clone())
    }

    /// Registered content types.
    pub fn content_types(&self) -> Vec<String> {
        self.factories
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Visit every registered factory, replacing it when `replace`
    /// returns a substitute.
    pub fn replace_each<F>(&self, replace: F)
    where
        F: Fn(&Arc<dyn SerializationWriterFactory>) -> Option<Arc<dyn SerializationWriterFactory>>,
    {
        let content_types = self.content_types();
        for content_type in content_types {
            let current = self
                .factories
                .get(&content_type)
                .map(|entry| entry.value().clone());
            if let Some(current) = current {
                if let Some(substitute) = replace(&current) {
                    self.factories.insert(content_type, substitute);
                }
            }
        }
    }
}

impl SerializationWriterFactory for SerializationWriterFactoryRegistry {
    fn valid_content_type(&self) -> String {
        self.content_types().join(", ")
    }

    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, WireError> {
        if content_type.is_empty() {
            return Err(WireError::EmptyContentType);
        }
        let factory = self
            .factory_for(content_type)
            .ok_or_else(|| WireError::NoFactoryForContentType(content_type.to_string()))?;
        factory.get_serialization_writer(content_type)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
