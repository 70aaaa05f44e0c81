//! Backing-store activation for parse-node and writer factories.
//!
//! Activation is the one integration point between formats and the
//! store: wrap a format factory (or walk a registry) once, and every
//! node or writer it produces carries the hooks that drive a backed
//! model's store through hydration and serialization. Format adapters
//! themselves stay store-unaware.

use std::any::Any;
use std::sync::Arc;

use patchwire_core::error::WireError;
use patchwire_core::serialization::{
    Parsable, ParsableHook, ParseNode, ParseNodeFactory, ParseNodeFactoryRegistry,
    ParseNodeProxyFactory, SerializationWriter, SerializationWriterFactory,
    SerializationWriterFactoryRegistry, SerializationWriterProxyFactory,
};

/// Parse-node factory that suspends change tracking on a model's store
/// while its fields are populated and resumes it afterwards, so
/// hydration from the wire is never recorded as user change.
pub struct BackingStoreParseNodeFactory {
    proxy: ParseNodeProxyFactory,
}

impl BackingStoreParseNodeFactory {
    pub fn new(concrete: Arc<dyn ParseNodeFactory>) -> Self {
        let on_before: ParsableHook = Arc::new(|model: &dyn Parsable| {
            if let Some(backed) = model.as_backed_model() {
                let store = backed.backing_store();
                store.set_initialization_completed(false);
                store.set_return_only_changed_values(false);
            }
        });
        let on_after: ParsableHook = Arc::new(|model: &dyn Parsable| {
            if let Some(backed) = model.as_backed_model() {
                backed.backing_store().set_initialization_completed(true);
            }
        });
        Self {
            proxy: ParseNodeProxyFactory::new(concrete, Some(on_before), Some(on_after)),
        }
    }
}

impl ParseNodeFactory for BackingStoreParseNodeFactory {
    fn valid_content_type(&self) -> String {
        self.proxy.valid_content_type()
    }

    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, WireError> {
        self.proxy.get_root_parse_node(content_type, content)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Serialization-writer factory that narrows a model's store to changed
/// values for exactly the span of that model's serialization.
///
/// Serializing does not commit a new baseline: until the store is
/// reinitialized, a later filtered pass emits the same changes again.
pub struct BackingStoreSerializationWriterFactory {
    proxy: SerializationWriterProxyFactory,
}

impl BackingStoreSerializationWriterFactory {
    pub fn new(concrete: Arc<dyn SerializationWriterFactory>) -> Self {
        let on_before: ParsableHook = Arc::new(|model: &dyn Parsable| {
            if let Some(backed) = model.as_backed_model() {
                backed.backing_store().set_return_only_changed_values(true);
            }
        });
        let on_after: ParsableHook = Arc::new(|model: &dyn Parsable| {
            if let Some(backed) = model.as_backed_model() {
                backed
                    .backing_store()
                    .set_return_only_changed_values(false);
            }
        });
        Self {
            proxy: SerializationWriterProxyFactory::new(concrete, Some(on_before), Some(on_after)),
        }
    }
}

impl SerializationWriterFactory for BackingStoreSerializationWriterFactory {
    fn valid_content_type(&self) -> String {
        self.proxy.valid_content_type()
    }

    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, WireError> {
        self.proxy.get_serialization_writer(content_type)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Upgrade `factory` to a backing-store-aware version.
///
/// Already-aware factories come back untouched, so repeated calls never
/// stack wrapper layers. Registries are walked, not wrapped: every
/// mapped factory is upgraded in place, and the process-wide default
/// registry is upgraded along the way.
pub fn enable_backing_store_for_parse_node_factory(
    factory: Arc<dyn ParseNodeFactory>,
) -> Arc<dyn ParseNodeFactory> {
    if factory.as_any().is::<BackingStoreParseNodeFactory>() {
        return factory;
    }
    if let Some(registry) = factory.as_any().downcast_ref::<ParseNodeFactoryRegistry>() {
        upgrade_parse_node_registry(registry);
        upgrade_parse_node_registry(ParseNodeFactoryRegistry::default_instance());
        return factory;
    }
    tracing::debug!(
        content_type = %factory.valid_content_type(),
        "enabling backing store for parse node factory"
    );
    Arc::new(BackingStoreParseNodeFactory::new(factory))
}

/// Upgrade `factory` to a backing-store-aware version. Mirrors
/// [`enable_backing_store_for_parse_node_factory`] for the writing side.
pub fn enable_backing_store_for_serialization_writer_factory(
    factory: Arc<dyn SerializationWriterFactory>,
) -> Arc<dyn SerializationWriterFactory> {
    if factory.as_any().is::<BackingStoreSerializationWriterFactory>() {
        return factory;
    }
    if let Some(registry) = factory
        .as_any()
        .downcast_ref::<SerializationWriterFactoryRegistry>()
    {
        upgrade_writer_registry(registry);
        upgrade_writer_registry(SerializationWriterFactoryRegistry::default_instance());
        return factory;
    }
    tracing::debug!(
        content_type = %factory.valid_content_type(),
        "enabling backing store for serialization writer factory"
    );
    Arc::new(BackingStoreSerializationWriterFactory::new(factory))
}

fn upgrade_parse_node_registry(registry: &ParseNodeFactoryRegistry) {
    registry.replace_each(|current| {
        if current.as_any().is::<BackingStoreParseNodeFactory>()
            || current.as_any().is::<ParseNodeFactoryRegistry>()
        {
            return None;
        }
        Some(Arc::new(BackingStoreParseNodeFactory::new(current.clone()))
            as Arc<dyn ParseNodeFactory>)
    });
}

fn upgrade_writer_registry(registry: &SerializationWriterFactoryRegistry) {
    registry.replace_each(|current| {
        if current
            .as_any()
            .is::<BackingStoreSerializationWriterFactory>()
            || current.as_any().is::<SerializationWriterFactoryRegistry>()
        {
            return None;
        }
        Some(
            Arc::new(BackingStoreSerializationWriterFactory::new(current.clone()))
                as Arc<dyn SerializationWriterFactory>,
        )
    });
}
