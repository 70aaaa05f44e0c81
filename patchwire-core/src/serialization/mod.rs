//! Serialization seams shared by every wire format.
//!
//! Format adapters implement [`ParseNode`]/[`SerializationWriter`] and
//! their factories; everything else in the runtime programs against
//! these traits. The proxy factories splice before/after hooks into
//! produced nodes and writers by composition, which is how cross-cutting
//! concerns attach to serialization without the formats knowing.

pub mod parsable;
pub mod parse_node;
pub mod proxy;
pub mod registry;
pub mod serialization_writer;

pub use parsable::{Parsable, ParsableFactory, ParsableHook};
pub use parse_node::{ParseNode, ParseNodeFactory};
pub use proxy::{ParseNodeProxyFactory, SerializationWriterProxyFactory};
pub use registry::{ParseNodeFactoryRegistry, SerializationWriterFactoryRegistry};
pub use serialization_writer::{SerializationWriter, SerializationWriterFactory};
