//! Schema Layer
//!
//! Raw component schemas, the flattened field index built from them, and
//! the sources they are loaded from.

mod index;
mod raw;
mod source;

pub use index::{ComponentSchemaEntry, FieldDescriptor, FieldType, SchemaIndex, Tab};
pub use raw::{RawField, RawSchema, RawSection, RawTab};
pub use source::{JsonSchemaSource, SchemaSource};
