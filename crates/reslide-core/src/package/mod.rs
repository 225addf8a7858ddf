pub mod content_types;
pub mod ooxml;
pub mod parts;
pub mod relationships;

pub use content_types::{content_type_values, ContentTypes};
pub use ooxml::OoxmlPackage;
pub use relationships::{relationship_types, Relationship, RelationshipSet, TargetMode};
