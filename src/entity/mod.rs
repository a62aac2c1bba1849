//! Managed-entity model.
//!
//! - [`Attribute`] describes one field: name, wire kind, access rights
//! - [`EntityClass`] is an ordered attribute catalog with mask arithmetic
//! - [`Entity`] is one instance with sparse values
//! - [`EntityRegistry`] resolves class ids to classes during decode
//! - [`catalog`] holds the built-in classes

mod attribute;
pub mod catalog;
mod class;
mod instance;
mod registry;

pub use attribute::{
    Access, Attribute, AttributeKind, AttributeMap, AttributeValue, AttributeWidth,
    MANAGED_ENTITY_ID,
};
pub use class::{EntityClass, MAX_ATTRIBUTE_ORDINAL};
pub use instance::Entity;
pub use registry::EntityRegistry;
