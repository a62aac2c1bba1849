//! Entity class registry for resolving class ids during encode/decode.
//!
//! The registry maps G.988 class ids to entity classes. It is populated once
//! and only read afterwards, so a shared reference can be used from any
//! number of threads.
//!
//! # Example
//!
//! ```
//! use omci_codec::entity::{catalog::TCONT, EntityRegistry};
//!
//! let mut registry = EntityRegistry::new();
//! registry.register(&TCONT)?;
//!
//! assert_eq!(registry.lookup(262)?.name, "Tcont");
//! assert!(registry.lookup(6).is_err());
//! # Ok::<(), omci_codec::OmciError>(())
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use super::catalog::ENTITY_CLASSES;
use super::class::EntityClass;
use crate::error::{OmciError, Result};

/// Registry mapping class ids to entity classes.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    classes: HashMap<u16, &'static EntityClass>,
}

impl EntityRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every class of the built-in catalog.
    ///
    /// Built on first use and shared afterwards.
    pub fn standard() -> &'static EntityRegistry {
        static STANDARD: OnceLock<EntityRegistry> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let mut registry = EntityRegistry::new();
            for class in ENTITY_CLASSES {
                let registered = registry.register(class);
                debug_assert!(
                    registered.is_ok(),
                    "invalid catalog class {}: {:?}",
                    class.class_id,
                    registered
                );
                if let Err(e) = registered {
                    tracing::warn!("Skipping catalog class {}: {}", class.class_id, e);
                }
            }
            registry
        })
    }

    /// Register an entity class.
    ///
    /// The class is validated first. Registering a class id again replaces
    /// the previous entry.
    pub fn register(&mut self, class: &'static EntityClass) -> Result<()> {
        class.validate()?;
        if self.classes.insert(class.class_id, class).is_some() {
            tracing::debug!("Replaced entity class {} ({})", class.class_id, class.name);
        } else {
            tracing::debug!("Registered entity class {} ({})", class.class_id, class.name);
        }
        Ok(())
    }

    /// Resolve a class id.
    pub fn lookup(&self, class_id: u16) -> Result<&'static EntityClass> {
        self.get(class_id)
            .ok_or(OmciError::UnrecognizedEntityClass(class_id))
    }

    /// Resolve a class id, returning `None` if absent.
    #[inline]
    pub fn get(&self, class_id: u16) -> Option<&'static EntityClass> {
        self.classes.get(&class_id).copied()
    }

    /// Check if a class id is registered.
    #[inline]
    pub fn contains(&self, class_id: u16) -> bool {
        self.classes.contains_key(&class_id)
    }

    /// Get the number of registered classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered class ids in ascending order.
    pub fn class_ids(&self) -> Vec<u16> {
        let mut ids: Vec<u16> = self.classes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
