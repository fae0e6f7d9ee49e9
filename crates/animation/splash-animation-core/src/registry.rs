//! Append-only, identity-deduplicating collection of visual elements.
//!
//! Hosts may offer the same element many times (re-renders, remounts). Only
//! the first offer is recorded and first-seen order is kept for the lifetime
//! of the registry.

use indexmap::IndexMap;
use thiserror::Error;

use crate::element::VisualElement;
use crate::ids::ElementId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    #[error("cannot register element with nil identity")]
    InvalidElement,
}

#[derive(Debug, Default, Clone)]
pub struct ElementRegistry {
    elements: IndexMap<ElementId, VisualElement>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `element` unless its identity is already present.
    ///
    /// Returns `Ok(true)` when the element was newly added and `Ok(false)` for a
    /// repeat offer, which has no effect.
    pub fn register(&mut self, element: VisualElement) -> Result<bool, RegistryError> {
        if element.id.is_nil() {
            return Err(RegistryError::InvalidElement);
        }
        if self.elements.contains_key(&element.id) {
            log::debug!("registry: {} {} already registered", element.role, element.id);
            return Ok(false);
        }
        log::debug!(
            "registry: {} {} registered at index {}",
            element.role,
            element.id,
            self.elements.len()
        );
        self.elements.insert(element.id, element);
        Ok(true)
    }

    /// All registered elements in first-registration order.
    pub fn snapshot(&self) -> Vec<VisualElement> {
        self.elements.values().copied().collect()
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.keys().copied().collect()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementRole;

    #[test]
    fn repeated_registration_is_noop() {
        let mut reg = ElementRegistry::new();
        let dot = VisualElement::new(ElementRole::Dot);
        assert_eq!(reg.register(dot), Ok(true));
        for _ in 0..5 {
            assert_eq!(reg.register(dot), Ok(false));
        }
        assert_eq!(reg.snapshot(), vec![dot]);
    }

    #[test]
    fn keeps_first_seen_order_across_remounts() {
        let mut reg = ElementRegistry::new();
        let a = VisualElement::new(ElementRole::Particle);
        let b = VisualElement::new(ElementRole::Particle);
        let c = VisualElement::new(ElementRole::Particle);
        // second render pass re-offers in a different order
        for el in [a, b, c, c, a, b] {
            reg.register(el).unwrap();
        }
        assert_eq!(reg.ids(), vec![a.id, b.id, c.id]);
    }

    #[test]
    fn nil_identity_is_rejected() {
        let mut reg = ElementRegistry::new();
        let bad = VisualElement::with_id(ElementId::nil(), ElementRole::Dot);
        assert_eq!(reg.register(bad), Err(RegistryError::InvalidElement));
        assert!(reg.is_empty());
    }
}
