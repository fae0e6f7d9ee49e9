//! Visual element handles and the animatable property model.
//!
//! Elements are owned by the host rendering layer. The core only keeps their
//! identity and role, and writes numeric property values back through
//! [`crate::outputs::PropertyWrite`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

/// What part of the overlay an element plays.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRole {
    Container,
    Logo,
    Dot,
    Particle,
    ProgressBar,
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementRole::Container => "container",
            ElementRole::Logo => "logo",
            ElementRole::Dot => "dot",
            ElementRole::Particle => "particle",
            ElementRole::ProgressBar => "progress bar",
        };
        f.write_str(s)
    }
}

/// Non-owning handle to a renderable unit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct VisualElement {
    pub id: ElementId,
    pub role: ElementRole,
}

impl VisualElement {
    /// New element with a fresh identity.
    pub fn new(role: ElementRole) -> Self {
        Self {
            id: ElementId::new(),
            role,
        }
    }

    pub fn with_id(id: ElementId, role: ElementRole) -> Self {
        Self { id, role }
    }
}

/// Animatable properties the scheduler writes to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Scale,
    Opacity,
    OffsetX,
    OffsetY,
    /// Degrees.
    Rotation,
    /// 0..1, rendered as 0%..100%.
    WidthFraction,
    /// Percent of the overlay width.
    AnchorLeft,
    /// Percent of the overlay height.
    AnchorTop,
}

/// Ordered property snapshot. Setting a property twice keeps the first slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    values: Vec<(Property, f32)>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, property: Property, value: f32) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: Property, value: f32) {
        match self.values.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.values.push((property, value)),
        }
    }

    pub fn get(&self, property: Property) -> Option<f32> {
        self.values
            .iter()
            .find_map(|(p, v)| if *p == property { Some(*v) } else { None })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, f32)> + '_ {
        self.values.iter().copied()
    }

    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.values.iter().map(|(p, _)| *p)
    }

    /// True when both sets animate exactly the same properties.
    pub fn same_keys(&self, other: &PropertySet) -> bool {
        self.len() == other.len() && self.properties().all(|p| other.get(p).is_some())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut set = PropertySet::new()
            .with(Property::Scale, 0.0)
            .with(Property::Opacity, 0.0);
        set.set(Property::Scale, 2.0);
        let props: Vec<_> = set.iter().collect();
        assert_eq!(props, vec![(Property::Scale, 2.0), (Property::Opacity, 0.0)]);
    }

    #[test]
    fn same_keys_ignores_order() {
        let a = PropertySet::new()
            .with(Property::Scale, 0.0)
            .with(Property::OffsetY, 10.0);
        let b = PropertySet::new()
            .with(Property::OffsetY, 0.0)
            .with(Property::Scale, 1.0);
        let c = PropertySet::new().with(Property::Scale, 1.0);
        assert!(a.same_keys(&b));
        assert!(!a.same_keys(&c));
    }
}
