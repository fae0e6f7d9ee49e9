//! Identifiers and simple allocators for core entities.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one visual element owned by the host.
///
/// The nil UUID never names a real element; registries reject it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub Uuid);

impl ElementId {
    /// Fresh random identity (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub u32);

/// Monotonic allocator for SegmentId.
/// Dense indices keep segment ids stable within one timeline.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_segment: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_segment(&mut self) -> SegmentId {
        let id = SegmentId(self.next_segment);
        self.next_segment = self.next_segment.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_segment(), SegmentId(0));
        assert_eq!(alloc.alloc_segment(), SegmentId(1));
        alloc.reset();
        assert_eq!(alloc.alloc_segment(), SegmentId(0));
    }

    #[test]
    fn element_ids_are_unique_and_not_nil() {
        let a = ElementId::new();
        let b = ElementId::new();
        assert_ne!(a, b);
        assert!(!a.is_nil());
        assert!(ElementId::nil().is_nil());
    }
}
