//! Output contracts from the scheduler.
//!
//! A frame carries only the property values that changed this step, keyed by
//! element identity, and a separate list of semantic events. Hosts apply the
//! writes to their own elements.

use serde::{Deserialize, Serialize};

use crate::element::Property;
use crate::ids::{ElementId, SegmentId};
use crate::scheduler::SchedulerState;

/// One property value for one element.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyWrite {
    pub element: ElementId,
    pub property: Property,
    pub value: f32,
}

/// Discrete signals emitted during stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SchedulerEvent {
    SegmentStarted {
        segment: SegmentId,
        label: String,
        time: f32,
    },
    SegmentCompleted {
        segment: SegmentId,
        label: String,
        time: f32,
    },
    TimelineCompleted {
        time: f32,
    },
    TimelineCancelled {
        time: f32,
    },
}

/// Result of one scheduler step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Frame {
    /// Logical clock after the step.
    pub time: f32,
    pub state: SchedulerState,
    #[serde(default)]
    pub writes: Vec<PropertyWrite>,
    #[serde(default)]
    pub events: Vec<SchedulerEvent>,
}

impl Frame {
    pub fn new(time: f32, state: SchedulerState) -> Self {
        Self {
            time,
            state,
            writes: Vec::new(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn push_write(&mut self, write: PropertyWrite) {
        self.writes.push(write);
    }

    #[inline]
    pub fn push_event(&mut self, event: SchedulerEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.events.is_empty()
    }

    /// Last value written for `element`/`property` in this frame.
    pub fn value_of(&self, element: ElementId, property: Property) -> Option<f32> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.element == element && w.property == property)
            .map(|w| w.value)
    }
}
