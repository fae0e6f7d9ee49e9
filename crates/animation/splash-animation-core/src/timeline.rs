//! Timeline model and builder.
//!
//! A timeline is an ordered chain of segments, each positioned relative to the
//! end of the previous one, plus detached segments positioned from the start of
//! the run. Detached segments never gate completion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::completion::CompletionToken;
use crate::element::{ElementRole, PropertySet};
use crate::ids::{ElementId, IdAllocator, SegmentId};
use crate::interp::Easing;

/// Configuration errors. A timeline that fails validation is never started.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelineError {
    #[error("required {0} element is not registered")]
    MissingElement(ElementRole),
    #[error("segment '{segment}' has invalid duration {value}")]
    InvalidDuration { segment: String, value: f32 },
    #[error("segment '{segment}' has invalid offset {value}")]
    InvalidOffset { segment: String, value: f32 },
    #[error("invalid start delay {0}")]
    InvalidDelay(f32),
    #[error("segment '{segment}' animates different properties in from/to")]
    MismatchedProperties { segment: String },
    #[error("{name} range [{min}, {max}) is invalid")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{particles} particles registered but {params} parameter sets supplied")]
    ParticleCountMismatch { particles: usize, params: usize },
    #[error("timeline has no chained segment to complete on")]
    EmptyChain,
}

/// Transition of one or more elements between two property snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSegment {
    pub id: SegmentId,
    pub label: String,
    /// May be empty; the segment still occupies its time slot.
    pub targets: Vec<ElementId>,
    pub from: PropertySet,
    pub to: PropertySet,
    pub duration: f32,
    pub easing: Easing,
    /// Start relative to the previous chained segment's end. Negative overlaps.
    pub offset: f32,
}

impl AnimationSegment {
    pub fn new(label: impl Into<String>, targets: Vec<ElementId>) -> Self {
        Self {
            id: SegmentId(0),
            label: label.into(),
            targets,
            from: PropertySet::new(),
            to: PropertySet::new(),
            duration: 0.0,
            easing: Easing::Linear,
            offset: 0.0,
        }
    }

    pub fn from_to(mut self, from: PropertySet, to: PropertySet) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    fn validate(&self) -> Result<(), TimelineError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(TimelineError::InvalidDuration {
                segment: self.label.clone(),
                value: self.duration,
            });
        }
        if !self.offset.is_finite() {
            return Err(TimelineError::InvalidOffset {
                segment: self.label.clone(),
                value: self.offset,
            });
        }
        if !self.from.same_keys(&self.to) {
            return Err(TimelineError::MismatchedProperties {
                segment: self.label.clone(),
            });
        }
        Ok(())
    }
}

/// Segment outside the main chain, started `delay` after the run starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetachedSegment {
    pub segment: AnimationSegment,
    pub delay: f32,
}

/// Validated timeline ready to hand to the scheduler.
#[derive(Debug)]
pub struct Timeline {
    chain: Vec<AnimationSegment>,
    detached: Vec<DetachedSegment>,
    completion: CompletionToken,
}

impl Timeline {
    pub fn chain(&self) -> &[AnimationSegment] {
        &self.chain
    }

    pub fn detached(&self) -> &[DetachedSegment] {
        &self.detached
    }

    /// The chained segment whose end completes the run.
    pub fn terminal(&self) -> &AnimationSegment {
        // build() rejects empty chains
        &self.chain[self.chain.len() - 1]
    }

    /// Bind the caller's completion callback to the terminal segment.
    pub fn with_completion(mut self, token: CompletionToken) -> Self {
        self.completion = token;
        self
    }

    pub(crate) fn into_parts(self) -> (Vec<AnimationSegment>, Vec<DetachedSegment>, CompletionToken) {
        (self.chain, self.detached, self.completion)
    }
}

#[derive(Debug, Default)]
pub struct TimelineBuilder {
    ids: IdAllocator,
    chain: Vec<AnimationSegment>,
    detached: Vec<DetachedSegment>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chained segment positioned by its `offset`.
    pub fn then(mut self, mut segment: AnimationSegment) -> Self {
        segment.id = self.ids.alloc_segment();
        self.chain.push(segment);
        self
    }

    /// Add a segment that runs in parallel to the chain.
    pub fn detach(mut self, mut segment: AnimationSegment, delay: f32) -> Self {
        segment.id = self.ids.alloc_segment();
        self.detached.push(DetachedSegment { segment, delay });
        self
    }

    pub fn chained_len(&self) -> usize {
        self.chain.len()
    }

    pub fn build(self) -> Result<Timeline, TimelineError> {
        if self.chain.is_empty() {
            return Err(TimelineError::EmptyChain);
        }
        for seg in &self.chain {
            seg.validate()?;
        }
        for d in &self.detached {
            d.segment.validate()?;
            if !d.delay.is_finite() || d.delay < 0.0 {
                return Err(TimelineError::InvalidDelay(d.delay));
            }
        }
        Ok(Timeline {
            chain: self.chain,
            detached: self.detached,
            completion: CompletionToken::unbound(),
        })
    }
}
