//! Absolute-time schedule resolved once from a timeline.
//!
//! Chained segment `i+1` starts at `end(i) + offset(i+1)`, clamped at 0; the
//! first chained segment starts at `max(0, offset)`. Detached segments start at
//! their delay. Times come from declared durations only, so sampling the
//! schedule at a given time is a pure function.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::element::Property;
use crate::ids::ElementId;
use crate::interp::functions::lerp_f32;
use crate::outputs::PropertyWrite;
use crate::timeline::{AnimationSegment, DetachedSegment, Timeline};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSegment {
    pub segment: AnimationSegment,
    pub start: f32,
    pub end: f32,
    pub detached: bool,
}

impl ScheduledSegment {
    #[inline]
    pub fn has_started(&self, time: f32) -> bool {
        time >= self.start
    }

    #[inline]
    pub fn has_ended(&self, time: f32) -> bool {
        time >= self.end
    }

    /// Linear progress in [0,1] at absolute `time`.
    pub fn progress(&self, time: f32) -> f32 {
        if time < self.start {
            0.0
        } else if self.segment.duration <= 0.0 || time >= self.end {
            1.0
        } else {
            (time - self.start) / self.segment.duration
        }
    }

    /// Eased value of `property` at `time`, if this segment animates it.
    pub fn value_at(&self, property: Property, time: f32) -> Option<f32> {
        let from = self.segment.from.get(property)?;
        let to = self.segment.to.get(property).unwrap_or(from);
        let eased = self.segment.easing.sample(self.progress(time));
        Some(lerp_f32(from, to, eased))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    chained: Vec<ScheduledSegment>,
    detached: Vec<ScheduledSegment>,
}

impl Schedule {
    pub fn resolve(chain: &[AnimationSegment], detached: &[DetachedSegment]) -> Self {
        let mut cursor = 0.0f32;
        let chained = chain
            .iter()
            .map(|seg| {
                let start = (cursor + seg.offset).max(0.0);
                let end = start + seg.duration;
                cursor = end;
                ScheduledSegment {
                    segment: seg.clone(),
                    start,
                    end,
                    detached: false,
                }
            })
            .collect();
        let detached = detached
            .iter()
            .map(|d| ScheduledSegment {
                segment: d.segment.clone(),
                start: d.delay,
                end: d.delay + d.segment.duration,
                detached: true,
            })
            .collect();
        Self { chained, detached }
    }

    pub fn from_timeline(timeline: &Timeline) -> Self {
        Self::resolve(timeline.chain(), timeline.detached())
    }

    pub fn chained(&self) -> &[ScheduledSegment] {
        &self.chained
    }

    pub fn detached(&self) -> &[ScheduledSegment] {
        &self.detached
    }

    /// Chained segments first, then detached, each in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledSegment> {
        self.chained.iter().chain(self.detached.iter())
    }

    pub fn find(&self, label: &str) -> Option<&ScheduledSegment> {
        self.iter().find(|s| s.segment.label == label)
    }

    /// End of the terminal chained segment; completion fires here.
    pub fn completion_time(&self) -> f32 {
        self.chained.last().map(|s| s.end).unwrap_or(0.0)
    }

    /// Latest end across chained and detached segments.
    pub fn total_duration(&self) -> f32 {
        self.iter().map(|s| s.end).fold(0.0, f32::max)
    }

    /// Every element/property value at absolute `time`.
    ///
    /// Among started segments the one that started last wins. A property no
    /// started segment writes shows the `from` value of the earliest pending
    /// segment that animates it.
    pub fn sample(&self, time: f32) -> Vec<PropertyWrite> {
        let mut ordered: Vec<&ScheduledSegment> = self.iter().collect();
        ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut index: HashMap<(ElementId, Property), usize> = HashMap::new();
        let mut writes: Vec<PropertyWrite> = Vec::new();
        for seg in ordered {
            let started = seg.has_started(time);
            for target in &seg.segment.targets {
                for property in seg.segment.from.properties() {
                    let Some(value) = seg.value_at(property, time) else {
                        continue;
                    };
                    match index.get(&(*target, property)) {
                        Some(&i) => {
                            if started {
                                writes[i].value = value;
                            }
                        }
                        None => {
                            index.insert((*target, property), writes.len());
                            writes.push(PropertyWrite {
                                element: *target,
                                property,
                                value,
                            });
                        }
                    }
                }
            }
        }
        writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::PropertySet;

    fn fade(target: ElementId, from: f32, to: f32, duration: f32, offset: f32) -> AnimationSegment {
        AnimationSegment::new("fade", vec![target])
            .from_to(
                PropertySet::new().with(Property::Opacity, from),
                PropertySet::new().with(Property::Opacity, to),
            )
            .duration(duration)
            .offset(offset)
    }

    #[test]
    fn leading_negative_offset_clamps_to_zero() {
        let el = ElementId::new();
        let s = Schedule::resolve(&[fade(el, 0.0, 1.0, 1.0, -0.5)], &[]);
        assert_eq!(s.chained()[0].start, 0.0);
        assert_eq!(s.completion_time(), 1.0);
    }

    #[test]
    fn later_started_segment_wins_shared_property() {
        let el = ElementId::new();
        let chain = [fade(el, 0.0, 1.0, 1.0, 0.0), fade(el, 1.0, 0.0, 1.0, 0.0)];
        let s = Schedule::resolve(&chain, &[]);
        // before the second segment starts, the first one drives opacity
        let w = s.sample(0.5);
        assert_eq!(w.len(), 1);
        assert!((w[0].value - 0.5).abs() < 1e-6);
        let w = s.sample(1.5);
        assert!((w[0].value - 0.5).abs() < 1e-6);
        let w = s.sample(2.0);
        assert_eq!(w[0].value, 0.0);
    }

    #[test]
    fn pending_segments_render_from_values() {
        let el = ElementId::new();
        let s = Schedule::resolve(&[fade(el, 0.25, 1.0, 1.0, 2.0)], &[]);
        let w = s.sample(0.0);
        assert_eq!(w[0].value, 0.25);
    }
}
