//! Timeline scheduler: `Idle → Running → Completed | Cancelled`.
//!
//! Driven cooperatively: the host calls [`TimelineScheduler::step`] with the
//! elapsed logical time of each frame. The completion token fires once, in the
//! step where the clock reaches the end of the terminal chained segment.

use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::completion::CompletionToken;
use crate::element::Property;
use crate::ids::ElementId;
use crate::outputs::{Frame, SchedulerEvent};
use crate::schedule::Schedule;
use crate::timeline::Timeline;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SchedulerState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl SchedulerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SchedulerState::Completed | SchedulerState::Cancelled)
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Running => "running",
            SchedulerState::Completed => "completed",
            SchedulerState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Usage errors. A rejected call leaves the scheduler unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("scheduler already started (state: {0})")]
    AlreadyStarted(SchedulerState),
    #[error("scheduler is not running (state: {0})")]
    NotRunning(SchedulerState),
    #[error("invalid step delta {0}")]
    InvalidStep(f32),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum SegmentPhase {
    Pending,
    Active,
    Done,
}

#[derive(Debug)]
struct Run {
    schedule: Schedule,
    /// Parallel to `schedule.iter()`.
    phases: Vec<SegmentPhase>,
    completion: CompletionToken,
    last_written: HashMap<(ElementId, Property), f32>,
}

#[derive(Debug)]
pub struct TimelineScheduler {
    state: SchedulerState,
    clock: f32,
    run: Option<Run>,
}

impl Default for TimelineScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            clock: 0.0,
            run: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Logical time elapsed since `start`.
    pub fn elapsed(&self) -> f32 {
        self.clock
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.run.as_ref().map(|r| &r.schedule)
    }

    /// Take ownership of `timeline` and begin running it at time 0.
    pub fn start(&mut self, timeline: Timeline) -> Result<(), SchedulerError> {
        if self.state != SchedulerState::Idle {
            log::warn!("scheduler: start rejected in state {}", self.state);
            return Err(SchedulerError::AlreadyStarted(self.state));
        }
        let schedule = Schedule::from_timeline(&timeline);
        let (_, _, completion) = timeline.into_parts();
        let phases = vec![SegmentPhase::Pending; schedule.iter().count()];
        log::info!(
            "scheduler: starting {} chained + {} detached segments, completes at {:.3}",
            schedule.chained().len(),
            schedule.detached().len(),
            schedule.completion_time()
        );
        self.run = Some(Run {
            schedule,
            phases,
            completion,
            last_written: HashMap::new(),
        });
        self.clock = 0.0;
        self.state = SchedulerState::Running;
        Ok(())
    }

    /// Advance the clock by `dt` and report what changed.
    pub fn step(&mut self, dt: f32) -> Result<Frame, SchedulerError> {
        if self.state != SchedulerState::Running {
            return Err(SchedulerError::NotRunning(self.state));
        }
        if !dt.is_finite() || dt < 0.0 {
            return Err(SchedulerError::InvalidStep(dt));
        }
        let Some(run) = self.run.as_mut() else {
            return Err(SchedulerError::NotRunning(self.state));
        };
        self.clock += dt;
        let time = self.clock;
        let mut frame = Frame::new(time, SchedulerState::Running);

        for write in run.schedule.sample(time) {
            let key = (write.element, write.property);
            if run.last_written.get(&key) != Some(&write.value) {
                run.last_written.insert(key, write.value);
                frame.push_write(write);
            }
        }

        for (seg, phase) in run.schedule.iter().zip(run.phases.iter_mut()) {
            if *phase == SegmentPhase::Pending && seg.has_started(time) {
                *phase = SegmentPhase::Active;
                log::debug!("scheduler: '{}' started at {:.3}", seg.segment.label, time);
                frame.push_event(SchedulerEvent::SegmentStarted {
                    segment: seg.segment.id,
                    label: seg.segment.label.clone(),
                    time,
                });
            }
            if *phase == SegmentPhase::Active && seg.has_ended(time) {
                *phase = SegmentPhase::Done;
                frame.push_event(SchedulerEvent::SegmentCompleted {
                    segment: seg.segment.id,
                    label: seg.segment.label.clone(),
                    time,
                });
            }
        }

        if time >= run.schedule.completion_time() {
            self.state = SchedulerState::Completed;
            frame.state = SchedulerState::Completed;
            frame.push_event(SchedulerEvent::TimelineCompleted { time });
            log::info!("scheduler: timeline completed at {:.3}", time);
            run.completion.fire();
        }
        Ok(frame)
    }

    /// Stop a running timeline without firing its completion callback.
    pub fn cancel(&mut self) -> Result<Frame, SchedulerError> {
        if self.state != SchedulerState::Running {
            return Err(SchedulerError::NotRunning(self.state));
        }
        if let Some(run) = self.run.as_mut() {
            run.completion.suppress();
        }
        self.state = SchedulerState::Cancelled;
        log::warn!("scheduler: cancelled at {:.3}", self.clock);
        let mut frame = Frame::new(self.clock, SchedulerState::Cancelled);
        frame.push_event(SchedulerEvent::TimelineCancelled { time: self.clock });
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::PropertySet;
    use crate::timeline::{AnimationSegment, TimelineBuilder};
    use std::cell::Cell;
    use std::rc::Rc;

    fn one_segment(duration: f32) -> Timeline {
        TimelineBuilder::new()
            .then(
                AnimationSegment::new("only", vec![ElementId::new()])
                    .from_to(
                        PropertySet::new().with(Property::Opacity, 0.0),
                        PropertySet::new().with(Property::Opacity, 1.0),
                    )
                    .duration(duration),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn step_before_start_is_rejected() {
        let mut sched = TimelineScheduler::new();
        assert_eq!(
            sched.step(0.1).unwrap_err(),
            SchedulerError::NotRunning(SchedulerState::Idle)
        );
    }

    #[test]
    fn invalid_dt_does_not_advance() {
        let mut sched = TimelineScheduler::new();
        sched.start(one_segment(1.0)).unwrap();
        assert!(matches!(sched.step(-0.1), Err(SchedulerError::InvalidStep(_))));
        assert!(matches!(sched.step(f32::NAN), Err(SchedulerError::InvalidStep(_))));
        assert_eq!(sched.elapsed(), 0.0);
        assert!(sched.is_running());
    }

    #[test]
    fn unchanged_values_are_not_rewritten() {
        let mut sched = TimelineScheduler::new();
        sched.start(one_segment(1.0)).unwrap();
        let first = sched.step(0.0).unwrap();
        assert_eq!(first.writes.len(), 1);
        let again = sched.step(0.0).unwrap();
        assert!(again.writes.is_empty());
    }

    #[test]
    fn cancel_suppresses_callback() {
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let mut sched = TimelineScheduler::new();
        sched
            .start(one_segment(1.0).with_completion(CompletionToken::new(move || f.set(true))))
            .unwrap();
        sched.step(0.5).unwrap();
        let frame = sched.cancel().unwrap();
        assert_eq!(frame.state, SchedulerState::Cancelled);
        assert!(sched.step(1.0).is_err());
        assert!(sched.cancel().is_err());
        assert!(!fired.get());
    }
}
