//! splash-orchestrator
//!
//! Coordinates one loading-overlay run: the host registers elements as they
//! mount, calls [`LoadingOverlay::trigger`] once rendering settles, then steps
//! frames until the completion callback has fired.

pub mod driver;

use anyhow::Result;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use splash_animation_core::{
    build_loading_timeline, CompletionToken, ElementId, ElementRegistry, ElementRole,
    OverlayElements, Property, PropertyWrite, RandomParameterGenerator, RegistryError, Schedule, SchedulerEvent,
    SchedulerState, SequenceConfig, Timeline, TimelineError, TimelineScheduler, VisualElement,
};

pub use crate::driver::{drive, DriveSummary, PropertyStore, RenderHost};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum OverlayStatus {
    /// Accepting registrations; not yet triggered.
    Mounted,
    Running,
    Completed,
    /// Timeline could not be built; the callback was fired directly.
    Skipped,
    /// Torn down by the host; a pending callback was suppressed.
    Unmounted,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TriggerOutcome {
    Started,
    Skipped(TimelineError),
    AlreadyTriggered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayFrame {
    pub epoch: u64,
    pub dt: f32,
    /// Scheduler clock after this frame.
    pub time: f32,
    pub status: OverlayStatus,
    /// Property writes in application order.
    pub writes: Vec<PropertyWrite>,
    pub events: Vec<SchedulerEvent>,
}

impl OverlayFrame {
    fn idle(epoch: u64, dt: f32, time: f32, status: OverlayStatus) -> Self {
        Self {
            epoch,
            dt,
            time,
            status,
            writes: Vec::new(),
            events: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct LoadingOverlay {
    cfg: SequenceConfig,
    seed: Option<u64>,
    container: Option<VisualElement>,
    logo: Option<VisualElement>,
    progress_bar: Option<VisualElement>,
    dots: ElementRegistry,
    particles: ElementRegistry,
    /// Role each identity was first offered with, across every role.
    roles: HashMap<ElementId, ElementRole>,
    completion: Option<CompletionToken>,
    scheduler: TimelineScheduler,
    status: OverlayStatus,
    /// Particle placement, delivered with the first frame after the trigger.
    pending_layout: Vec<PropertyWrite>,
    pub epoch: u64,
}

impl LoadingOverlay {
    /// Mount an overlay that calls `on_complete` once the exit fade finishes.
    pub fn new<F>(on_complete: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            cfg: SequenceConfig::default(),
            seed: None,
            container: None,
            logo: None,
            progress_bar: None,
            dots: ElementRegistry::new(),
            particles: ElementRegistry::new(),
            roles: HashMap::new(),
            completion: Some(CompletionToken::new(on_complete)),
            scheduler: TimelineScheduler::new(),
            status: OverlayStatus::Mounted,
            pending_layout: Vec::new(),
            epoch: 0,
        }
    }

    pub fn with_config(mut self, cfg: SequenceConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Fix the particle randomization for replayable runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn status(&self) -> OverlayStatus {
        self.status
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.cfg
    }

    pub fn scheduler(&self) -> &TimelineScheduler {
        &self.scheduler
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.scheduler.schedule()
    }

    /// Dots as scheduled (registration closes at the trigger).
    pub fn dots(&self) -> &ElementRegistry {
        &self.dots
    }

    pub fn particles(&self) -> &ElementRegistry {
        &self.particles
    }

    /// Mount hook for the host. Safe to call on every render.
    ///
    /// Container, logo and progress bar keep the latest element offered before
    /// the trigger. An identity belongs to the first role it was offered with;
    /// offering it again under another role is a no-op. Registration closes at
    /// the trigger, so later offers return `Ok(false)`.
    pub fn register(&mut self, element: VisualElement) -> Result<bool, RegistryError> {
        if element.id.is_nil() {
            return Err(RegistryError::InvalidElement);
        }
        if self.status != OverlayStatus::Mounted {
            log::debug!(
                "overlay: {} {} offered after trigger; ignored",
                element.role,
                element.id
            );
            return Ok(false);
        }
        match self.roles.get(&element.id) {
            Some(role) if *role != element.role => {
                log::debug!(
                    "overlay: {} already registered as {}; {} ignored",
                    element.id,
                    role,
                    element.role
                );
                return Ok(false);
            }
            Some(_) => {}
            None => {
                self.roles.insert(element.id, element.role);
            }
        }
        let added = match element.role {
            ElementRole::Dot => self.dots.register(element)?,
            ElementRole::Particle => self.particles.register(element)?,
            ElementRole::Container => set_slot(&mut self.container, element),
            ElementRole::Logo => set_slot(&mut self.logo, element),
            ElementRole::ProgressBar => set_slot(&mut self.progress_bar, element),
        };
        Ok(added)
    }

    /// Build and start the timeline. Only the first call has any effect.
    ///
    /// If the timeline cannot be built the completion callback fires right away
    /// so the caller is never left waiting on a broken overlay.
    pub fn trigger(&mut self) -> Result<TriggerOutcome> {
        if self.status != OverlayStatus::Mounted {
            log::debug!("overlay: trigger ignored in status {:?}", self.status);
            return Ok(TriggerOutcome::AlreadyTriggered);
        }
        if self.scheduler.state() != SchedulerState::Idle {
            // Leave the callback in place; `unmount` can still settle it.
            anyhow::bail!(
                "overlay scheduler already {} before trigger",
                self.scheduler.state()
            );
        }
        let mut token = self.completion.take().unwrap_or_default();
        match self.build_timeline() {
            Ok((timeline, layout)) => {
                // Idle was checked above, the only state `start` accepts.
                self.scheduler.start(timeline.with_completion(token))?;
                self.pending_layout = layout;
                self.status = OverlayStatus::Running;
                Ok(TriggerOutcome::Started)
            }
            Err(err) => {
                log::warn!("overlay: cannot build timeline ({err}); completing without animation");
                token.fire();
                self.status = OverlayStatus::Skipped;
                Ok(TriggerOutcome::Skipped(err))
            }
        }
    }

    fn build_timeline(&self) -> Result<(Timeline, Vec<PropertyWrite>), TimelineError> {
        // Particle parameters are drawn before the builder runs, so the
        // sampling ranges must be checked first.
        self.cfg.validate()?;
        let particles = self.particles.ids();
        let mut params_gen = match self.seed {
            Some(seed) => RandomParameterGenerator::seeded(seed),
            None => RandomParameterGenerator::from_entropy(),
        };
        let params = params_gen.particles(&self.cfg.particles, particles.len());
        let elements = OverlayElements {
            container: self.container.map(|e| e.id),
            logo: self.logo.map(|e| e.id),
            progress_bar: self.progress_bar.map(|e| e.id),
            dots: self.dots.ids(),
            particles: particles.clone(),
        };
        let timeline = build_loading_timeline(&self.cfg, &elements, &params)?;
        let layout = particles
            .iter()
            .zip(&params)
            .flat_map(|(id, p)| {
                [
                    PropertyWrite {
                        element: *id,
                        property: Property::AnchorLeft,
                        value: p.anchor_left,
                    },
                    PropertyWrite {
                        element: *id,
                        property: Property::AnchorTop,
                        value: p.anchor_top,
                    },
                ]
            })
            .collect();
        Ok((timeline, layout))
    }

    /// Advance the overlay by `dt` seconds and return an OverlayFrame.
    /// Frames outside the running state are empty.
    pub fn step(&mut self, dt: f32) -> Result<OverlayFrame> {
        self.epoch = self.epoch.wrapping_add(1);
        let mut frame =
            OverlayFrame::idle(self.epoch, dt, self.scheduler.elapsed(), self.status);
        if self.status != OverlayStatus::Running {
            return Ok(frame);
        }

        let inner = self.scheduler.step(dt)?;
        frame.writes = std::mem::take(&mut self.pending_layout);
        frame.writes.extend(inner.writes);
        frame.events = inner.events;
        frame.time = inner.time;
        if inner.state == SchedulerState::Completed {
            self.status = OverlayStatus::Completed;
        }
        frame.status = self.status;
        Ok(frame)
    }

    /// Tear the overlay down. Returns `true` if a pending callback was
    /// suppressed as a result.
    pub fn unmount(&mut self) -> bool {
        let suppressed = match self.status {
            OverlayStatus::Running => self.scheduler.cancel().is_ok(),
            OverlayStatus::Mounted => self
                .completion
                .take()
                .map(|mut token| token.suppress())
                .unwrap_or(false),
            _ => false,
        };
        if suppressed {
            log::warn!("overlay: unmounted before completion; callback suppressed");
        }
        self.pending_layout.clear();
        self.status = OverlayStatus::Unmounted;
        suppressed
    }
}

fn set_slot(slot: &mut Option<VisualElement>, element: VisualElement) -> bool {
    match slot {
        Some(current) if current.id == element.id => false,
        Some(current) => {
            log::debug!(
                "overlay: {} replaced ({} -> {})",
                element.role,
                current.id,
                element.id
            );
            *slot = Some(element);
            true
        }
        None => {
            *slot = Some(element);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splash_animation_core::{AnimationSegment, TimelineBuilder};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn slot_roles_keep_latest_before_trigger() {
        let mut overlay = LoadingOverlay::new(|| {});
        let first = VisualElement::new(ElementRole::Logo);
        let second = VisualElement::new(ElementRole::Logo);
        assert_eq!(overlay.register(first), Ok(true));
        assert_eq!(overlay.register(first), Ok(false));
        assert_eq!(overlay.register(second), Ok(true));
        assert_eq!(overlay.logo, Some(second));
    }

    #[test]
    fn unmount_before_trigger_suppresses_callback() {
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let mut overlay = LoadingOverlay::new(move || f.set(true));
        assert!(overlay.unmount());
        assert_eq!(overlay.status(), OverlayStatus::Unmounted);
        assert_eq!(overlay.trigger().unwrap(), TriggerOutcome::AlreadyTriggered);
        assert!(!fired.get());
    }

    #[test]
    fn identity_keeps_its_first_role() {
        let mut overlay = LoadingOverlay::new(|| {});
        let logo = VisualElement::new(ElementRole::Logo);
        assert_eq!(overlay.register(logo), Ok(true));
        let as_dot = VisualElement::with_id(logo.id, ElementRole::Dot);
        let as_particle = VisualElement::with_id(logo.id, ElementRole::Particle);
        assert_eq!(overlay.register(as_dot), Ok(false));
        assert_eq!(overlay.register(as_particle), Ok(false));
        assert!(overlay.dots().is_empty());
        assert!(overlay.particles().is_empty());

        assert_eq!(overlay.trigger().unwrap(), TriggerOutcome::Started);
        let targeting = overlay
            .schedule()
            .unwrap()
            .iter()
            .filter(|s| s.segment.targets.contains(&logo.id))
            .count();
        assert_eq!(targeting, 1);
    }

    #[test]
    fn busy_scheduler_keeps_callback_pending() {
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let mut overlay = LoadingOverlay::new(move || f.set(true));
        overlay.register(VisualElement::new(ElementRole::Logo)).unwrap();
        let other = TimelineBuilder::new()
            .then(AnimationSegment::new("other", Vec::new()).duration(1.0))
            .build()
            .unwrap();
        overlay.scheduler.start(other).unwrap();

        assert!(overlay.trigger().is_err());
        assert_eq!(overlay.status(), OverlayStatus::Mounted);
        assert!(!fired.get());
        assert!(overlay.completion.as_ref().is_some_and(|t| t.is_pending()));
    }

    #[test]
    fn step_before_trigger_is_empty() {
        let mut overlay = LoadingOverlay::new(|| {});
        let frame = overlay.step(0.016).unwrap();
        assert_eq!(frame.status, OverlayStatus::Mounted);
        assert!(frame.writes.is_empty());
        assert_eq!(frame.epoch, 1);
    }
}
