use anyhow::{bail, Result};
use hashbrown::HashMap;

use splash_animation_core::{ElementId, Property, PropertyWrite, SchedulerEvent};

use crate::{LoadingOverlay, OverlayStatus};

/// Host side of the rendering boundary.
pub trait RenderHost {
    fn apply(&mut self, write: &PropertyWrite);

    fn on_event(&mut self, _event: &SchedulerEvent) {}
}

/// Latest value per element/property. Handy for headless hosts and tests.
#[derive(Debug, Default)]
pub struct PropertyStore {
    values: HashMap<(ElementId, Property), f32>,
    applied: usize,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element: ElementId, property: Property) -> Option<f32> {
        self.values.get(&(element, property)).copied()
    }

    /// Total writes applied, including repeats.
    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl RenderHost for PropertyStore {
    fn apply(&mut self, write: &PropertyWrite) {
        self.values.insert((write.element, write.property), write.value);
        self.applied += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveSummary {
    pub steps: usize,
    pub elapsed: f32,
    pub status: OverlayStatus,
}

/// Step a triggered overlay at a fixed `dt` until it stops running or
/// `max_steps` frames have been produced, pushing every frame into `host`.
pub fn drive<H: RenderHost>(
    overlay: &mut LoadingOverlay,
    host: &mut H,
    dt: f32,
    max_steps: usize,
) -> Result<DriveSummary> {
    if overlay.status() == OverlayStatus::Mounted {
        bail!("overlay has not been triggered");
    }
    let mut steps = 0;
    while overlay.status() == OverlayStatus::Running && steps < max_steps {
        let frame = overlay.step(dt)?;
        for write in &frame.writes {
            host.apply(write);
        }
        for event in &frame.events {
            host.on_event(event);
        }
        steps += 1;
    }
    if overlay.status() == OverlayStatus::Running {
        log::debug!("driver: stopped after {steps} steps with overlay still running");
    }
    Ok(DriveSummary {
        steps,
        elapsed: overlay.scheduler().elapsed(),
        status: overlay.status(),
    })
}
