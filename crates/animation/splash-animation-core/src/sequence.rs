//! Assembly of the loading-overlay timeline.
//!
//! Phase order is fixed: logo entrance, staggered dots, progress fill, exit
//! fade (chained), with the particle burst detached alongside them.

use serde::{Deserialize, Serialize};

use crate::config::SequenceConfig;
use crate::element::{ElementRole, Property, PropertySet};
use crate::ids::ElementId;
use crate::random::ParticleParams;
use crate::timeline::{AnimationSegment, Timeline, TimelineBuilder, TimelineError};

/// Elements collected for one overlay run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OverlayElements {
    pub container: Option<ElementId>,
    pub logo: Option<ElementId>,
    pub progress_bar: Option<ElementId>,
    /// Registration order.
    pub dots: Vec<ElementId>,
    /// Registration order.
    pub particles: Vec<ElementId>,
}

fn targets(id: Option<ElementId>) -> Vec<ElementId> {
    id.into_iter().collect()
}

/// Build the overlay timeline. `particles[i]` parameterizes `elements.particles[i]`.
///
/// The completion callback is bound afterwards with [`Timeline::with_completion`].
pub fn build_loading_timeline(
    cfg: &SequenceConfig,
    elements: &OverlayElements,
    particles: &[ParticleParams],
) -> Result<Timeline, TimelineError> {
    let logo = elements
        .logo
        .ok_or(TimelineError::MissingElement(ElementRole::Logo))?;
    if particles.len() != elements.particles.len() {
        return Err(TimelineError::ParticleCountMismatch {
            particles: elements.particles.len(),
            params: particles.len(),
        });
    }
    cfg.validate()?;

    let mut builder = TimelineBuilder::new().then(
        AnimationSegment::new("logo", vec![logo])
            .from_to(
                PropertySet::new()
                    .with(Property::Scale, 0.0)
                    .with(Property::Rotation, cfg.logo.from_rotation)
                    .with(Property::Opacity, 0.0),
                PropertySet::new()
                    .with(Property::Scale, 1.0)
                    .with(Property::Rotation, 0.0)
                    .with(Property::Opacity, 1.0),
            )
            .duration(cfg.logo.duration)
            .easing(cfg.logo.easing),
    );

    for (i, dot) in elements.dots.iter().enumerate() {
        builder = builder.then(
            AnimationSegment::new(format!("dot-{i}"), vec![*dot])
                .from_to(
                    PropertySet::new()
                        .with(Property::Scale, 0.0)
                        .with(Property::Opacity, 0.0)
                        .with(Property::OffsetY, cfg.dots.rise),
                    PropertySet::new()
                        .with(Property::Scale, 1.0)
                        .with(Property::Opacity, 1.0)
                        .with(Property::OffsetY, 0.0),
                )
                .duration(cfg.dots.duration)
                .easing(cfg.dots.easing)
                .offset(-cfg.dots.overlap),
        );
    }

    builder = builder.then(
        AnimationSegment::new("progress", targets(elements.progress_bar))
            .from_to(
                PropertySet::new().with(Property::WidthFraction, 0.0),
                PropertySet::new().with(Property::WidthFraction, 1.0),
            )
            .duration(cfg.progress.duration)
            .easing(cfg.progress.easing)
            .offset(-cfg.progress.overlap),
    );

    for (i, (particle, params)) in elements.particles.iter().zip(particles).enumerate() {
        builder = builder.detach(
            AnimationSegment::new(format!("particle-{i}"), vec![*particle])
                .from_to(
                    PropertySet::new()
                        .with(Property::Scale, 0.0)
                        .with(Property::Opacity, 0.0)
                        .with(Property::OffsetX, params.offset_x)
                        .with(Property::OffsetY, params.offset_y),
                    PropertySet::new()
                        .with(Property::Scale, 1.0)
                        .with(Property::Opacity, params.opacity)
                        .with(Property::OffsetX, 0.0)
                        .with(Property::OffsetY, 0.0),
                )
                .duration(cfg.particles.duration)
                .easing(cfg.particles.easing),
            i as f32 * cfg.particles.stagger,
        );
    }

    builder = builder.then(
        AnimationSegment::new("exit", targets(elements.container))
            .from_to(
                PropertySet::new().with(Property::Opacity, 1.0),
                PropertySet::new().with(Property::Opacity, 0.0),
            )
            .duration(cfg.exit.duration)
            .easing(cfg.exit.easing),
    );

    log::debug!(
        "sequence: built {} chained segments, {} particles",
        builder.chained_len(),
        elements.particles.len()
    );
    builder.build()
}
