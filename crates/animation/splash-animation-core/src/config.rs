//! Configuration for the loading sequence.
//!
//! Defaults reproduce the shipped overlay timing. Every field is optional in
//! JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::interp::Easing;
use crate::timeline::TimelineError;

/// Sampling interval `[min, max)`. The span `max - min` must itself be finite.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &'static str) -> Result<(), TimelineError> {
        let span = self.max - self.min;
        if !self.min.is_finite() || !self.max.is_finite() || !span.is_finite() || span < 0.0 {
            return Err(TimelineError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoPhase {
    pub duration: f32,
    /// Starting rotation in degrees, animated to 0.
    pub from_rotation: f32,
    pub easing: Easing,
}

impl Default for LogoPhase {
    fn default() -> Self {
        Self {
            duration: 1.2,
            from_rotation: -360.0,
            easing: Easing::overshoot(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotPhase {
    pub duration: f32,
    /// How early each dot starts before the previous segment ends.
    pub overlap: f32,
    /// Starting vertical offset, animated to 0.
    pub rise: f32,
    pub easing: Easing,
}

impl Default for DotPhase {
    fn default() -> Self {
        Self {
            duration: 0.4,
            overlap: 0.3,
            rise: 10.0,
            easing: Easing::Decelerate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressPhase {
    pub duration: f32,
    /// Overlap with the tail of the dot reveal.
    pub overlap: f32,
    pub easing: Easing,
}

impl Default for ProgressPhase {
    fn default() -> Self {
        Self {
            duration: 2.0,
            overlap: 1.0,
            easing: Easing::AccelerateDecelerate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticlePhase {
    pub duration: f32,
    /// Delay added per particle index, from the start of the run.
    pub stagger: f32,
    pub offset_range: ValueRange,
    pub opacity_range: ValueRange,
    /// Resting placement, percent of the overlay on each axis.
    pub anchor_range: ValueRange,
    pub easing: Easing,
}

impl Default for ParticlePhase {
    fn default() -> Self {
        Self {
            duration: 1.5,
            stagger: 0.1,
            offset_range: ValueRange::new(-100.0, 100.0),
            opacity_range: ValueRange::new(0.3, 0.8),
            anchor_range: ValueRange::new(0.0, 100.0),
            easing: Easing::Decelerate,
        }
    }
}

impl ParticlePhase {
    pub fn validate(&self) -> Result<(), TimelineError> {
        self.offset_range.validate("particle offset")?;
        self.opacity_range.validate("particle opacity")?;
        self.anchor_range.validate("particle anchor")?;
        if !self.stagger.is_finite() || self.stagger < 0.0 {
            return Err(TimelineError::InvalidDelay(self.stagger));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitPhase {
    pub duration: f32,
    pub easing: Easing,
}

impl Default for ExitPhase {
    fn default() -> Self {
        Self {
            duration: 0.8,
            easing: Easing::AccelerateDecelerate,
        }
    }
}

/// Timing and easing for every phase of the overlay.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub logo: LogoPhase,
    pub dots: DotPhase,
    pub progress: ProgressPhase,
    pub particles: ParticlePhase,
    pub exit: ExitPhase,
}

impl SequenceConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Checks the parts that are consumed before segments exist (random
    /// ranges, stagger). Durations and offsets are checked by the builder.
    pub fn validate(&self) -> Result<(), TimelineError> {
        self.particles.validate()
    }
}
