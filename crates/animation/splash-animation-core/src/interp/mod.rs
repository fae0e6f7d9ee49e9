//! Named easing curves.
//!
//! Curves map normalized elapsed time in [0,1] to normalized progress. Only the
//! overshoot curve leaves [0,1] in between the endpoints.

pub mod functions;

use serde::{Deserialize, Serialize};

pub const DEFAULT_OVERSHOOT: f32 = 1.7;

fn default_overshoot() -> f32 {
    DEFAULT_OVERSHOOT
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    /// Elastic/back-out style curve that passes the target then settles.
    Overshoot {
        #[serde(default = "default_overshoot")]
        strength: f32,
    },
    Decelerate,
    AccelerateDecelerate,
}

impl Easing {
    pub fn overshoot() -> Self {
        Easing::Overshoot {
            strength: DEFAULT_OVERSHOOT,
        }
    }

    /// Stable identifier requested from hosts that do their own tweening.
    pub fn id(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Overshoot { .. } => "overshoot",
            Easing::Decelerate => "decelerate",
            Easing::AccelerateDecelerate => "accelerate-decelerate",
        }
    }

    /// Eased progress for `t`, clamped to [0,1] first.
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Overshoot { strength } => functions::back_out(t, strength),
            Easing::Decelerate => functions::cubic_out(t),
            Easing::AccelerateDecelerate => functions::cubic_in_out(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overshoot_passes_target_before_settling() {
        let e = Easing::overshoot();
        let peak = (1..100)
            .map(|i| e.sample(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "peak={peak}");
        assert_eq!(e.sample(1.0), 1.0);
    }

    #[test]
    fn sample_clamps_input() {
        assert_eq!(Easing::Decelerate.sample(-1.0), 0.0);
        assert_eq!(Easing::AccelerateDecelerate.sample(2.0), 1.0);
    }

    #[test]
    fn serde_uses_kebab_identifiers() {
        let json = serde_json::to_value(Easing::AccelerateDecelerate).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "accelerate-decelerate" }));
        let back: Easing = serde_json::from_value(serde_json::json!({ "type": "overshoot" })).unwrap();
        assert_eq!(back, Easing::overshoot());
        assert_eq!(back.id(), "overshoot");
    }
}
