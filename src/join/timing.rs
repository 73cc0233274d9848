use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Timing knobs shared by every transition a `ChartState` schedules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionTiming {
    /// Enter/update duration; axes use it as well.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    /// Exit duration as a fraction of `duration_ms`.
    #[serde(default = "default_exit_ratio")]
    pub exit_ratio: f64,
    /// Per-index delay applied to updates so they cascade.
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: f64,
    #[serde(default)]
    pub easing: Easing,
}

fn default_duration_ms() -> f64 {
    1_000.0
}

fn default_exit_ratio() -> f64 {
    0.5
}

fn default_stagger_ms() -> f64 {
    20.0
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            exit_ratio: default_exit_ratio(),
            stagger_ms: default_stagger_ms(),
            easing: Easing::default(),
        }
    }
}

impl TransitionTiming {
    /// Zero-length transitions: every reconcile lands immediately.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            duration_ms: 0.0,
            exit_ratio: 0.0,
            stagger_ms: 0.0,
            easing: Easing::Linear,
        }
    }

    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    #[must_use]
    pub fn with_exit_ratio(mut self, exit_ratio: f64) -> Self {
        self.exit_ratio = exit_ratio;
        self
    }

    #[must_use]
    pub fn with_stagger_ms(mut self, stagger_ms: f64) -> Self {
        self.stagger_ms = stagger_ms;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("duration_ms", self.duration_ms),
            ("exit_ratio", self.exit_ratio),
            ("stagger_ms", self.stagger_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidTiming(format!(
                    "`{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn exit_duration_ms(self) -> f64 {
        self.duration_ms * self.exit_ratio
    }

    #[must_use]
    pub fn update_delay_ms(self, index: usize) -> f64 {
        self.stagger_ms * index as f64
    }
}

/// Progress curve applied to transition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Eased progress for linear progress `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let tail = -2.0 * t + 2.0;
                    1.0 - tail * tail * tail / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Easing, TransitionTiming};

    #[test]
    fn defaults_match_dashboard_tuning() {
        let timing = TransitionTiming::default();
        assert_eq!(timing.exit_duration_ms(), 500.0);
        assert_eq!(timing.update_delay_ms(3), 60.0);
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(TransitionTiming::default().with_stagger_ms(-1.0).validate().is_err());
        assert!(
            TransitionTiming::default()
                .with_duration_ms(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn cubic_easing_is_symmetric_and_bounded() {
        let easing = Easing::CubicInOut;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(0.5), 0.5);
        assert_eq!(easing.apply(1.0), 1.0);
        assert!((easing.apply(0.25) + easing.apply(0.75) - 1.0).abs() < 1e-12);
        assert_eq!(easing.apply(7.0), 1.0);
    }
}
