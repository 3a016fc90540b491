use core_sim::SimulationConfig;

use crate::policy::{deviation, is_cadence_tick, Correction, CorrectionPolicy, Strategy};

/// Checks on every cadence tick and corrects only when the deviation is
/// strictly beyond the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinualPolicy {
    cadence: u64,
    threshold: f64,
    strength: f64,
}

impl ContinualPolicy {
    pub fn new(cadence: u64, threshold: f64, strength: f64) -> Self {
        assert!(cadence > 0, "cadence must be a positive tick interval");
        assert!(
            threshold.is_finite() && threshold >= 0.0,
            "threshold must be finite and non-negative"
        );
        assert!(
            strength.is_finite() && strength > 0.0 && strength <= 1.0,
            "strength must be a fraction in (0, 1]"
        );

        Self {
            cadence,
            threshold,
            strength,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            cadence: config.continual_cadence(),
            threshold: config.continual_threshold(),
            strength: config.continual_strength(),
        }
    }

    pub fn cadence(&self) -> u64 {
        self.cadence
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl CorrectionPolicy for ContinualPolicy {
    fn strategy(&self) -> Strategy {
        Strategy::Continual
    }

    fn evaluate(&self, tick: u64, raw_position: f64, ideal: f64) -> Correction {
        if !is_cadence_tick(tick, self.cadence) {
            return Correction::pass_through(raw_position);
        }

        if deviation(raw_position, ideal).abs() > self.threshold {
            Correction::toward_ideal(tick, raw_position, ideal, self.strength)
        } else {
            Correction::pass_through(raw_position)
        }
    }
}
