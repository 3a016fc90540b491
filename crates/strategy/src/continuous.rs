use core_sim::SimulationConfig;

use crate::policy::{is_cadence_tick, Correction, CorrectionPolicy, Strategy};

/// Corrects on every cadence tick regardless of how small the deviation is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousPolicy {
    cadence: u64,
    strength: f64,
}

impl ContinuousPolicy {
    pub fn new(cadence: u64, strength: f64) -> Self {
        assert!(cadence > 0, "cadence must be a positive tick interval");
        assert!(
            strength.is_finite() && strength > 0.0 && strength <= 1.0,
            "strength must be a fraction in (0, 1]"
        );

        Self { cadence, strength }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            cadence: config.continuous_cadence(),
            strength: config.continuous_strength(),
        }
    }

    pub fn cadence(&self) -> u64 {
        self.cadence
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl CorrectionPolicy for ContinuousPolicy {
    fn strategy(&self) -> Strategy {
        Strategy::Continuous
    }

    fn evaluate(&self, tick: u64, raw_position: f64, ideal: f64) -> Correction {
        if is_cadence_tick(tick, self.cadence) {
            Correction::toward_ideal(tick, raw_position, ideal, self.strength)
        } else {
            Correction::pass_through(raw_position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContinuousPolicy;
    use crate::CorrectionPolicy;

    #[test]
    fn corrects_on_every_cadence_tick_and_no_other() {
        let policy = ContinuousPolicy::new(3, 0.3);

        let adjusted: Vec<u64> = (0..12)
            .filter(|tick| policy.evaluate(*tick, 207.0, 200.0).is_adjustment())
            .collect();

        assert_eq!(adjusted, vec![0, 3, 6, 9]);
    }

    #[test]
    fn corrects_even_negligible_drift() {
        let policy = ContinuousPolicy::new(2, 0.3);

        let correction = policy.evaluate(2, 200.01, 200.0);

        assert!(correction.is_adjustment());
        assert!((correction.committed_position - 200.007).abs() < 1e-9);
    }

    #[test]
    fn corrects_at_ideal_with_zero_amount() {
        let policy = ContinuousPolicy::new(2, 0.3);

        let correction = policy.evaluate(4, 200.0, 200.0);

        assert_eq!(correction.adjustment.unwrap().correction_amount, 0.0);
        assert_eq!(correction.committed_position, 200.0);
    }

    #[test]
    fn passes_raw_position_through_off_cadence() {
        let policy = ContinuousPolicy::new(2, 0.3);

        let correction = policy.evaluate(5, 230.0, 200.0);

        assert!(!correction.is_adjustment());
        assert_eq!(correction.committed_position, 230.0);
    }

    #[test]
    #[should_panic(expected = "cadence must be a positive tick interval")]
    fn rejects_zero_cadence() {
        let _ = ContinuousPolicy::new(0, 0.3);
    }
}
