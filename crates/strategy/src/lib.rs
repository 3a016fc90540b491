pub mod continual;
pub mod continuous;
pub mod policy;

pub use continual::ContinualPolicy;
pub use continuous::ContinuousPolicy;
pub use policy::{deviation, Correction, CorrectionPolicy, Strategy};

#[cfg(test)]
mod tests {
    use core_sim::{SimulationConfig, SimulationOptions};

    use crate::{CorrectionPolicy, Strategy};

    #[test]
    fn default_policies_disagree_on_small_drift_at_a_shared_check_tick() {
        let config = SimulationConfig::default();
        let continuous = Strategy::Continuous.policy(&config);
        let continual = Strategy::Continual.policy(&config);

        let tick = 10;
        assert!(continuous.evaluate(tick, 208.0, 200.0).is_adjustment());
        assert!(!continual.evaluate(tick, 208.0, 200.0).is_adjustment());
    }

    #[test]
    fn policies_follow_custom_config() {
        let config = SimulationConfig::new(SimulationOptions {
            continuous_cadence: 5,
            continual_cadence: 4,
            continual_threshold: 2.0,
            ..SimulationOptions::default()
        })
        .unwrap();
        let continuous = Strategy::Continuous.policy(&config);
        let continual = Strategy::Continual.policy(&config);

        assert!(!continuous.evaluate(2, 210.0, 200.0).is_adjustment());
        assert!(continuous.evaluate(5, 210.0, 200.0).is_adjustment());
        assert!(continual.evaluate(4, 203.0, 200.0).is_adjustment());
        assert!(!continual.evaluate(4, 201.0, 200.0).is_adjustment());
    }
}
