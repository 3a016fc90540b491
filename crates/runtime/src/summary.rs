use core_sim::{adjustment_ratio, RunMetrics, SimulationConfig};
use serde::Serialize;
use strategy::Strategy;

use crate::mode::RunMode;

/// Per-strategy metrics of a completed run. Strategies that were not part of
/// the run are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComparisonMetrics {
    pub continuous: Option<RunMetrics>,
    pub continual: Option<RunMetrics>,
}

impl ComparisonMetrics {
    pub fn get(&self, strategy: Strategy) -> Option<&RunMetrics> {
        match strategy {
            Strategy::Continuous => self.continuous.as_ref(),
            Strategy::Continual => self.continual.as_ref(),
        }
    }

    pub fn set(&mut self, strategy: Strategy, metrics: RunMetrics) {
        match strategy {
            Strategy::Continuous => self.continuous = Some(metrics),
            Strategy::Continual => self.continual = Some(metrics),
        }
    }

    /// Continuous adjustments per continual adjustment; only defined when
    /// both strategies ran.
    pub fn adjustment_ratio(&self) -> Option<f64> {
        match (&self.continuous, &self.continual) {
            (Some(continuous), Some(continual)) => Some(adjustment_ratio(continuous, continual)),
            _ => None,
        }
    }

    pub fn conclusion(&self) -> Option<String> {
        let ratio = self.adjustment_ratio()?;
        let continuous = self.continuous?;
        let continual = self.continual?;

        Some(format!(
            "Continuous made {} adjustments for an average deviation of {:.1} units; \
             continual made {} for {:.1}. Continual needed {ratio:.1}x fewer adjustments.",
            continuous.adjustment_count,
            continuous.mean_absolute_deviation,
            continual.adjustment_count,
            continual.mean_absolute_deviation,
        ))
    }
}

pub fn explanation(mode: RunMode, config: &SimulationConfig) -> String {
    match mode {
        RunMode::Continuous => format!(
            "Continuous improvement: adjusting every {} ticks with {}% correction strength, \
             whether or not the car has drifted.",
            config.continuous_cadence(),
            strength_pct(config.continuous_strength()),
        ),
        RunMode::Continual => format!(
            "Continual improvement: checking every {} ticks and adjusting ({}% strength) only \
             when the deviation exceeds {} units.",
            config.continual_cadence(),
            strength_pct(config.continual_strength()),
            config.continual_threshold(),
        ),
        RunMode::Both => "Comparing both approaches: both cars face identical environmental \
                          challenges on every tick."
            .to_string(),
    }
}

fn strength_pct(fraction: f64) -> f64 {
    (fraction * 100.0).round()
}
