use serde::Serialize;

use crate::history::StrategyHistory;

/// Tracking summary for one strategy once a run reaches its terminal tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunMetrics {
    pub adjustment_count: usize,
    pub mean_absolute_deviation: f64,
    pub max_absolute_deviation: f64,
}

impl RunMetrics {
    pub fn from_history(history: &StrategyHistory, ideal_position: f64) -> Self {
        let deviations = history
            .points()
            .iter()
            .map(|point| (point.position - ideal_position).abs());

        let (count, sum, max) = deviations.fold((0_usize, 0.0_f64, 0.0_f64), |acc, deviation| {
            (acc.0 + 1, acc.1 + deviation, acc.2.max(deviation))
        });

        let mean_absolute_deviation = if count == 0 { 0.0 } else { sum / count as f64 };

        Self {
            adjustment_count: history.adjustments().len(),
            mean_absolute_deviation,
            max_absolute_deviation: max,
        }
    }
}

/// How many times more adjustments the first strategy made than the second.
/// The denominator is floored at one so a strategy that never corrected
/// does not fault the comparison.
pub fn adjustment_ratio(numerator: &RunMetrics, denominator: &RunMetrics) -> f64 {
    numerator.adjustment_count as f64 / denominator.adjustment_count.max(1) as f64
}
