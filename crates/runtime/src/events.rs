use core_sim::SimulationConfig;
use serde::Serialize;

use crate::engine::TickReport;
use crate::mode::RunMode;
use crate::summary::ComparisonMetrics;

/// Notifications pushed to subscribers while runs progress.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RunEvent {
    Connected {
        run_id: Option<u64>,
    },
    RunStarted {
        run_id: u64,
        mode: RunMode,
        config: SimulationConfig,
        explanation: String,
    },
    Tick {
        run_id: u64,
        report: TickReport,
    },
    RunCompleted {
        run_id: u64,
        metrics: ComparisonMetrics,
        adjustment_ratio: Option<f64>,
        conclusion: Option<String>,
    },
}

impl RunEvent {
    pub fn connected(run_id: Option<u64>) -> Self {
        Self::Connected { run_id }
    }

    pub fn run_started(
        run_id: u64,
        mode: RunMode,
        config: SimulationConfig,
        explanation: impl Into<String>,
    ) -> Self {
        Self::RunStarted {
            run_id,
            mode,
            config,
            explanation: explanation.into(),
        }
    }

    pub fn tick(run_id: u64, report: TickReport) -> Self {
        Self::Tick { run_id, report }
    }

    pub fn run_completed(run_id: u64, metrics: ComparisonMetrics) -> Self {
        Self::RunCompleted {
            run_id,
            adjustment_ratio: metrics.adjustment_ratio(),
            conclusion: metrics.conclusion(),
            metrics,
        }
    }

    pub fn run_id(&self) -> Option<u64> {
        match self {
            Self::Connected { run_id } => *run_id,
            Self::RunStarted { run_id, .. }
            | Self::Tick { run_id, .. }
            | Self::RunCompleted { run_id, .. } => Some(*run_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use core_sim::RunMetrics;

    use super::RunEvent;
    use crate::summary::ComparisonMetrics;

    #[test]
    fn events_serialize_with_snake_case_tag() {
        let json = serde_json::to_value(RunEvent::connected(None)).unwrap();

        assert_eq!(json["event_type"], "connected");
        assert!(json["run_id"].is_null());
    }

    #[test]
    fn run_completed_carries_ratio_and_conclusion() {
        let metrics = ComparisonMetrics {
            continuous: Some(RunMetrics {
                adjustment_count: 75,
                ..RunMetrics::default()
            }),
            continual: Some(RunMetrics {
                adjustment_count: 5,
                ..RunMetrics::default()
            }),
        };

        let event = RunEvent::run_completed(4, metrics);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(event.run_id(), Some(4));
        assert_eq!(json["event_type"], "run_completed");
        assert_eq!(json["adjustment_ratio"], 15.0);
        assert_eq!(json["metrics"]["continual"]["adjustment_count"], 5);
        assert!(json["conclusion"].as_str().unwrap().contains("15.0x"));
    }
}
