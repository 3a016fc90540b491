use core_sim::{
    DisturbanceGenerator, DisturbanceSample, EnvironmentMarker, SimulationConfig, StrategyHistory,
};
use serde::Serialize;
use strategy::Strategy;
use thiserror::Error;

use crate::engine::{SimEngine, TickReport};
use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter, TracingRunLogWriter};
use crate::mode::RunMode;
use crate::summary::{explanation, ComparisonMetrics};

const IDLE_EXPLANATION: &str = "Select a simulation to begin.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartRunError {
    #[error("run id space is exhausted")]
    RunIdOverflow,
    #[error("speed must be between 0 and 99, got {0}")]
    InvalidSpeed(u32),
}

/// Where each run's spike signs come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpikeSource {
    Entropy,
    Seeded(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickApplication {
    Applied(TickReport),
    /// The tick was scheduled for a run that has since been replaced.
    Stale,
    /// The run already reached its terminal tick.
    Complete,
}

/// Read-only copy of the session at one point between ticks.
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub run_id: Option<u64>,
    pub mode: Option<RunMode>,
    pub current_tick: u64,
    pub terminal_tick: u64,
    pub is_running: bool,
    pub is_complete: bool,
    pub config: SimulationConfig,
    pub explanation: String,
    pub continuous: Option<StrategyHistory>,
    pub continual: Option<StrategyHistory>,
    pub environment_markers: Vec<EnvironmentMarker>,
    pub disturbances: Vec<DisturbanceSample>,
    pub metrics: Option<ComparisonMetrics>,
    pub adjustment_ratio: Option<f64>,
    pub conclusion: Option<String>,
}

/// Sole owner of the current run. Every mutation goes through `start_run`
/// or `apply_tick`; everything else reads.
pub struct SimulationSession {
    run_id: u64,
    engine: Option<SimEngine>,
    spike_source: SpikeSource,
    log: Box<dyn RunLogWriter + Send>,
}

impl Default for SimulationSession {
    fn default() -> Self {
        Self::new(SpikeSource::Entropy)
    }
}

impl SimulationSession {
    pub fn new(spike_source: SpikeSource) -> Self {
        Self {
            run_id: 0,
            engine: None,
            spike_source,
            log: Box::new(TracingRunLogWriter),
        }
    }

    pub fn with_log_writer(mut self, log: Box<dyn RunLogWriter + Send>) -> Self {
        self.log = log;
        self
    }

    /// Discards the previous run and its histories and begins a new one.
    /// Ticks carrying an older run id are ignored from here on.
    pub fn start_run(
        &mut self,
        mode: RunMode,
        config: SimulationConfig,
    ) -> Result<u64, StartRunError> {
        let run_id = self
            .run_id
            .checked_add(1)
            .ok_or(StartRunError::RunIdOverflow)?;

        self.run_id = run_id;
        self.engine = Some(SimEngine::new(mode, config, self.generator()));
        self.log
            .write(RunLogEvent::new(0, RunLogEventKind::RunStarted));
        tracing::info!(
            run_id,
            mode = mode.as_str(),
            terminal_tick = config.terminal_tick(),
            "simulation run started"
        );

        Ok(run_id)
    }

    pub fn apply_tick(&mut self, run_id: u64) -> TickApplication {
        if run_id != self.run_id {
            self.log.write(RunLogEvent::new(
                self.current_tick(),
                RunLogEventKind::StaleTickSuppressed,
            ));
            return TickApplication::Stale;
        }

        let Some(engine) = self.engine.as_mut() else {
            return TickApplication::Stale;
        };

        match engine.step_once(self.log.as_mut()) {
            Some(report) => {
                if report.completed {
                    tracing::info!(run_id, ticks = engine.current_tick(), "simulation run completed");
                }
                TickApplication::Applied(report)
            }
            None => TickApplication::Complete,
        }
    }

    pub fn run_id(&self) -> Option<u64> {
        self.engine.as_ref().map(|_| self.run_id)
    }

    pub fn mode(&self) -> Option<RunMode> {
        self.engine.as_ref().map(SimEngine::mode)
    }

    pub fn config(&self) -> Option<&SimulationConfig> {
        self.engine.as_ref().map(SimEngine::config)
    }

    pub fn current_tick(&self) -> u64 {
        self.engine.as_ref().map_or(0, SimEngine::current_tick)
    }

    pub fn is_running(&self) -> bool {
        self.engine
            .as_ref()
            .is_some_and(|engine| !engine.is_complete())
    }

    pub fn is_complete(&self) -> bool {
        self.engine.as_ref().is_some_and(SimEngine::is_complete)
    }

    pub fn history(&self, strategy: Strategy) -> Option<StrategyHistory> {
        self.engine
            .as_ref()
            .and_then(|engine| engine.history(strategy))
            .cloned()
    }

    pub fn environment_markers(&self) -> Vec<EnvironmentMarker> {
        self.engine
            .as_ref()
            .map(|engine| engine.environment_markers().to_vec())
            .unwrap_or_default()
    }

    pub fn disturbances(&self) -> Vec<DisturbanceSample> {
        self.engine
            .as_ref()
            .map(|engine| engine.disturbances().to_vec())
            .unwrap_or_default()
    }

    /// Only available once the run is complete.
    pub fn metrics(&self) -> Option<ComparisonMetrics> {
        self.engine.as_ref().and_then(|engine| engine.metrics().copied())
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let config = self.config().copied().unwrap_or_default();
        let metrics = self.metrics();

        RunSnapshot {
            run_id: self.run_id(),
            mode: self.mode(),
            current_tick: self.current_tick(),
            terminal_tick: config.terminal_tick(),
            is_running: self.is_running(),
            is_complete: self.is_complete(),
            config,
            explanation: self
                .mode()
                .map(|mode| explanation(mode, &config))
                .unwrap_or_else(|| IDLE_EXPLANATION.to_string()),
            continuous: self.history(Strategy::Continuous),
            continual: self.history(Strategy::Continual),
            environment_markers: self.environment_markers(),
            disturbances: self.disturbances(),
            adjustment_ratio: metrics.and_then(|metrics| metrics.adjustment_ratio()),
            conclusion: metrics.and_then(|metrics| metrics.conclusion()),
            metrics,
        }
    }

    fn generator(&self) -> DisturbanceGenerator {
        match self.spike_source {
            SpikeSource::Entropy => DisturbanceGenerator::from_entropy(),
            SpikeSource::Seeded(seed) => DisturbanceGenerator::new(seed),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_run_id_for_test(run_id: u64) -> Self {
        Self {
            run_id,
            ..Self::new(SpikeSource::Seeded(0))
        }
    }
}
