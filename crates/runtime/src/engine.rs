use core_sim::{
    is_notable_tick, raw_position, AdjustmentEvent, DisturbanceGenerator, DisturbanceSample,
    EnvironmentMarker, RunMetrics, SimulationConfig, StrategyHistory, TrackPoint,
};
use serde::Serialize;
use strategy::{CorrectionPolicy, Strategy};

use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};
use crate::mode::RunMode;
use crate::summary::ComparisonMetrics;

/// One strategy's car: carries the last committed position across ticks and
/// owns that strategy's history.
pub struct TrackingSimulation {
    policy: Box<dyn CorrectionPolicy + Send>,
    previous_position: f64,
    history: StrategyHistory,
}

impl TrackingSimulation {
    pub fn new(policy: Box<dyn CorrectionPolicy + Send>, ideal: f64) -> Self {
        Self {
            policy,
            previous_position: ideal,
            history: StrategyHistory::new(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.policy.strategy()
    }

    pub fn history(&self) -> &StrategyHistory {
        &self.history
    }

    pub fn advance(&mut self, tick: u64, disturbance: f64, ideal: f64) -> StrategyTick {
        let raw = raw_position(self.previous_position, disturbance, ideal);
        let correction = self.policy.evaluate(tick, raw, ideal);

        self.history.record_point(TrackPoint {
            tick,
            position: correction.committed_position,
        });
        if let Some(adjustment) = correction.adjustment {
            self.history.record_adjustment(adjustment);
        }
        self.previous_position = correction.committed_position;

        StrategyTick {
            strategy: self.strategy(),
            disturbance,
            raw_position: raw,
            committed_position: correction.committed_position,
            adjustment: correction.adjustment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyTick {
    pub strategy: Strategy,
    pub disturbance: f64,
    pub raw_position: f64,
    pub committed_position: f64,
    pub adjustment: Option<AdjustmentEvent>,
}

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub disturbance: f64,
    pub marker: Option<EnvironmentMarker>,
    pub strategies: Vec<StrategyTick>,
    pub completed: bool,
}

/// Drives every active strategy through the same disturbance sequence until
/// the configured terminal tick.
pub struct SimEngine {
    mode: RunMode,
    config: SimulationConfig,
    generator: DisturbanceGenerator,
    tick: u64,
    tracks: Vec<TrackingSimulation>,
    markers: Vec<EnvironmentMarker>,
    disturbances: Vec<DisturbanceSample>,
    metrics: Option<ComparisonMetrics>,
}

impl SimEngine {
    pub fn new(mode: RunMode, config: SimulationConfig, generator: DisturbanceGenerator) -> Self {
        let ideal = config.ideal_position();
        let tracks = mode
            .strategies()
            .iter()
            .map(|strategy| TrackingSimulation::new(strategy.policy(&config), ideal))
            .collect();

        Self {
            mode,
            config,
            generator,
            tick: 0,
            tracks,
            markers: Vec::new(),
            disturbances: Vec::new(),
            metrics: None,
        }
    }

    pub fn for_test_seed(seed: u64) -> Self {
        Self::new(
            RunMode::Both,
            SimulationConfig::default(),
            DisturbanceGenerator::new(seed),
        )
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of ticks processed so far; the next tick to run has this index.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn is_complete(&self) -> bool {
        self.tick >= self.config.terminal_tick()
    }

    pub fn history(&self, strategy: Strategy) -> Option<&StrategyHistory> {
        self.tracks
            .iter()
            .find(|track| track.strategy() == strategy)
            .map(TrackingSimulation::history)
    }

    pub fn environment_markers(&self) -> &[EnvironmentMarker] {
        &self.markers
    }

    pub fn disturbances(&self) -> &[DisturbanceSample] {
        &self.disturbances
    }

    /// `None` until the terminal tick has been processed.
    pub fn metrics(&self) -> Option<&ComparisonMetrics> {
        self.metrics.as_ref()
    }

    /// Runs one tick to completion. Returns `None` once the run is complete.
    pub fn step_once(&mut self, log: &mut dyn RunLogWriter) -> Option<TickReport> {
        if self.is_complete() {
            return None;
        }

        let tick = self.tick;
        let ideal = self.config.ideal_position();
        log.write(RunLogEvent::new(tick, RunLogEventKind::TickStarted));

        let disturbance = self
            .generator
            .disturbance(tick, self.config.variability_scale());
        self.disturbances.push(DisturbanceSample {
            tick,
            value: disturbance,
        });
        log.write(
            RunLogEvent::new(tick, RunLogEventKind::DisturbanceApplied).with_value(disturbance),
        );

        let marker = is_notable_tick(tick).then_some(EnvironmentMarker {
            tick,
            magnitude: disturbance,
        });
        if let Some(marker) = marker {
            self.markers.push(marker);
            log.write(
                RunLogEvent::new(tick, RunLogEventKind::MarkerRecorded).with_value(marker.magnitude),
            );
        }

        let mut strategies = Vec::with_capacity(self.tracks.len());
        for track in &mut self.tracks {
            let outcome = track.advance(tick, disturbance, ideal);
            if let Some(adjustment) = outcome.adjustment {
                log.write(
                    RunLogEvent::new(tick, RunLogEventKind::AdjustmentRecorded)
                        .for_strategy(outcome.strategy)
                        .with_value(adjustment.correction_amount),
                );
            }
            strategies.push(outcome);
        }
        log.write(RunLogEvent::new(tick, RunLogEventKind::HistoriesAppended));

        self.tick += 1;
        let completed = self.is_complete();
        if completed {
            self.metrics = Some(self.aggregate_metrics());
            log.write(RunLogEvent::new(tick, RunLogEventKind::RunCompleted));
        }

        Some(TickReport {
            tick,
            disturbance,
            marker,
            strategies,
            completed,
        })
    }

    fn aggregate_metrics(&self) -> ComparisonMetrics {
        let ideal = self.config.ideal_position();
        let mut metrics = ComparisonMetrics::default();
        for track in &self.tracks {
            metrics.set(
                track.strategy(),
                RunMetrics::from_history(track.history(), ideal),
            );
        }
        metrics
    }
}
