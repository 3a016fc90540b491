mod config;
mod generators;
mod history;
mod metrics;

pub use config::{
    ConfigError, SimulationConfig, SimulationOptions, BASELINE_VARIABILITY,
    DEFAULT_CONTINUAL_CADENCE, DEFAULT_CONTINUAL_STRENGTH_PCT, DEFAULT_CONTINUAL_THRESHOLD,
    DEFAULT_CONTINUOUS_CADENCE, DEFAULT_CONTINUOUS_STRENGTH_PCT, DEFAULT_ENVIRONMENT_VARIABILITY,
    DEFAULT_IDEAL_POSITION, DEFAULT_TERMINAL_TICK, MAX_TERMINAL_TICK,
};
pub use generators::{baseline_wave, is_notable_tick, DisturbanceGenerator};
pub use history::{
    AdjustmentEvent, DisturbanceSample, EnvironmentMarker, StrategyHistory, TrackPoint,
};
pub use metrics::{adjustment_ratio, RunMetrics};

/// Fraction of the gap between the current position and `ideal + disturbance`
/// closed on each tick, before any correction policy acts.
pub const ENVIRONMENT_RESPONSE_RATE: f64 = 0.1;

/// Position after the environment acts for one tick: an exponential pull of
/// `previous` toward `ideal + disturbance`.
pub fn raw_position(previous: f64, disturbance: f64, ideal: f64) -> f64 {
    previous + (disturbance - previous + ideal) * ENVIRONMENT_RESPONSE_RATE
}
