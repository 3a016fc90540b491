use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONTINUOUS_CADENCE: u64 = 2;
pub const DEFAULT_CONTINUOUS_STRENGTH_PCT: f64 = 30.0;
pub const DEFAULT_CONTINUAL_CADENCE: u64 = 10;
pub const DEFAULT_CONTINUAL_THRESHOLD: f64 = 10.0;
pub const DEFAULT_CONTINUAL_STRENGTH_PCT: f64 = 70.0;
pub const DEFAULT_ENVIRONMENT_VARIABILITY: f64 = 50.0;
pub const DEFAULT_IDEAL_POSITION: f64 = 200.0;
pub const DEFAULT_TERMINAL_TICK: u64 = 150;
/// Longest run accepted; every tick keeps a point per strategy.
pub const MAX_TERMINAL_TICK: u64 = 10_000;

/// Variability value that maps to a disturbance scale of exactly 1.0.
pub const BASELINE_VARIABILITY: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("continuous cadence must be a positive tick interval, got {0}")]
    InvalidContinuousCadence(u64),
    #[error("continuous strength must be a percentage in (0, 100], got {0}")]
    InvalidContinuousStrength(f64),
    #[error("continual cadence must be a positive tick interval, got {0}")]
    InvalidContinualCadence(u64),
    #[error("continual threshold must be finite and non-negative, got {0}")]
    InvalidContinualThreshold(f64),
    #[error("continual strength must be a percentage in (0, 100], got {0}")]
    InvalidContinualStrength(f64),
    #[error("environment variability must be finite and non-negative, got {0}")]
    InvalidEnvironmentVariability(f64),
    #[error("ideal position must be finite, got {0}")]
    InvalidIdealPosition(f64),
    #[error("terminal tick count must be in 1..=10000, got {0}")]
    InvalidTerminalTick(u64),
}

/// Flat set of named options as a viewer submits them. Strengths are
/// percentages, matching the sliders; missing fields take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    pub continuous_cadence: u64,
    pub continuous_strength_pct: f64,
    pub continual_cadence: u64,
    pub continual_threshold: f64,
    pub continual_strength_pct: f64,
    pub environment_variability: f64,
    pub ideal_position: f64,
    pub terminal_tick: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            continuous_cadence: DEFAULT_CONTINUOUS_CADENCE,
            continuous_strength_pct: DEFAULT_CONTINUOUS_STRENGTH_PCT,
            continual_cadence: DEFAULT_CONTINUAL_CADENCE,
            continual_threshold: DEFAULT_CONTINUAL_THRESHOLD,
            continual_strength_pct: DEFAULT_CONTINUAL_STRENGTH_PCT,
            environment_variability: DEFAULT_ENVIRONMENT_VARIABILITY,
            ideal_position: DEFAULT_IDEAL_POSITION,
            terminal_tick: DEFAULT_TERMINAL_TICK,
        }
    }
}

/// Validated, immutable parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationConfig {
    continuous_cadence: u64,
    continuous_strength: f64,
    continual_cadence: u64,
    continual_threshold: f64,
    continual_strength: f64,
    environment_variability: f64,
    ideal_position: f64,
    terminal_tick: u64,
}

impl SimulationConfig {
    pub fn new(options: SimulationOptions) -> Result<Self, ConfigError> {
        if options.continuous_cadence == 0 {
            return Err(ConfigError::InvalidContinuousCadence(
                options.continuous_cadence,
            ));
        }
        if !is_valid_strength_pct(options.continuous_strength_pct) {
            return Err(ConfigError::InvalidContinuousStrength(
                options.continuous_strength_pct,
            ));
        }
        if options.continual_cadence == 0 {
            return Err(ConfigError::InvalidContinualCadence(
                options.continual_cadence,
            ));
        }
        if !options.continual_threshold.is_finite() || options.continual_threshold < 0.0 {
            return Err(ConfigError::InvalidContinualThreshold(
                options.continual_threshold,
            ));
        }
        if !is_valid_strength_pct(options.continual_strength_pct) {
            return Err(ConfigError::InvalidContinualStrength(
                options.continual_strength_pct,
            ));
        }
        if !options.environment_variability.is_finite() || options.environment_variability < 0.0
        {
            return Err(ConfigError::InvalidEnvironmentVariability(
                options.environment_variability,
            ));
        }
        if !options.ideal_position.is_finite() {
            return Err(ConfigError::InvalidIdealPosition(options.ideal_position));
        }
        if options.terminal_tick == 0 || options.terminal_tick > MAX_TERMINAL_TICK {
            return Err(ConfigError::InvalidTerminalTick(options.terminal_tick));
        }

        Ok(Self {
            continuous_cadence: options.continuous_cadence,
            continuous_strength: options.continuous_strength_pct / 100.0,
            continual_cadence: options.continual_cadence,
            continual_threshold: options.continual_threshold,
            continual_strength: options.continual_strength_pct / 100.0,
            environment_variability: options.environment_variability,
            ideal_position: options.ideal_position,
            terminal_tick: options.terminal_tick,
        })
    }

    pub fn continuous_cadence(&self) -> u64 {
        self.continuous_cadence
    }

    /// Fraction of the deviation removed on each continuous correction.
    pub fn continuous_strength(&self) -> f64 {
        self.continuous_strength
    }

    pub fn continual_cadence(&self) -> u64 {
        self.continual_cadence
    }

    pub fn continual_threshold(&self) -> f64 {
        self.continual_threshold
    }

    /// Fraction of the deviation removed on each continual correction.
    pub fn continual_strength(&self) -> f64 {
        self.continual_strength
    }

    pub fn environment_variability(&self) -> f64 {
        self.environment_variability
    }

    /// Multiplier applied to every disturbance term; 1.0 at the baseline
    /// variability.
    pub fn variability_scale(&self) -> f64 {
        self.environment_variability / BASELINE_VARIABILITY
    }

    pub fn ideal_position(&self) -> f64 {
        self.ideal_position
    }

    pub fn terminal_tick(&self) -> u64 {
        self.terminal_tick
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            continuous_cadence: DEFAULT_CONTINUOUS_CADENCE,
            continuous_strength: DEFAULT_CONTINUOUS_STRENGTH_PCT / 100.0,
            continual_cadence: DEFAULT_CONTINUAL_CADENCE,
            continual_threshold: DEFAULT_CONTINUAL_THRESHOLD,
            continual_strength: DEFAULT_CONTINUAL_STRENGTH_PCT / 100.0,
            environment_variability: DEFAULT_ENVIRONMENT_VARIABILITY,
            ideal_position: DEFAULT_IDEAL_POSITION,
            terminal_tick: DEFAULT_TERMINAL_TICK,
        }
    }
}

impl TryFrom<SimulationOptions> for SimulationConfig {
    type Error = ConfigError;

    fn try_from(options: SimulationOptions) -> Result<Self, Self::Error> {
        Self::new(options)
    }
}

fn is_valid_strength_pct(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= 100.0
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SimulationConfig, SimulationOptions, MAX_TERMINAL_TICK};

    #[test]
    fn default_options_validate_into_default_config() {
        let config = SimulationConfig::new(SimulationOptions::default()).unwrap();

        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.continuous_strength(), 0.3);
        assert_eq!(config.continual_strength(), 0.7);
        assert_eq!(config.variability_scale(), 1.0);
    }

    #[test]
    fn rejects_zero_cadences() {
        let err = SimulationConfig::new(SimulationOptions {
            continuous_cadence: 0,
            ..SimulationOptions::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidContinuousCadence(0));

        let err = SimulationConfig::new(SimulationOptions {
            continual_cadence: 0,
            ..SimulationOptions::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidContinualCadence(0));
    }

    #[test]
    fn rejects_strength_outside_percentage_range() {
        for bad in [0.0, -5.0, 100.5, f64::NAN] {
            let err = SimulationConfig::new(SimulationOptions {
                continuous_strength_pct: bad,
                ..SimulationOptions::default()
            })
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidContinuousStrength(_)));
        }

        let config = SimulationConfig::new(SimulationOptions {
            continual_strength_pct: 100.0,
            ..SimulationOptions::default()
        })
        .unwrap();
        assert_eq!(config.continual_strength(), 1.0);
    }

    #[test]
    fn zero_threshold_and_zero_variability_are_allowed() {
        let config = SimulationConfig::new(SimulationOptions {
            continual_threshold: 0.0,
            environment_variability: 0.0,
            ..SimulationOptions::default()
        })
        .unwrap();

        assert_eq!(config.continual_threshold(), 0.0);
        assert_eq!(config.variability_scale(), 0.0);
    }

    #[test]
    fn rejects_negative_threshold_and_variability() {
        let err = SimulationConfig::new(SimulationOptions {
            continual_threshold: -1.0,
            ..SimulationOptions::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidContinualThreshold(-1.0));

        let err = SimulationConfig::new(SimulationOptions {
            environment_variability: -0.5,
            ..SimulationOptions::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidEnvironmentVariability(-0.5));
    }

    #[test]
    fn rejects_zero_terminal_tick() {
        let err = SimulationConfig::new(SimulationOptions {
            terminal_tick: 0,
            ..SimulationOptions::default()
        })
        .unwrap_err();

        assert_eq!(err, ConfigError::InvalidTerminalTick(0));
        assert_eq!(
            err.to_string(),
            "terminal tick count must be in 1..=10000, got 0"
        );
    }

    #[test]
    fn rejects_terminal_tick_beyond_maximum() {
        let config = SimulationConfig::new(SimulationOptions {
            terminal_tick: MAX_TERMINAL_TICK,
            ..SimulationOptions::default()
        })
        .unwrap();
        assert_eq!(config.terminal_tick(), MAX_TERMINAL_TICK);

        for bad in [MAX_TERMINAL_TICK + 1, u64::MAX] {
            let err = SimulationConfig::new(SimulationOptions {
                terminal_tick: bad,
                ..SimulationOptions::default()
            })
            .unwrap_err();
            assert_eq!(err, ConfigError::InvalidTerminalTick(bad));
        }
    }

    #[test]
    fn partial_options_fill_missing_fields_with_defaults() {
        let options: SimulationOptions =
            serde_json::from_str(r#"{"continual_threshold": 4.5, "environment_variability": 100}"#)
                .unwrap();

        assert_eq!(options.continual_threshold, 4.5);
        assert_eq!(options.environment_variability, 100.0);
        assert_eq!(options.continuous_cadence, 2);
        assert_eq!(options.terminal_tick, 150);

        let config = SimulationConfig::try_from(options).unwrap();
        assert_eq!(config.variability_scale(), 2.0);
    }
}
