use core_sim::{AdjustmentEvent, SimulationConfig};
use serde::{Deserialize, Serialize};

use crate::{ContinualPolicy, ContinuousPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Continuous,
    Continual,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Continuous, Strategy::Continual];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Continual => "continual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "continuous" => Some(Self::Continuous),
            "continual" => Some(Self::Continual),
            _ => None,
        }
    }

    pub fn policy(self, config: &SimulationConfig) -> Box<dyn CorrectionPolicy + Send> {
        match self {
            Self::Continuous => Box::new(ContinuousPolicy::from_config(config)),
            Self::Continual => Box::new(ContinualPolicy::from_config(config)),
        }
    }
}

/// Outcome of a policy looking at one tick's raw position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub committed_position: f64,
    pub adjustment: Option<AdjustmentEvent>,
}

impl Correction {
    pub fn pass_through(raw_position: f64) -> Self {
        Self {
            committed_position: raw_position,
            adjustment: None,
        }
    }

    /// Removes `strength` of the deviation from `raw_position`.
    pub fn toward_ideal(tick: u64, raw_position: f64, ideal: f64, strength: f64) -> Self {
        let correction_amount = deviation(raw_position, ideal) * strength;
        let committed_position = raw_position - correction_amount;

        Self {
            committed_position,
            adjustment: Some(AdjustmentEvent {
                tick,
                resulting_position: committed_position,
                correction_amount,
            }),
        }
    }

    pub fn is_adjustment(&self) -> bool {
        self.adjustment.is_some()
    }
}

pub trait CorrectionPolicy {
    fn strategy(&self) -> Strategy;

    fn evaluate(&self, tick: u64, raw_position: f64, ideal: f64) -> Correction;
}

/// Signed tracking error a policy may correct.
pub fn deviation(raw_position: f64, ideal: f64) -> f64 {
    raw_position - ideal
}

pub(crate) fn is_cadence_tick(tick: u64, cadence: u64) -> bool {
    cadence != 0 && tick % cadence == 0
}
