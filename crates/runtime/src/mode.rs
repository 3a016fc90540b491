use serde::{Deserialize, Serialize};
use strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Continuous,
    Continual,
    Both,
}

impl RunMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "continuous" => Some(Self::Continuous),
            "continual" => Some(Self::Continual),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Continual => "continual",
            Self::Both => "both",
        }
    }

    pub fn strategies(self) -> &'static [Strategy] {
        match self {
            Self::Continuous => &[Strategy::Continuous],
            Self::Continual => &[Strategy::Continual],
            Self::Both => &Strategy::ALL,
        }
    }

    pub fn includes(self, strategy: Strategy) -> bool {
        self.strategies().contains(&strategy)
    }
}

#[cfg(test)]
mod tests {
    use strategy::Strategy;

    use super::RunMode;

    #[test]
    fn both_mode_runs_every_strategy() {
        assert_eq!(RunMode::Both.strategies(), &Strategy::ALL);
        assert!(RunMode::Both.includes(Strategy::Continual));
    }

    #[test]
    fn single_modes_run_one_strategy() {
        assert!(RunMode::Continuous.includes(Strategy::Continuous));
        assert!(!RunMode::Continuous.includes(Strategy::Continual));
        assert_eq!(RunMode::Continual.strategies(), &[Strategy::Continual]);
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!(RunMode::parse("both"), Some(RunMode::Both));
        assert_eq!(RunMode::parse("continual"), Some(RunMode::Continual));
        assert_eq!(RunMode::parse("sometimes"), None);
    }
}
