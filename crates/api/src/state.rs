use core_sim::SimulationConfig;
use runtime::{
    RunMode, RunSnapshot, SimulationSession, SpikeSource, StartRunError, TickDriver,
    DEFAULT_TICK_INTERVAL,
};
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    driver: TickDriver,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SimulationSession::new(SpikeSource::Entropy), DEFAULT_TICK_INTERVAL)
    }
}

impl AppState {
    pub fn new(session: SimulationSession, default_interval: Duration) -> Self {
        Self {
            driver: TickDriver::new(session, default_interval),
        }
    }

    pub fn driver(&self) -> &TickDriver {
        &self.driver
    }

    pub fn start_run(
        &self,
        mode: RunMode,
        config: SimulationConfig,
        interval: Option<Duration>,
    ) -> Result<u64, StartRunError> {
        self.driver.start_run(mode, config, interval)
    }

    pub fn snapshot(&self) -> RunSnapshot {
        self.driver.snapshot()
    }

    #[cfg(test)]
    pub(crate) fn seeded_for_test(seed: u64, default_interval: Duration) -> Self {
        Self::new(SimulationSession::new(SpikeSource::Seeded(seed)), default_interval)
    }
}
