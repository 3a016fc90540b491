pub mod driver;
pub mod engine;
pub mod events;
pub mod logging;
pub mod mode;
pub mod session;
pub mod summary;

pub use driver::{interval_for_speed, TickDriver, DEFAULT_TICK_INTERVAL};
pub use engine::{SimEngine, StrategyTick, TickReport, TrackingSimulation};
pub use events::RunEvent;
pub use mode::RunMode;
pub use session::{RunSnapshot, SimulationSession, SpikeSource, StartRunError, TickApplication};
pub use summary::{explanation, ComparisonMetrics};
