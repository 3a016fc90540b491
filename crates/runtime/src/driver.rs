use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use core_sim::SimulationConfig;
use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::events::RunEvent;
use crate::mode::RunMode;
use crate::session::{RunSnapshot, SimulationSession, StartRunError, TickApplication};
use crate::summary::explanation;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);
pub const MAX_SPEED: u32 = 99;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Tick interval for a viewer speed setting: `100 - speed` milliseconds.
pub fn interval_for_speed(speed: u32) -> Result<Duration, StartRunError> {
    if speed > MAX_SPEED {
        return Err(StartRunError::InvalidSpeed(speed));
    }
    Ok(Duration::from_millis(u64::from(100 - speed)))
}

/// Owns the session behind a lock and the single background ticker that
/// advances it. Cloning shares both.
#[derive(Clone)]
pub struct TickDriver {
    session: Arc<Mutex<SimulationSession>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    events_tx: broadcast::Sender<RunEvent>,
    default_interval: Duration,
}

impl TickDriver {
    pub fn new(session: SimulationSession, default_interval: Duration) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            session: Arc::new(Mutex::new(session)),
            ticker: Arc::new(Mutex::new(None)),
            events_tx,
            default_interval,
        }
    }

    pub fn default_interval(&self) -> Duration {
        self.default_interval
    }

    /// Resets the session and schedules the new run's first tick as one step
    /// under the session lock, so readers never observe a half-reset run.
    /// Events are published under the same lock, so subscribers never see a
    /// tick of a replaced run after the new run's `run_started`.
    /// Must be called from within a tokio runtime.
    pub fn start_run(
        &self,
        mode: RunMode,
        config: SimulationConfig,
        interval: Option<Duration>,
    ) -> Result<u64, StartRunError> {
        let interval = interval.unwrap_or(self.default_interval);

        let mut session = lock(&self.session);
        let run_id = session.start_run(mode, config)?;

        let mut ticker = lock(&self.ticker);
        if let Some(previous) = ticker.take() {
            previous.abort();
        }
        *ticker = Some(tokio::spawn(run_ticks(
            Arc::clone(&self.session),
            self.events_tx.clone(),
            run_id,
            interval,
        )));
        drop(ticker);

        let _ = self.events_tx.send(RunEvent::run_started(
            run_id,
            mode,
            config,
            explanation(mode, &config),
        ));
        drop(session);
        Ok(run_id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.events_tx.subscribe()
    }

    pub fn snapshot(&self) -> RunSnapshot {
        lock(&self.session).snapshot()
    }

    /// Runs `read` against the session without letting it mutate anything.
    pub fn read<R>(&self, read: impl FnOnce(&SimulationSession) -> R) -> R {
        let session = lock(&self.session);
        read(&session)
    }
}

async fn run_ticks(
    session: Arc<Mutex<SimulationSession>>,
    events_tx: broadcast::Sender<RunEvent>,
    run_id: u64,
    interval: Duration,
) {
    let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !publish_tick(&session, &events_tx, run_id) {
            return;
        }
    }
}

/// Applies one tick and publishes its events under the session lock.
/// Returns whether the ticker should keep running.
fn publish_tick(
    session: &Mutex<SimulationSession>,
    events_tx: &broadcast::Sender<RunEvent>,
    run_id: u64,
) -> bool {
    let mut session = lock(session);
    match session.apply_tick(run_id) {
        TickApplication::Applied(report) => {
            let completed = report.completed;
            let _ = events_tx.send(RunEvent::tick(run_id, report));
            if completed {
                if let Some(metrics) = session.metrics() {
                    let _ = events_tx.send(RunEvent::run_completed(run_id, metrics));
                }
            }
            !completed
        }
        TickApplication::Stale => {
            tracing::debug!(run_id, "ticker for replaced run stopped");
            false
        }
        TickApplication::Complete => false,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
