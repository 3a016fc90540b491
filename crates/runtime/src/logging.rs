use strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLogEventKind {
    RunStarted,
    TickStarted,
    DisturbanceApplied,
    MarkerRecorded,
    AdjustmentRecorded,
    HistoriesAppended,
    RunCompleted,
    StaleTickSuppressed,
}

impl RunLogEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RunStarted => "run_started",
            Self::TickStarted => "tick_started",
            Self::DisturbanceApplied => "disturbance_applied",
            Self::MarkerRecorded => "marker_recorded",
            Self::AdjustmentRecorded => "adjustment_recorded",
            Self::HistoriesAppended => "histories_appended",
            Self::RunCompleted => "run_completed",
            Self::StaleTickSuppressed => "stale_tick_suppressed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunLogEvent {
    pub tick: u64,
    pub kind: RunLogEventKind,
    pub strategy: Option<Strategy>,
    pub value: Option<f64>,
}

impl RunLogEvent {
    pub fn new(tick: u64, kind: RunLogEventKind) -> Self {
        Self {
            tick,
            kind,
            strategy: None,
            value: None,
        }
    }

    pub fn for_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RunLogEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RunLogEvent] {
        &self.events
    }

    pub fn kinds(&self) -> Vec<RunLogEventKind> {
        self.events.iter().map(|event| event.kind).collect()
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events.push(event);
    }
}

/// Forwards run log events to `tracing`. Per-tick stages go out at trace
/// level; run lifecycle events at info.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRunLogWriter;

impl RunLogWriter for TracingRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        let strategy = event.strategy.map(Strategy::as_str);
        match event.kind {
            RunLogEventKind::RunStarted | RunLogEventKind::RunCompleted => {
                tracing::info!(tick = event.tick, kind = event.kind.as_str(), "run lifecycle");
            }
            RunLogEventKind::StaleTickSuppressed => {
                tracing::debug!(tick = event.tick, kind = event.kind.as_str(), "stale tick");
            }
            _ => {
                tracing::trace!(
                    tick = event.tick,
                    kind = event.kind.as_str(),
                    strategy,
                    value = event.value,
                    "run stage"
                );
            }
        }
    }
}
