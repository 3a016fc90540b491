use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackPoint {
    pub tick: u64,
    pub position: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdjustmentEvent {
    pub tick: u64,
    pub resulting_position: f64,
    pub correction_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentMarker {
    pub tick: u64,
    pub magnitude: f64,
}

/// The disturbance applied on one tick, kept so viewers draw the wave the
/// strategies actually faced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisturbanceSample {
    pub tick: u64,
    pub value: f64,
}

/// Append-only record of one strategy's committed positions and corrections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrategyHistory {
    points: Vec<TrackPoint>,
    adjustments: Vec<AdjustmentEvent>,
}

impl StrategyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_point(&mut self, point: TrackPoint) {
        debug_assert!(
            self.points
                .last()
                .map_or(point.tick == 0, |last| point.tick == last.tick + 1),
            "track points must be contiguous from tick 0"
        );
        self.points.push(point);
    }

    pub fn record_adjustment(&mut self, adjustment: AdjustmentEvent) {
        self.adjustments.push(adjustment);
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn adjustments(&self) -> &[AdjustmentEvent] {
        &self.adjustments
    }

    pub fn last_position(&self) -> Option<f64> {
        self.points.last().map(|point| point.position)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
