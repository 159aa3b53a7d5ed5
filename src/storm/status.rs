//! Countdown / progress readout for the storm timer label.

use super::{Phase, StormState, ZoneKind};
use crate::config::StormConfig;

const REGULAR_COLOR: &str = "rgba(168, 100, 253, 1)";
const ALERT_COLOR: &str = "#ff4444";

/// What the timer label should say, derived from storm state alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StormStatus {
    /// Waiting before a shrink or move segment.
    Countdown { kind: ZoneKind, seconds: u32 },
    /// Waiting before the closing segment.
    FinalCountdown { seconds: u32 },
    /// Shrink or move segment underway.
    Progress { kind: ZoneKind, percent: u32 },
    /// Closing segment underway.
    Closing { percent: u32, seconds: u32 },
    Closed,
}

impl StormStatus {
    pub fn derive(storm: &StormState, now: f64, cfg: &StormConfig) -> Self {
        if storm.is_closed() {
            return StormStatus::Closed;
        }
        let timing = storm.timing(cfg);
        let elapsed = storm.elapsed(now);
        let is_final = storm.segment_kind() == ZoneKind::Final;

        match storm.phase() {
            Phase::Waiting => {
                let seconds = seconds_left(timing.wait_ms - elapsed);
                if is_final {
                    StormStatus::FinalCountdown { seconds }
                } else {
                    StormStatus::Countdown {
                        kind: storm.zone().kind,
                        seconds,
                    }
                }
            }
            Phase::Shrinking => {
                let percent = (storm.progress(now, cfg) * 100.0).round() as u32;
                if is_final {
                    StormStatus::Closing {
                        percent,
                        seconds: seconds_left(timing.travel_ms - elapsed),
                    }
                } else {
                    StormStatus::Progress {
                        kind: storm.zone().kind,
                        percent,
                    }
                }
            }
        }
    }

    pub fn text(&self) -> String {
        match *self {
            StormStatus::Countdown { kind, seconds } => {
                let verb = if kind == ZoneKind::Move { "moves" } else { "shrinks" };
                format!("Storm {verb} in {seconds}s")
            }
            StormStatus::FinalCountdown { seconds } => {
                format!("FINAL BATTLE - Storm will close completely in {seconds}s!")
            }
            StormStatus::Progress { kind, percent } => {
                let verb = if kind == ZoneKind::Move { "moving" } else { "shrinking" };
                format!("Storm {verb} {percent}%")
            }
            StormStatus::Closing { percent, seconds } => {
                format!("Storm closing {percent}% - {seconds}s left!")
            }
            StormStatus::Closed => "Storm Closed".to_string(),
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            StormStatus::FinalCountdown { .. } | StormStatus::Closing { .. } | StormStatus::Closed
        )
    }

    pub fn color(&self) -> &'static str {
        if self.is_alert() {
            ALERT_COLOR
        } else {
            REGULAR_COLOR
        }
    }
}

// Whole seconds remaining, rounded up like a countdown.
fn seconds_left(ms: f64) -> u32 {
    (ms / 1000.0).ceil().max(0.0) as u32
}
