//! Storm: the shrinking boundary outside of which the player takes damage.
//!
//! A `StormSchedule` is a fixed script of zones. `StormState` walks it with a
//! two-phase cursor:
//!
//! - `Waiting`: the boundary is stationary while a countdown runs.
//! - `Shrinking`: the boundary interpolates from the current zone toward the
//!   next one (size and center share the same eased progress).
//!
//! Arriving at the zero-size final zone latches `closed`. Everything here is
//! driven by an explicit `now` (milliseconds) so it runs headless.

mod schedule;
mod status;

pub use schedule::{MOVE_ZONES, SHRINK_ZONES, StormSchedule, ZONE_COUNT};
pub use status::StormStatus;

use crate::config::{PhaseTiming, StormConfig};
use crate::player::PlayerState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneKind {
    Shrink,
    Move,
    Final,
}

/// One scripted waypoint of the storm. `size` is the side of the safe square.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub center_x: f64,
    pub center_y: f64,
    pub size: f64,
    pub kind: ZoneKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Shrinking,
}

/// Runtime cursor over a `StormSchedule`.
#[derive(Clone, Debug)]
pub struct StormState {
    schedule: StormSchedule,
    zone_index: usize,
    phase: Phase,
    phase_start_ms: f64,
    center_x: f64,
    center_y: f64,
    current_size: f64,
    target_size: f64,
    // Size at the first tick of the current Shrinking phase.
    shrink_start: Option<f64>,
    last_damage_ms: Option<f64>,
    closed: bool,
}

impl StormState {
    pub fn new(schedule: StormSchedule, now: f64) -> Self {
        let first = schedule.zones()[0];
        let target_size = schedule.get(1).map_or(first.size, |z| z.size);
        Self {
            schedule,
            zone_index: 0,
            phase: Phase::Waiting,
            phase_start_ms: now,
            center_x: first.center_x,
            center_y: first.center_y,
            current_size: first.size,
            target_size,
            shrink_start: None,
            last_damage_ms: None,
            closed: false,
        }
    }

    pub fn schedule(&self) -> &StormSchedule {
        &self.schedule
    }

    pub fn zone_index(&self) -> usize {
        self.zone_index
    }

    pub fn zone(&self) -> &Zone {
        &self.schedule.zones()[self.zone_index]
    }

    pub fn next_zone(&self) -> Option<&Zone> {
        self.schedule.get(self.zone_index + 1)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    pub fn current_size(&self) -> f64 {
        self.current_size
    }

    pub fn target_size(&self) -> f64 {
        self.target_size
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn safe_area(&self) -> f64 {
        let side = self.current_size.max(0.0);
        side * side
    }

    /// Milliseconds spent in the current phase (never negative: rAF stamps can
    /// predate the `performance.now()` taken at construction).
    pub fn elapsed(&self, now: f64) -> f64 {
        (now - self.phase_start_ms).max(0.0)
    }

    /// Kind of the segment from the current zone to the next one. The segment
    /// that ends in the final zone is the closing segment.
    pub fn segment_kind(&self) -> ZoneKind {
        match self.next_zone() {
            Some(next) if next.kind == ZoneKind::Final => ZoneKind::Final,
            _ => self.zone().kind,
        }
    }

    /// Durations for the current segment. Keyed on `segment_kind` so the closing
    /// profile applies to the segment into the final zone; keyed on the current
    /// zone alone it would never run, since the final zone has no successor.
    pub fn timing<'c>(&self, cfg: &'c StormConfig) -> &'c PhaseTiming {
        match self.segment_kind() {
            ZoneKind::Shrink => &cfg.shrink,
            ZoneKind::Move => &cfg.movement,
            ZoneKind::Final => &cfg.closing,
        }
    }

    /// Progress of the current Shrinking phase in `0..=1` (0 while waiting).
    pub fn progress(&self, now: f64, cfg: &StormConfig) -> f64 {
        match self.phase {
            Phase::Waiting => 0.0,
            Phase::Shrinking => (self.elapsed(now) / self.timing(cfg).travel_ms).min(1.0),
        }
    }

    /// `(left, top, side)` of the safe square.
    pub fn bounds(&self) -> (f64, f64, f64) {
        let size = self.current_size.max(0.0);
        (self.center_x - size / 2.0, self.center_y - size / 2.0, size)
    }

    /// True when `(x, y)` lies outside the closed safe square.
    pub fn is_outside(&self, x: f64, y: f64) -> bool {
        let (left, top, size) = self.bounds();
        x < left || x > left + size || y < top || y > top + size
    }

    /// Advance the cursor to `now`.
    pub fn update(&mut self, now: f64, cfg: &StormConfig) {
        let elapsed = self.elapsed(now);
        let timing = *self.timing(cfg);

        match self.phase {
            Phase::Shrinking => {
                if elapsed >= timing.travel_ms {
                    self.finish_segment(now);
                } else {
                    self.interpolate(timing.easing.apply(elapsed / timing.travel_ms));
                }
            }
            Phase::Waiting => {
                if elapsed >= timing.wait_ms && self.next_zone().is_some() {
                    self.phase = Phase::Shrinking;
                    self.phase_start_ms = now;
                    self.shrink_start = None;
                    log::debug!(
                        "storm leaving zone {} ({:?})",
                        self.zone_index,
                        self.segment_kind()
                    );
                }
            }
        }

        self.latch_closure();
    }

    fn interpolate(&mut self, eased: f64) {
        let start = *self.shrink_start.get_or_insert(self.current_size);
        self.current_size = (start + (self.target_size - start) * eased).max(0.0);

        let from = *self.zone();
        if let Some(to) = self.next_zone().copied() {
            self.center_x = from.center_x + (to.center_x - from.center_x) * eased;
            self.center_y = from.center_y + (to.center_y - from.center_y) * eased;
        }
    }

    fn finish_segment(&mut self, now: f64) {
        self.zone_index += 1;
        self.phase = Phase::Waiting;
        self.phase_start_ms = now;
        self.shrink_start = None;

        let zone = *self.zone();
        self.center_x = zone.center_x;
        self.center_y = zone.center_y;
        match self.next_zone().copied() {
            Some(next) => {
                self.current_size = zone.size;
                self.target_size = next.size;
            }
            // End of the script: hold at the last target from here on.
            None => self.current_size = self.target_size.max(0.0),
        }
        log::debug!(
            "storm reached zone {}/{} ({:?}, size {:.1})",
            self.zone_index,
            self.schedule.last_index(),
            zone.kind,
            self.current_size
        );
    }

    // The only writer of `closed`.
    fn latch_closure(&mut self) {
        if !self.closed && self.safe_area() <= 0.0 {
            self.closed = true;
            log::info!("storm closed at zone {}", self.zone_index);
        }
    }

    /// Storm damage for this frame. Returns whether damage was dealt.
    pub fn apply_damage(&mut self, player: &mut PlayerState, now: f64, cfg: &StormConfig) -> bool {
        if !self.is_outside(player.x, player.y) {
            return false;
        }
        let due = self
            .last_damage_ms
            .is_none_or(|last| now - last >= cfg.damage_interval_ms);
        if due {
            player.damage(cfg.damage_per_tick);
            self.last_damage_ms = Some(now);
        }
        due
    }

    /// Debug fast-forward: pretend the current phase began `ms` earlier.
    pub fn skip(&mut self, ms: f64) {
        self.phase_start_ms -= ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn storm_at(now: f64) -> (StormState, StormConfig) {
        let cfg = StormConfig::default();
        let schedule =
            StormSchedule::generate(1024.0, 768.0, &cfg, &mut Pcg32::seed_from_u64(11));
        (StormState::new(schedule, now), cfg)
    }

    fn centered_player() -> PlayerState {
        let cfg = GameConfig::default();
        PlayerState::new(&cfg.player, cfg.canvas_width, cfg.canvas_height)
    }

    #[test]
    fn starts_waiting_fully_open() {
        let (storm, _) = storm_at(0.0);
        assert_eq!(storm.phase(), Phase::Waiting);
        assert_eq!(storm.zone_index(), 0);
        assert_eq!(storm.current_size(), 1024.0);
        assert!((storm.target_size() - 614.4).abs() < 1e-9);
        assert!(!storm.is_closed());
    }

    #[test]
    fn waits_then_shrinks_then_advances() {
        let (mut storm, cfg) = storm_at(0.0);
        storm.update(1999.0, &cfg);
        assert_eq!(storm.phase(), Phase::Waiting);
        storm.update(2000.0, &cfg);
        assert_eq!(storm.phase(), Phase::Shrinking);
        assert_eq!(storm.zone_index(), 0);

        // Elapsed == shrink duration finishes the segment.
        storm.update(5000.0, &cfg);
        assert_eq!(storm.phase(), Phase::Waiting);
        assert_eq!(storm.zone_index(), 1);
        let zone1 = storm.schedule().zones()[1];
        assert_eq!(storm.current_size(), zone1.size);
        assert_eq!(storm.center(), (zone1.center_x, zone1.center_y));
        assert_eq!(storm.target_size(), storm.schedule().zones()[2].size);
    }

    #[test]
    fn shrink_interpolation_is_cubic_out() {
        let (mut storm, cfg) = storm_at(0.0);
        storm.update(2000.0, &cfg);
        // Halfway through the 3000ms shrink: eased progress 0.875.
        storm.update(3500.0, &cfg);
        let expected = 1024.0 + (614.4 - 1024.0) * 0.875;
        assert!((storm.current_size() - expected).abs() < 1e-9);

        let z0 = storm.schedule().zones()[0];
        let z1 = storm.schedule().zones()[1];
        let cx = z0.center_x + (z1.center_x - z0.center_x) * 0.875;
        assert!((storm.center().0 - cx).abs() < 1e-9);
    }

    #[test]
    fn shrink_start_latches_on_first_tick() {
        let (mut storm, cfg) = storm_at(0.0);
        storm.update(2000.0, &cfg);
        storm.update(2100.0, &cfg);
        let early = storm.current_size();
        storm.update(2200.0, &cfg);
        // Interpolates from the latched 1024, not from the already-shrunk size.
        let eased = cfg.shrink.easing.apply(200.0 / 3000.0);
        assert!((storm.current_size() - (1024.0 + (614.4 - 1024.0) * eased)).abs() < 1e-9);
        assert!(storm.current_size() < early);
    }

    #[test]
    fn centered_player_safe_while_open() {
        let (mut storm, cfg) = storm_at(0.0);
        let mut player = centered_player();
        for t in 0..50 {
            let now = t as f64 * 16.0;
            storm.update(now, &cfg);
            assert!(!storm.apply_damage(&mut player, now, &cfg));
        }
        assert_eq!(player.current_health(), player.max_health());
    }

    #[test]
    fn damage_is_rate_limited() {
        let (mut storm, cfg) = storm_at(0.0);
        let mut player = centered_player();
        player.x = 5000.0; // far outside; position clamps are not under test here
        assert!(storm.apply_damage(&mut player, 100.0, &cfg));
        assert!(!storm.apply_damage(&mut player, 600.0, &cfg));
        assert!(!storm.apply_damage(&mut player, 1099.0, &cfg));
        assert!(storm.apply_damage(&mut player, 1100.0, &cfg));
        assert_eq!(player.current_health(), player.max_health() - 2);
    }

    #[test]
    fn boundary_edge_counts_as_inside() {
        let (storm, _) = storm_at(0.0);
        let (left, top, size) = storm.bounds();
        assert!(!storm.is_outside(left, top));
        assert!(!storm.is_outside(left + size, top + size));
        assert!(storm.is_outside(left - 0.5, top));
    }

    #[test]
    fn skip_pushes_phase_forward() {
        let (mut storm, cfg) = storm_at(0.0);
        storm.skip(cfg.debug_skip_ms);
        storm.update(0.0, &cfg);
        assert_eq!(storm.phase(), Phase::Shrinking);
    }

    #[test]
    fn segment_into_final_zone_uses_closing_profile() {
        let (mut storm, cfg) = storm_at(0.0);
        assert_eq!(storm.segment_kind(), ZoneKind::Shrink);
        storm.zone_index = 9;
        assert_eq!(storm.zone().kind, ZoneKind::Move);
        assert_eq!(storm.segment_kind(), ZoneKind::Final);
        assert_eq!(storm.timing(&cfg), &cfg.closing);
        storm.zone_index = 7;
        assert_eq!(storm.timing(&cfg), &cfg.movement);
    }
}
