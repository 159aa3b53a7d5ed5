//! Headless game aggregate: owns every state struct and runs one frame of
//! simulation per `update(now)`. The web layer wraps this with a canvas and
//! DOM labels; tests drive it directly.

use rand::Rng;

use crate::config::GameConfig;
use crate::input::{DebugAction, InputState};
use crate::metrics::{FrameMetrics, MetricsSample};
use crate::player::PlayerState;
use crate::storm::{StormSchedule, StormState, StormStatus};

/// What happened during one `Game::update`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub storm_damage: bool,
    pub metrics: Option<MetricsSample>,
}

pub struct Game {
    config: GameConfig,
    pub player: PlayerState,
    pub storm: StormState,
    pub input: InputState,
    pub metrics: FrameMetrics,
    eliminated_logged: bool,
}

impl Game {
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R, now: f64) -> Self {
        let schedule = StormSchedule::generate(
            config.canvas_width,
            config.canvas_height,
            &config.storm,
            rng,
        );
        Self::with_schedule(config, schedule, now)
    }

    pub fn with_schedule(config: GameConfig, schedule: StormSchedule, now: f64) -> Self {
        let player = PlayerState::new(&config.player, config.canvas_width, config.canvas_height);
        Self {
            player,
            storm: StormState::new(schedule, now),
            input: InputState::new(),
            metrics: FrameMetrics::new(now),
            config,
            eliminated_logged: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(action) = self.input.key_down(key) {
            self.apply_debug(action);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    pub fn apply_debug(&mut self, action: DebugAction) {
        match action {
            DebugAction::Heal => self.player.heal(1),
            DebugAction::Damage => self.player.damage(1),
            DebugAction::SkipStorm => self.storm.skip(self.config.storm.debug_skip_ms),
        }
        log::debug!(
            "debug {:?}: health {}/{}",
            action,
            self.player.current_health(),
            self.player.max_health()
        );
    }

    /// Metrics, player movement, storm advance, storm damage, in that order.
    pub fn update(&mut self, now: f64) -> FrameReport {
        let metrics = self.metrics.record_frame(now);

        self.player.step(
            self.input.direction(),
            self.config.canvas_width,
            self.config.canvas_height,
        );

        self.storm.update(now, &self.config.storm);
        let storm_damage = self
            .storm
            .apply_damage(&mut self.player, now, &self.config.storm);

        if self.player.is_eliminated() && !self.eliminated_logged {
            self.eliminated_logged = true;
            log::info!("player eliminated at zone {}", self.storm.zone_index());
        }

        FrameReport {
            storm_damage,
            metrics,
        }
    }

    pub fn status(&self, now: f64) -> StormStatus {
        StormStatus::derive(&self.storm, now, &self.config.storm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn game() -> Game {
        Game::new(GameConfig::default(), &mut Pcg32::seed_from_u64(9), 0.0)
    }

    #[test]
    fn debug_keys_drive_health_and_storm() {
        let mut g = game();
        g.key_down("m");
        g.key_down("M");
        assert_eq!(g.player.current_health(), 20);
        g.key_down("n");
        assert_eq!(g.player.current_health(), 21);

        g.key_down("b");
        g.update(0.0);
        assert_eq!(g.storm.phase(), crate::storm::Phase::Shrinking);
    }

    #[test]
    fn held_keys_move_player_each_frame() {
        let mut g = game();
        g.key_down("d");
        g.update(16.0);
        g.update(32.0);
        assert_eq!(g.player.x, 512.0 + 6.0);
        g.key_up("d");
        g.update(48.0);
        assert_eq!(g.player.x, 518.0);
    }

    #[test]
    fn zero_elapsed_no_keys_no_motion() {
        let mut g = game();
        let before = (g.player.x, g.player.y);
        g.update(0.0);
        assert_eq!((g.player.x, g.player.y), before);
    }
}
