//! Player square: movement with canvas containment, and clamped health.

use crate::config::PlayerConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub x: f64,
    pub y: f64,
    size: f64,
    speed: f64,
    max_health: u32,
    current_health: u32,
}

impl PlayerState {
    /// Full health, centered on a `width` x `height` canvas.
    pub fn new(cfg: &PlayerConfig, width: f64, height: f64) -> Self {
        Self {
            x: width / 2.0,
            y: height / 2.0,
            size: cfg.size,
            speed: cfg.speed,
            max_health: cfg.max_health,
            current_health: cfg.max_health,
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn current_health(&self) -> u32 {
        self.current_health
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.current_health as f64 / self.max_health as f64
    }

    pub fn is_eliminated(&self) -> bool {
        self.current_health == 0
    }

    pub fn heal(&mut self, amount: u32) {
        self.current_health = self.current_health.saturating_add(amount).min(self.max_health);
    }

    pub fn damage(&mut self, amount: u32) {
        self.current_health = self.current_health.saturating_sub(amount);
    }

    /// Move one frame along `dir` (a unit or zero vector) and stay on the canvas.
    pub fn step(&mut self, dir: (f64, f64), width: f64, height: f64) {
        self.x += dir.0 * self.speed;
        self.y += dir.1 * self.speed;
        self.clamp_to(width, height);
    }

    /// Keep the whole sprite inside `[0, width] x [0, height]`.
    pub fn clamp_to(&mut self, width: f64, height: f64) {
        let half = self.size / 2.0;
        self.x = self.x.clamp(half, (width - half).max(half));
        self.y = self.y.clamp(half, (height - half).max(half));
    }
}
