//! Tunables for the prototype. `Default` reproduces the original hand-tuned
//! constants; with the `serde_json` feature a page can override any subset of
//! them through `start_game_with_config`.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Easing applied to a storm segment's progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    Linear,
    /// `1 - (1 - p)^3`
    CubicOut,
}

impl Easing {
    /// Maps linear progress `p` (clamped to 0..=1) onto the eased curve.
    pub fn apply(self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        match self {
            Easing::Linear => p,
            Easing::CubicOut => 1.0 - (1.0 - p).powi(3),
        }
    }
}

/// Wait / travel durations for one kind of storm segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseTiming {
    pub wait_ms: f64,
    pub travel_ms: f64,
    pub easing: Easing,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StormConfig {
    pub shrink: PhaseTiming,
    pub movement: PhaseTiming,
    /// Countdown and closing of the last segment (into the zero-size zone).
    pub closing: PhaseTiming,
    pub min_zone_size: f64,
    /// Each shrink zone is `previous * shrink_factor` (floored at `min_zone_size`).
    pub shrink_factor: f64,
    pub damage_per_tick: u32,
    pub damage_interval_ms: f64,
    /// How far the `b` debug key pushes the current phase forward.
    pub debug_skip_ms: f64,
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            shrink: PhaseTiming {
                wait_ms: 2000.0,
                travel_ms: 3000.0,
                easing: Easing::CubicOut,
            },
            movement: PhaseTiming {
                wait_ms: 4000.0,
                travel_ms: 5000.0,
                easing: Easing::CubicOut,
            },
            closing: PhaseTiming {
                wait_ms: 5000.0,
                travel_ms: 10000.0,
                easing: Easing::Linear,
            },
            min_zone_size: 100.0,
            shrink_factor: 0.6,
            damage_per_tick: 1,
            damage_interval_ms: 1000.0,
            debug_skip_ms: 3000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    pub size: f64,
    /// Pixels per frame.
    pub speed: f64,
    pub max_health: u32,
    pub color: String,
    pub health_bar_width: f64,
    pub health_bar_height: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: 50.0,
            speed: 3.0,
            max_health: 22,
            color: "#4a9eff".to_string(),
            health_bar_width: 160.0,
            health_bar_height: 12.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub tile_size: f64,
    pub player: PlayerConfig,
    pub storm: StormConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1024.0,
            canvas_height: 768.0,
            tile_size: 64.0,
            player: PlayerConfig::default(),
            storm: StormConfig::default(),
        }
    }
}

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A length, speed or duration that must be strictly positive.
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    /// A wait that may be zero but not below.
    #[error("{field} wait must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("storm.shrink_factor must be in (0, 1) (got {0})")]
    ShrinkFactorOutOfRange(f64),
    #[error("player.max_health must be at least 1")]
    ZeroMaxHealth,
    /// The player sprite does not fit on the canvas.
    #[error("player.size exceeds the canvas")]
    PlayerTooLarge,
    #[cfg(feature = "serde_json")]
    #[error("invalid config json: {0}")]
    Json(String),
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // `!(x > 0)` also rejects NaN.
    if !(value > 0.0) {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("canvas_width", self.canvas_width)?;
        positive("canvas_height", self.canvas_height)?;
        positive("tile_size", self.tile_size)?;
        positive("player.size", self.player.size)?;
        positive("player.speed", self.player.speed)?;
        positive("player.health_bar_width", self.player.health_bar_width)?;
        positive("player.health_bar_height", self.player.health_bar_height)?;
        if self.player.max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }
        if self.player.size > self.canvas_width || self.player.size > self.canvas_height {
            return Err(ConfigError::PlayerTooLarge);
        }

        let storm = &self.storm;
        for (field, timing) in [
            ("storm.shrink", &storm.shrink),
            ("storm.movement", &storm.movement),
            ("storm.closing", &storm.closing),
        ] {
            // Waits may be zero; travel divides progress so it may not.
            if timing.wait_ms < 0.0 || timing.wait_ms.is_nan() {
                return Err(ConfigError::Negative {
                    field,
                    value: timing.wait_ms,
                });
            }
            positive(field, timing.travel_ms)?;
        }
        positive("storm.min_zone_size", storm.min_zone_size)?;
        positive("storm.damage_interval_ms", storm.damage_interval_ms)?;
        if !(storm.shrink_factor > 0.0 && storm.shrink_factor < 1.0) {
            return Err(ConfigError::ShrinkFactorOutOfRange(storm.shrink_factor));
        }
        Ok(())
    }

    /// Parses a (possibly partial) JSON config; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
