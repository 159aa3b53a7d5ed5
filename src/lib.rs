//! Storm Survival core crate.
//!
//! A player square roams a tiled canvas while a scripted storm boundary
//! shrinks, relocates and finally closes, damaging anyone caught outside.
//! Simulation (`storm`, `player`, `input`, `metrics`, `game`) is plain Rust
//! driven by explicit millisecond timestamps, so it runs headless under
//! `cargo test`. `render` and `web` are the browser adapter exposed through
//! `start_game()`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod game;
pub mod input;
pub mod metrics;
pub mod player;
pub mod render;
pub mod storm;
mod web;

pub use config::{ConfigError, Easing, GameConfig, PhaseTiming, PlayerConfig, StormConfig};
pub use game::{FrameReport, Game};
pub use input::{DebugAction, InputState, Key};
pub use metrics::{FrameMetrics, MetricsSample};
pub use player::PlayerState;
pub use storm::{Phase, StormSchedule, StormState, StormStatus, Zone, ZoneKind};
pub use web::start_game;
#[cfg(feature = "serde_json")]
pub use web::start_game_with_config;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init (e.g. hot reload) reports an error we can ignore.
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Info);
}
