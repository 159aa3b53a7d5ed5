//! Canvas2D drawing. Reads game state, never mutates it.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::game::Game;
use crate::player::PlayerState;
use crate::storm::StormState;

const TILE_DARK: &str = "#0f0f0f";
const TILE_LIGHT: &str = "#141414";
const STORM_FILL: &str = "rgba(168, 100, 253, 0.2)";
const STORM_BORDER: &str = "rgba(168, 100, 253, 0.8)";
const NEON: &str = "#00ffff";
const PLAYER_CORNER_RADIUS: f64 = 8.0;

/// Clears and redraws every layer for the current frame.
pub fn draw_frame(ctx: &CanvasRenderingContext2d, game: &Game) -> Result<(), JsValue> {
    let cfg = game.config();
    let (w, h) = (cfg.canvas_width, cfg.canvas_height);
    ctx.clear_rect(0.0, 0.0, w, h);
    draw_background(ctx, w, h, cfg.tile_size);
    draw_storm(ctx, &game.storm, w, h);
    draw_player(ctx, &game.player, &cfg.player.color);
    draw_health_bar(
        ctx,
        &game.player,
        cfg.player.health_bar_width,
        cfg.player.health_bar_height,
    )?;
    if game.player.is_eliminated() {
        draw_banner(ctx, w, h, "ELIMINATED");
    }
    Ok(())
}

pub fn draw_background(ctx: &CanvasRenderingContext2d, width: f64, height: f64, tile: f64) {
    let cols = (width / tile).ceil() as u32;
    let rows = (height / tile).ceil() as u32;
    for col in 0..cols {
        for row in 0..rows {
            let color = if (col + row) % 2 == 0 { TILE_DARK } else { TILE_LIGHT };
            ctx.set_fill_style_str(color);
            ctx.fill_rect(col as f64 * tile, row as f64 * tile, tile, tile);
        }
    }
}

/// Tints everything outside the safe square and outlines it.
pub fn draw_storm(ctx: &CanvasRenderingContext2d, storm: &StormState, width: f64, height: f64) {
    if storm.safe_area() <= 0.0 && !storm.is_closed() {
        // `StormState::update` owns the closure latch; this should never trip.
        log::warn!("safe area exhausted but storm not marked closed");
        debug_assert!(false, "storm closure latch out of sync");
    }

    let (left, top, size) = storm.bounds();
    ctx.set_fill_style_str(STORM_FILL);
    ctx.fill_rect(0.0, 0.0, width, top);
    ctx.fill_rect(0.0, top + size, width, height);
    ctx.fill_rect(0.0, top, left, size);
    ctx.fill_rect(left + size, top, width, size);

    ctx.set_stroke_style_str(STORM_BORDER);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(left, top, size, size);
}

pub fn draw_player(ctx: &CanvasRenderingContext2d, player: &PlayerState, color: &str) {
    let size = player.size();
    let x = player.x - size / 2.0;
    let y = player.y - size / 2.0;
    let r = PLAYER_CORNER_RADIUS.min(size / 2.0);

    ctx.set_fill_style_str(color);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + size - r, y);
    ctx.quadratic_curve_to(x + size, y, x + size, y + r);
    ctx.line_to(x + size, y + size - r);
    ctx.quadratic_curve_to(x + size, y + size, x + size - r, y + size);
    ctx.line_to(x + r, y + size);
    ctx.quadratic_curve_to(x, y + size, x, y + size - r);
    ctx.line_to(x, y + r);
    ctx.quadratic_curve_to(x, y, x + r, y);
    ctx.close_path();
    ctx.fill();
}

/// Neon health bar floating above the player, one minor tick per point and a
/// major tick every ten.
pub fn draw_health_bar(
    ctx: &CanvasRenderingContext2d,
    player: &PlayerState,
    bar_w: f64,
    bar_h: f64,
) -> Result<(), JsValue> {
    let x = player.x - bar_w / 2.0;
    let y = player.y - player.size() / 2.0 - 25.0;

    let glow = ctx.create_linear_gradient(x, y, x, y + bar_h);
    glow.add_color_stop(0.0, "rgba(0, 255, 255, 0.1)")?;
    glow.add_color_stop(0.5, "rgba(0, 255, 255, 0.05)")?;
    glow.add_color_stop(1.0, "rgba(0, 255, 255, 0.1)")?;
    ctx.set_fill_style_canvas_gradient(&glow);
    ctx.fill_rect(x - 4.0, y - 4.0, bar_w + 8.0, bar_h + 8.0);

    ctx.set_fill_style_str("#0a0a0a");
    ctx.fill_rect(x, y, bar_w, bar_h);

    let fill = ctx.create_linear_gradient(x, y, x, y + bar_h);
    fill.add_color_stop(0.0, NEON)?;
    fill.add_color_stop(1.0, "#007777")?;
    ctx.set_fill_style_canvas_gradient(&fill);
    ctx.fill_rect(x, y, bar_w * player.health_fraction(), bar_h);

    // Inner shadow along the top edge.
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.2)");
    ctx.fill_rect(x, y, bar_w, 1.0);

    ctx.set_stroke_style_str(NEON);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(x, y, bar_w, bar_h);

    let max = player.max_health();
    let spacing = bar_w / max.max(1) as f64;

    ctx.set_stroke_style_str("rgba(0, 255, 255, 0.1)");
    ctx.set_line_width(0.5);
    for i in (1..max).filter(|i| i % 10 != 0) {
        let tx = x + i as f64 * spacing;
        line(ctx, tx, y + 2.0, tx, y + bar_h - 2.0);
    }

    ctx.set_stroke_style_str(NEON);
    ctx.set_line_width(1.0);
    ctx.set_shadow_color(NEON);
    ctx.set_shadow_blur(4.0);
    for i in (0..=max).step_by(10) {
        let tx = x + i as f64 * spacing;
        line(ctx, tx, y - 2.0, tx, y + bar_h + 2.0);
    }
    ctx.set_shadow_blur(0.0);

    ctx.set_stroke_style_str("rgba(0, 255, 255, 0.3)");
    line(ctx, x + bar_w, y - 2.0, x + bar_w, y + bar_h + 2.0);
    Ok(())
}

fn draw_banner(ctx: &CanvasRenderingContext2d, width: f64, height: f64, text: &str) {
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.55)");
    ctx.fill_rect(0.0, height / 2.0 - 40.0, width, 80.0);
    ctx.set_font("bold 42px 'Fira Code', monospace");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str("#ff4444");
    // fill_text only fails on detached contexts; nothing useful to do then.
    let _ = ctx.fill_text(text, width / 2.0, height / 2.0);
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}
