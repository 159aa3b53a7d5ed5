//! Browser bootstrap: canvas + label lookup (or creation), keyboard listeners,
//! and the `requestAnimationFrame` loop driving `Game::update` and `render`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, Performance,
    window,
};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::game::Game;
use crate::metrics::{MetricsSample, bytes_to_mb};
use crate::render;

const CANVAS_ID: &str = "gameCanvas";
const LABEL_STYLE: &str = "position:fixed; left:12px; font-family:'Fira Code', monospace; font-size:14px; padding:3px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ddd; z-index:40;";

/// Text sinks next to the canvas. Each may be missing; updates then skip it.
struct Labels {
    storm_timer: Option<Element>,
    fps: Option<Element>,
    frame_time: Option<Element>,
    memory: Option<Element>,
}

impl Labels {
    fn attach(doc: &Document) -> Self {
        Self {
            storm_timer: ensure_label(doc, "stormTimer", 10.0),
            fps: ensure_label(doc, "fpsCounter", 44.0),
            frame_time: ensure_label(doc, "frameTime", 78.0),
            memory: ensure_label(doc, "memoryUsage", 112.0),
        }
    }
}

/// Runtime wrapper tying the headless game to its DOM surfaces.
struct WebGame {
    game: Game,
    ctx: CanvasRenderingContext2d,
    labels: Labels,
    performance: Option<Performance>,
    memory_warned: bool,
}

impl WebGame {
    fn frame(&mut self, now: f64) {
        let report = self.game.update(now);
        if let Err(e) = render::draw_frame(&self.ctx, &self.game) {
            log::error!("draw failed: {:?}", e);
        }

        let status = self.game.status(now);
        if let Some(el) = &self.labels.storm_timer {
            el.set_text_content(Some(&status.text()));
            set_color(el, status.color());
        }
        if let Some(sample) = report.metrics {
            self.publish_metrics(sample);
        }
    }

    fn publish_metrics(&mut self, sample: MetricsSample) {
        if let Some(el) = &self.labels.fps {
            el.set_text_content(Some(&sample.fps.to_string()));
        }
        if let Some(el) = &self.labels.frame_time {
            el.set_text_content(Some(&format!("{}", sample.frame_time_ms.round())));
        }
        let Some(el) = &self.labels.memory else {
            return;
        };
        match self.performance.as_ref().and_then(used_heap_bytes) {
            Some(bytes) => el.set_text_content(Some(&bytes_to_mb(bytes).to_string())),
            None if !self.memory_warned => {
                self.memory_warned = true;
                log::debug!("performance.memory unavailable; memory readout disabled");
            }
            None => {}
        }
    }
}

thread_local! {
    static GAME: std::cell::RefCell<Option<WebGame>> = const { std::cell::RefCell::new(None) };
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Starts the game with the built-in tuning.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    launch(GameConfig::default())
}

/// Starts the game from a JSON config; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    launch(config)
}

fn launch(config: GameConfig) -> Result<(), JsValue> {
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = match doc.get_element_by_id(CANVAS_ID) {
        Some(el) => el.dyn_into()?,
        None => {
            let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
            c.set_id(CANVAS_ID);
            c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); border:2px solid #222; background:#0f0f0f; z-index:20;")?;
            doc.body()
                .ok_or_else(|| JsValue::from_str("no body"))?
                .append_child(&c)?;
            c
        }
    };
    canvas.set_width(config.canvas_width as u32);
    canvas.set_height(config.canvas_height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let performance = win.performance();
    let now = performance.as_ref().map(|p| p.now()).unwrap_or(0.0);
    let seed = entropy_seed(now);
    log::info!(
        "storm survival starting: {}x{} canvas, seed {}",
        config.canvas_width,
        config.canvas_height,
        seed
    );
    let game = Game::new(config, &mut Pcg32::seed_from_u64(seed), now);

    let web = WebGame {
        game,
        ctx,
        labels: Labels::attach(&doc),
        performance,
        memory_warned: false,
    };
    // A second start replaces the running game; listeners and loop are shared.
    let already_running = GAME.with(|cell| cell.replace(Some(web)).is_some());
    if already_running {
        return Ok(());
    }

    install_key_listeners(&win)?;
    start_loop();
    Ok(())
}

fn install_key_listeners(win: &web_sys::Window) -> Result<(), JsValue> {
    let down = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        GAME.with(|cell| {
            if let Some(web) = cell.borrow_mut().as_mut() {
                web.game.key_down(&evt.key());
            }
        });
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("keydown", down.as_ref().unchecked_ref())?;
    down.forget();

    let up = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        GAME.with(|cell| {
            if let Some(web) = cell.borrow_mut().as_mut() {
                web.game.key_up(&evt.key());
            }
        });
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("keyup", up.as_ref().unchecked_ref())?;
    up.forget();

    // Keys released while the tab is unfocused never deliver keyup.
    let blur = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        GAME.with(|cell| {
            if let Some(web) = cell.borrow_mut().as_mut() {
                web.game.input.clear();
            }
        });
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
    blur.forget();
    Ok(())
}

fn start_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        GAME.with(|cell| {
            if let Some(web) = cell.borrow_mut().as_mut() {
                web.frame(ts);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(cb: &FrameCallback) {
    if let (Some(w), Some(closure)) = (window(), cb.borrow().as_ref()) {
        let _ = w.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}

/// Seeds the zone generator from browser entropy, falling back to the clock.
fn entropy_seed(now: f64) -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(e) => {
            log::warn!("getrandom failed ({e}); seeding from clock");
            now.to_bits()
        }
    }
}

/// `performance.memory.usedJSHeapSize` (Chromium only).
fn used_heap_bytes(perf: &Performance) -> Option<f64> {
    let memory = js_sys::Reflect::get(perf, &JsValue::from_str("memory")).ok()?;
    if memory.is_undefined() || memory.is_null() {
        return None;
    }
    js_sys::Reflect::get(&memory, &JsValue::from_str("usedJSHeapSize"))
        .ok()?
        .as_f64()
}

fn ensure_label(doc: &Document, id: &str, top_px: f64) -> Option<Element> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Some(el);
    }
    let body = doc.body()?;
    let div = doc.create_element("div").ok()?;
    div.set_id(id);
    div.set_attribute("style", &format!("{LABEL_STYLE} top:{top_px}px;"))
        .ok()?;
    body.append_child(&div).ok()?;
    Some(div)
}

fn set_color(el: &Element, color: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("color", color);
    }
}
