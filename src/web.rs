//! Browser bindings
//!
//! The JS host renders, plays audio and detects collisions; it drives a
//! `WasmGame` every animation frame and reads JSON snapshots back.

use wasm_bindgen::prelude::*;

use crate::consts::*;
use crate::highscores::HighScores;
use crate::sim::{FrameInput, GamePhase, HitKind, Session};
use crate::{GameConfig, Ledger};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Wavy Trip starting...");
}

fn hit_kind(code: u8) -> Option<HitKind> {
    match code {
        0 => Some(HitKind::Coin),
        1 => Some(HitKind::ScoreRing),
        2 => Some(HitKind::ScoreCenter),
        _ => None,
    }
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmGame {
    session: Session<Ledger>,
    accumulator: f32,
    input: FrameInput,
    high_scores: HighScores,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config_json` may be empty for the default config
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, config_json: &str) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json(config_json).map_err(to_js_error)?
        };
        let session = Session::new(config, Ledger::new(), seed).map_err(to_js_error)?;
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            session,
            accumulator: 0.0,
            input: FrameInput::default(),
            high_scores: HighScores::load(),
        })
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.session.resume();
    }

    pub fn set_holding(&mut self, holding: bool) {
        self.input.holding = holding;
    }

    /// Advance by wall-clock `dt` seconds in fixed steps
    pub fn update(&mut self, dt: f32) {
        let was_over = self.session.phase() == GamePhase::GameOver;
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.session.update(SIM_DT, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if !was_over && self.session.phase() == GamePhase::GameOver {
            let ledger = self.session.sink();
            let rank = self.high_scores.add_score(
                ledger.score,
                ledger.coins,
                self.session.player.pos.x,
                js_sys::Date::now(),
            );
            if let Some(rank) = rank {
                log::info!("High score rank {}", rank);
                self.high_scores.save();
            }
        }
    }

    /// 0 = coin, 1 = ring, 2 = ring center
    pub fn region_enter(&mut self, pickup_id: u32, kind: u8) {
        match hit_kind(kind) {
            Some(hit) => self.session.region_enter(pickup_id, hit),
            None => log::warn!("Unknown hit kind {}", kind),
        }
    }

    pub fn region_exit(&mut self, kind: u8) {
        if let Some(hit) = hit_kind(kind) {
            self.session.region_exit(hit);
        }
    }

    pub fn player_died(&mut self) {
        self.session.player_died();
    }

    pub fn restart(&mut self, seed: u64) -> Result<(), JsValue> {
        self.accumulator = 0.0;
        self.input = FrameInput::default();
        self.session.restart(seed).map_err(to_js_error)
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.phase())
    }

    pub fn score(&self) -> u64 {
        self.session.sink().score
    }

    pub fn best_score(&self) -> u64 {
        self.session.sink().high_score
    }

    pub fn coins(&self) -> u64 {
        self.session.sink().coins
    }

    pub fn combo(&self) -> u32 {
        self.session.combo()
    }

    pub fn player_x(&self) -> f32 {
        self.session.player.pos.x
    }

    pub fn player_y(&self) -> f32 {
        self.session.player.pos.y
    }

    pub fn player_heading(&self) -> f32 {
        self.session.player.heading_degrees()
    }

    pub fn camera_x(&self) -> f32 {
        self.session.camera.pos.x
    }

    pub fn camera_y(&self) -> f32 {
        self.session.camera.pos.y
    }

    /// Live segments, pickups and combo as JSON
    pub fn strip_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.strip.state()).map_err(to_js_error)
    }

    /// Pending events as a JSON array (drains them)
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.drain_events()).map_err(to_js_error)
    }

    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.high_scores).map_err(to_js_error)
    }
}
