//! Wavy Trip entry point
//!
//! Native: runs a seeded headless session flown by the autopilot and logs
//! the result. Usage: `wavy-trip [seed] [config.json]`.
//! Web: the library's `web` module is the entry point.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use wavy_trip::autopilot::{Autopilot, ProximityProbe};
    use wavy_trip::consts::*;
    use wavy_trip::sim::{FrameInput, GameEvent, GamePhase, Session};
    use wavy_trip::{ConfigError, GameConfig, HighScores, Ledger};

    /// Length of a demo run before the player "crashes"
    const DEMO_SECONDS: f32 = 60.0;

    fn load_config(path: Option<&str>) -> Result<GameConfig, ConfigError> {
        match path {
            Some(path) => {
                log::info!("Reading config from {}", path);
                GameConfig::from_json(&std::fs::read_to_string(path)?)
            }
            None => Ok(GameConfig::default()),
        }
    }

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }

    pub fn run() -> Result<(), ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let seed = args
            .first()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(|| now_ms() as u64);
        let config = load_config(args.get(1).map(String::as_str))?;

        let mut session = Session::new(config, Ledger::new(), seed)?;
        session.subscribe(Box::new(|new: GamePhase, old: GamePhase| {
            log::info!("Game state {:?} -> {:?}", old, new);
        }));

        let pilot = Autopilot::default();
        let mut probe = ProximityProbe::default();
        let mut best_combo = 0;
        let mut elapsed = 0.0;

        session.start();
        while session.phase() != GamePhase::GameOver {
            let input = if session.phase() == GamePhase::Playing {
                pilot.input(&session)
            } else {
                FrameInput::default()
            };
            session.update(SIM_DT, &input);
            probe.scan(&mut session);
            best_combo = best_combo.max(session.combo());

            for event in session.drain_events() {
                match event {
                    GameEvent::ScoreAwarded { points, combo, .. } if combo > 1 => {
                        log::debug!("Combo x{} (+{})", combo, points)
                    }
                    GameEvent::Sound(cue) => log::trace!("Sound {:?}", cue),
                    other => log::trace!("{:?}", other),
                }
            }

            elapsed += SIM_DT;
            if elapsed >= DEMO_SECONDS {
                session.player_died();
            }
        }

        let ledger = session.sink();
        let distance = session.player.pos.x;
        log::info!(
            "Run over: score {}, best combo {}, coins {}, distance {:.1}, segments {}",
            ledger.score,
            best_combo,
            ledger.coins,
            distance,
            session.strip.state().appended_count()
        );

        let mut scores = HighScores::load();
        match scores.add_score(ledger.score, ledger.coins, distance, now_ms()) {
            Some(rank) => log::info!("New high score, rank {}", rank),
            None => log::info!("No high score this time"),
        }
        scores.save();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Wavy Trip (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
