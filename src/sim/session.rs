//! Session lifecycle
//!
//! Owns the strip, player and camera, and drives them from the host's frame
//! loop. Strip maintenance runs on its own slower cadence, fed from the
//! accumulated frame time.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::events::{GameEvent, SoundCue};
use super::player::Player;
use super::segment::HitKind;
use super::strip::StripManager;
use crate::config::GameConfig;
use crate::consts::*;
use crate::economy::{Ledger, RewardSink};
use crate::error::ConfigError;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Strip built, waiting for the player to start
    Prepare,
    Playing,
    Paused,
    /// Player hit something; the death sequence is playing
    PreGameOver,
    GameOver,
}

/// Per-frame input (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Touch/mouse held down
    pub holding: bool,
}

/// Phase-change observer, called with `(new, old)`
pub type PhaseObserver = Box<dyn FnMut(GamePhase, GamePhase)>;

/// Camera offset from the player at session start
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -10.0);

pub struct Session<R: RewardSink = Ledger> {
    config: GameConfig,
    phase: GamePhase,
    pub strip: StripManager<R>,
    pub player: Player,
    pub camera: Camera,
    observers: Vec<PhaseObserver>,
    maintenance_accumulator: f32,
    death_timer: f32,
    game_count: u32,
    seed: u64,
}

impl<R: RewardSink> Session<R> {
    /// Build a session in the Prepare phase with its strip populated
    pub fn new(config: GameConfig, sink: R, seed: u64) -> Result<Self, ConfigError> {
        let mut strip = StripManager::new(sink, seed);
        strip.initialize(config.strip.clone(), 0.0)?;

        let player = Player::new(Vec2::ZERO, config.player);
        let camera = Camera::new(CAMERA_OFFSET, config.shake, seed.wrapping_add(1));

        let mut session = Self {
            config,
            phase: GamePhase::Prepare,
            strip,
            player,
            camera,
            observers: Vec::new(),
            maintenance_accumulator: 0.0,
            death_timer: 0.0,
            game_count: 0,
            seed,
        };
        session.strip.events_mut().sound(SoundCue::MusicStart);
        log::info!("Session ready with seed {}", seed);
        Ok(session)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Games started since this session object was created
    pub fn game_count(&self) -> u32 {
        self.game_count
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn subscribe(&mut self, observer: PhaseObserver) {
        self.observers.push(observer);
    }

    /// Change phase, notifying observers only on an actual change
    fn set_phase(&mut self, phase: GamePhase) {
        if phase == self.phase {
            return;
        }
        let old = self.phase;
        self.phase = phase;
        log::info!("Phase {:?} -> {:?}", old, phase);
        self.strip
            .events_mut()
            .push(GameEvent::PhaseChanged { new: phase, old });
        for observer in self.observers.iter_mut() {
            observer(phase, old);
        }
    }

    pub fn start(&mut self) {
        if self.phase == GamePhase::Prepare {
            self.game_count += 1;
            self.set_phase(GamePhase::Playing);
        }
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.set_phase(GamePhase::Playing);
        }
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32, input: &FrameInput) {
        match self.phase {
            GamePhase::Playing => {
                self.player.step(dt, input.holding);
                self.camera.follow(self.player.tuning.speed, dt);

                self.maintenance_accumulator += dt;
                while self.maintenance_accumulator >= MAINTENANCE_PERIOD {
                    self.maintenance_accumulator -= MAINTENANCE_PERIOD;
                    self.strip.tick(self.player.pos.x);
                }
            }
            GamePhase::PreGameOver => {
                self.death_timer -= dt;
                if self.death_timer <= 0.0 {
                    self.camera.shake();
                    self.strip.events_mut().push(GameEvent::CameraShake);
                    self.strip.events_mut().sound(SoundCue::GameOver);
                    self.set_phase(GamePhase::GameOver);
                }
            }
            GamePhase::Prepare | GamePhase::Paused | GamePhase::GameOver => {}
        }

        self.camera.update(dt);
    }

    /// The player hit an obstacle
    pub fn player_died(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.player.alive = false;
        self.strip.on_player_died();
        self.strip.events_mut().sound(SoundCue::MusicStop);
        self.death_timer = DEATH_DELAY;
        self.set_phase(GamePhase::PreGameOver);
    }

    /// Forwarded from the collision source; ignored unless Playing
    pub fn region_enter(&mut self, pickup_id: u32, hit: HitKind) {
        if self.phase == GamePhase::Playing {
            self.strip.region_enter(pickup_id, hit);
        }
    }

    pub fn region_exit(&mut self, hit: HitKind) {
        self.strip.region_exit(hit);
    }

    /// Throw away the current run and rebuild everything with a new seed
    pub fn restart(&mut self, seed: u64) -> Result<(), ConfigError> {
        self.strip.reseed(seed);
        self.strip.initialize(self.config.strip.clone(), 0.0)?;
        self.strip.events_mut().clear();
        self.strip.events_mut().sound(SoundCue::MusicStart);

        self.player = Player::new(Vec2::ZERO, self.config.player);
        self.camera = Camera::new(CAMERA_OFFSET, self.config.shake, seed.wrapping_add(1));
        self.maintenance_accumulator = 0.0;
        self.death_timer = 0.0;
        self.seed = seed;
        self.set_phase(GamePhase::Prepare);
        log::info!("Session restarted with seed {}", seed);
        Ok(())
    }

    pub fn combo(&self) -> u32 {
        self.strip.combo()
    }

    pub fn sink(&self) -> &R {
        self.strip.sink()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.strip.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> Session {
        Session::new(GameConfig::default(), Ledger::new(), 2024).unwrap()
    }

    fn run(session: &mut Session, seconds: f32) {
        let frames = (seconds / SIM_DT).round() as u32;
        for _ in 0..frames {
            session.update(SIM_DT, &FrameInput::default());
        }
    }

    #[test]
    fn test_new_session_is_prepared() {
        let s = session();
        assert_eq!(s.phase(), GamePhase::Prepare);
        assert_eq!(
            s.strip.live_count(),
            GameConfig::default().strip.initial_segment_count
        );
    }

    #[test]
    fn test_invalid_config_fails() {
        let mut config = GameConfig::default();
        config.strip.segment_templates.clear();
        assert!(Session::new(config, Ledger::new(), 1).is_err());
    }

    #[test]
    fn test_nothing_moves_before_start() {
        let mut s = session();
        run(&mut s, 2.0);
        assert_eq!(s.player.pos, Vec2::ZERO);
        assert_eq!(s.strip.state().appended_count(), 4);
    }

    #[test]
    fn test_maintenance_cadence() {
        let mut s = session();
        s.start();
        // 4 initial, one per 0.5s up to the cap of 8
        run(&mut s, 1.02);
        assert_eq!(s.strip.state().appended_count(), 6);
        run(&mut s, 5.0);
        // At the cap, culling and growth alternate
        assert!((7..=8).contains(&s.strip.live_count()));
        assert!(s.strip.state().appended_count() > 8);
    }

    #[test]
    fn test_strip_keeps_up_with_player() {
        let mut s = session();
        s.start();
        run(&mut s, 30.0);
        let state = s.strip.state();
        assert!(state.oldest_index > 0);
        assert!(state.next_append_position > s.player.pos.x);
        assert!(state.live_count() <= s.config().strip.max_live_segments);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut s = session();
        s.start();
        run(&mut s, 0.5);
        s.pause();
        let pos = s.player.pos;
        let appended = s.strip.state().appended_count();
        run(&mut s, 3.0);
        assert_eq!(s.player.pos, pos);
        assert_eq!(s.strip.state().appended_count(), appended);
        s.resume();
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_death_sequence() {
        let mut s = session();
        s.start();
        s.region_enter(10_000, HitKind::ScoreCenter);
        assert_eq!(s.combo(), 1);

        s.player_died();
        assert_eq!(s.phase(), GamePhase::PreGameOver);
        assert_eq!(s.combo(), 0);

        run(&mut s, 0.2);
        assert_eq!(s.phase(), GamePhase::GameOver);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::CameraShake));
        assert!(events.contains(&GameEvent::Sound(SoundCue::GameOver)));
        assert!(events.contains(&GameEvent::Sound(SoundCue::MusicStop)));

        // No more strip growth after game over
        let appended = s.strip.state().appended_count();
        run(&mut s, 3.0);
        assert_eq!(s.strip.state().appended_count(), appended);
    }

    #[test]
    fn test_hits_ignored_outside_playing() {
        let mut s = session();
        s.region_enter(10_000, HitKind::ScoreCenter);
        assert_eq!(s.sink().score, 0);
    }

    #[test]
    fn test_observers_see_each_change_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut s = session();
        let log = Rc::clone(&seen);
        s.subscribe(Box::new(move |new: GamePhase, old: GamePhase| {
            log.borrow_mut().push((new, old))
        }));

        s.start();
        s.start();
        s.player_died();
        run(&mut s, 0.2);

        assert_eq!(
            *seen.borrow(),
            vec![
                (GamePhase::Playing, GamePhase::Prepare),
                (GamePhase::PreGameOver, GamePhase::Playing),
                (GamePhase::GameOver, GamePhase::PreGameOver),
            ]
        );
    }

    #[test]
    fn test_restart_resets_run() {
        let mut s = session();
        s.start();
        s.region_enter(10_000, HitKind::ScoreCenter);
        run(&mut s, 10.0);
        s.player_died();
        run(&mut s, 0.2);

        s.restart(77).unwrap();
        assert_eq!(s.phase(), GamePhase::Prepare);
        assert_eq!(s.sink().score, 0);
        assert_eq!(s.combo(), 0);
        assert_eq!(s.player.pos, Vec2::ZERO);
        assert!(s.player.alive);
        assert_eq!(s.strip.state().oldest_index, 0);
        assert_eq!(s.seed(), 77);

        s.start();
        assert_eq!(s.game_count(), 2);
    }
}
