//! Player flight model
//!
//! The player always moves forward and is pulled down at the forward speed.
//! Holding the input builds up lift; releasing bleeds it off.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::PlayerTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Current lift, in [0, speed_limited]
    pub up_speed: f32,
    pub tuning: PlayerTuning,
    pub alive: bool,
}

impl Player {
    pub fn new(pos: Vec2, tuning: PlayerTuning) -> Self {
        Self {
            pos,
            up_speed: 0.0,
            tuning,
            alive: true,
        }
    }

    /// Advance one frame
    pub fn step(&mut self, dt: f32, holding: bool) {
        if !self.alive {
            return;
        }

        if holding {
            self.up_speed =
                (self.up_speed + self.tuning.speed_factor * dt).min(self.tuning.speed_limited);
        } else {
            self.up_speed = (self.up_speed - self.tuning.speed_factor * dt).max(0.0);
        }

        self.pos += self.velocity() * dt;
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.tuning.speed, self.up_speed - self.tuning.speed)
    }

    /// Rotation in degrees, negative while descending
    pub fn heading_degrees(&self) -> f32 {
        let vel = self.velocity();
        let angle = Vec2::X.angle_to(vel).abs().to_degrees();
        if vel.y < 0.0 { -angle } else { angle }
    }
}
