//! Follow camera with a short death shake

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::ShakeTuning;

pub struct Camera {
    pub pos: Vec3,
    /// Rest position the shake jitters around
    pub origin: Vec3,
    pub tuning: ShakeTuning,
    shake_remaining: f32,
    rng: Pcg32,
}

impl Camera {
    pub fn new(pos: Vec3, tuning: ShakeTuning, seed: u64) -> Self {
        Self {
            pos,
            origin: pos,
            tuning,
            shake_remaining: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Scroll along with the player
    pub fn follow(&mut self, speed: f32, dt: f32) {
        self.pos.x += speed * dt;
    }

    /// Start shaking around the current position
    pub fn shake(&mut self) {
        self.origin = self.pos;
        self.shake_remaining = self.tuning.duration;
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_remaining > 0.0
    }

    /// Advance the shake by one frame; snaps back to the origin when done
    pub fn update(&mut self, dt: f32) {
        if !self.is_shaking() {
            return;
        }
        self.pos = self.origin + random_in_unit_sphere(&mut self.rng) * self.tuning.amount;
        self.shake_remaining -= dt * self.tuning.decrease_factor;
        if self.shake_remaining <= 0.0 {
            self.shake_remaining = 0.0;
            self.pos = self.origin;
        }
    }
}

fn random_in_unit_sphere(rng: &mut Pcg32) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow() {
        let mut cam = Camera::new(Vec3::new(0.0, 2.0, -10.0), ShakeTuning::default(), 1);
        cam.follow(10.0, 0.5);
        assert_eq!(cam.pos, Vec3::new(5.0, 2.0, -10.0));
    }

    #[test]
    fn test_shake_stays_within_amount_and_returns() {
        let tuning = ShakeTuning::default();
        let start = Vec3::new(3.0, 1.0, -10.0);
        let mut cam = Camera::new(start, tuning, 99);
        cam.shake();
        assert!(cam.is_shaking());

        let mut frames = 0;
        while cam.is_shaking() {
            cam.update(1.0 / 60.0);
            assert!(cam.pos.distance(start) <= tuning.amount + 1e-5);
            frames += 1;
            assert!(frames < 1_000);
        }
        // 0.1 / (dt * 0.3) frames
        assert!((19..=21).contains(&frames));
        assert_eq!(cam.pos, start);
    }

    #[test]
    fn test_update_without_shake_is_noop() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let mut cam = Camera::new(start, ShakeTuning::default(), 5);
        cam.update(0.016);
        assert_eq!(cam.pos, start);
    }
}
