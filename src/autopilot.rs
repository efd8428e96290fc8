//! Demo AI and a stand-in collision source
//!
//! Lets the simulation run without a host engine: the autopilot decides when
//! to hold, the probe reports pickup regions the player passes through.

use crate::economy::RewardSink;
use crate::sim::{FrameInput, HitKind, PickupKind, Session};

/// Steers toward the next score ring ahead
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Height to hold when no ring is ahead
    pub cruise_height: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { cruise_height: 2.0 }
    }
}

impl Autopilot {
    pub fn input<R: RewardSink>(&self, session: &Session<R>) -> FrameInput {
        let player = &session.player;
        let target = session
            .strip
            .state()
            .pickups()
            .filter(|p| p.kind == PickupKind::ScoreRing && !p.collected && p.pos.x > player.pos.x)
            .min_by(|a, b| {
                a.pos
                    .x
                    .partial_cmp(&b.pos.x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.pos.y)
            .unwrap_or(self.cruise_height);

        FrameInput {
            holding: player.pos.y < target,
        }
    }
}

/// Radius-based region test between the player and nearby pickups
#[derive(Debug, Clone)]
pub struct ProximityProbe {
    /// Horizontal half-width of a pickup's trigger
    pub reach: f32,
    pub center_radius: f32,
    pub ring_radius: f32,
    pub coin_radius: f32,
    inside: Option<HitKind>,
}

impl Default for ProximityProbe {
    fn default() -> Self {
        Self {
            reach: 0.25,
            center_radius: 0.4,
            ring_radius: 1.0,
            coin_radius: 0.6,
            inside: None,
        }
    }
}

impl ProximityProbe {
    /// Report enters/exits for the current frame. Returns the number of enters.
    pub fn scan<R: RewardSink>(&mut self, session: &mut Session<R>) -> usize {
        let player = session.player.pos;
        let hits: Vec<(u32, HitKind)> = session
            .strip
            .state()
            .pickups()
            .filter(|p| !p.collected && (p.pos.x - player.x).abs() <= self.reach)
            .filter_map(|p| {
                let dy = (p.pos.y - player.y).abs();
                let hit = match p.kind {
                    PickupKind::Coin if dy <= self.coin_radius => HitKind::Coin,
                    PickupKind::ScoreRing if dy <= self.center_radius => HitKind::ScoreCenter,
                    PickupKind::ScoreRing if dy <= self.ring_radius => HitKind::ScoreRing,
                    _ => return None,
                };
                Some((p.id, hit))
            })
            .collect();

        if hits.is_empty() {
            if let Some(kind) = self.inside.take() {
                session.region_exit(kind);
            }
            return 0;
        }

        for &(id, hit) in &hits {
            session.region_enter(id, hit);
            self.inside = Some(hit);
        }
        hits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::economy::Ledger;
    use glam::Vec2;

    /// Rings on every other point, no coins
    fn session() -> Session {
        let mut config = GameConfig::default();
        config.strip.scoring_pickup_probability = 1.0;
        config.strip.coin_pickup_probability = 0.0;
        config.strip.initial_segment_count = 8;
        let mut session = Session::new(config, Ledger::new(), 3).unwrap();
        session.start();
        session
    }

    fn first_ring(session: &Session) -> Vec2 {
        session
            .strip
            .state()
            .pickups()
            .find(|p| p.kind == PickupKind::ScoreRing)
            .map(|p| p.pos)
            .expect("strip should carry a ring")
    }

    #[test]
    fn test_autopilot_climbs_toward_ring() {
        let session = session();
        assert!(first_ring(&session).y > 0.0);
        assert!(Autopilot::default().input(&session).holding);
    }

    #[test]
    fn test_autopilot_cruises_without_rings() {
        let mut session = session();
        session.player.pos = Vec2::new(1_000.0, 2.5);
        assert!(!Autopilot::default().input(&session).holding);
        session.player.pos = Vec2::new(1_000.0, 1.5);
        assert!(Autopilot::default().input(&session).holding);
    }

    #[test]
    fn test_probe_center_hit_then_exit() {
        let mut session = session();
        let ring = first_ring(&session);
        let mut probe = ProximityProbe::default();

        session.player.pos = ring + Vec2::new(0.0, 5.0);
        assert_eq!(probe.scan(&mut session), 0);

        session.player.pos = ring + Vec2::new(0.1, 0.1);
        assert_eq!(probe.scan(&mut session), 1);
        assert_eq!(session.combo(), 1);
        assert_eq!(session.sink().score, 1);

        // Collected: the next frame exits the region and nothing is re-awarded
        assert_eq!(probe.scan(&mut session), 0);
        assert_eq!(session.sink().score, 1);
    }

    #[test]
    fn test_probe_ring_edge_hit() {
        let mut session = session();
        let ring = first_ring(&session);
        let mut probe = ProximityProbe::default();

        session.player.pos = ring + Vec2::new(0.0, 0.8);
        assert_eq!(probe.scan(&mut session), 1);
        assert_eq!(session.combo(), 0);
        assert_eq!(session.sink().score, 1);
    }

    #[test]
    fn test_demo_run_scores() {
        let mut session = session();
        let pilot = Autopilot::default();
        let mut probe = ProximityProbe::default();
        for _ in 0..(20.0 / crate::consts::SIM_DT) as u32 {
            let input = pilot.input(&session);
            session.update(crate::consts::SIM_DT, &input);
            probe.scan(&mut session);
        }
        assert!(session.sink().score > 0);
        assert!(session.strip.state().oldest_index > 0);
    }
}
