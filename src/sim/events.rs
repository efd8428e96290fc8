//! Events emitted by the simulation for the host (audio, effects, UI)

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::session::GamePhase;

/// Sound the host should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Coin,
    Score,
    BigScore,
    GameOver,
    MusicStart,
    MusicStop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SegmentAppended { index: u64, position: f32 },
    SegmentRetired { index: u64 },
    /// Points credited; `combo` is the value after the hit
    ScoreAwarded { pickup_id: u32, points: u32, combo: u32 },
    CoinCollected { pickup_id: u32 },
    ComboReset,
    PhaseChanged { new: GamePhase, old: GamePhase },
    CameraShake,
    Sound(SoundCue),
}

/// Events kept for a host that stops draining; older ones are dropped first
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Ordered queue of pending events.
///
/// The host is expected to drain it once per frame.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
        if self.events.len() > MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.push(GameEvent::Sound(cue));
    }

    /// Take all pending events, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::default();
        queue.sound(SoundCue::Coin);
        queue.push(GameEvent::ComboReset);
        assert_eq!(queue.len(), 2);

        let events = queue.drain();
        assert_eq!(events[0], GameEvent::Sound(SoundCue::Coin));
        assert_eq!(events[1], GameEvent::ComboReset);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_undrained_queue_drops_oldest() {
        let mut queue = EventQueue::default();
        for index in 0..(MAX_PENDING_EVENTS as u64 + 10) {
            queue.push(GameEvent::SegmentRetired { index });
        }
        assert_eq!(queue.len(), MAX_PENDING_EVENTS);

        let events = queue.drain();
        assert_eq!(events.first(), Some(&GameEvent::SegmentRetired { index: 10 }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::SegmentRetired {
                index: MAX_PENDING_EVENTS as u64 + 9
            })
        );
    }
}
