//! Reward sinks
//!
//! The simulation only ever writes credits; it never reads balances back.

use serde::{Deserialize, Serialize};

/// Write-only destination for score points and coins
pub trait RewardSink {
    fn add_score(&mut self, points: u32);
    fn add_coins(&mut self, coins: u32);
    /// Called when a new session starts
    fn reset_session(&mut self) {}
}

/// Score/coin bookkeeping for a player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Score of the current session
    pub score: u64,
    /// Best score seen across sessions
    pub high_score: u64,
    /// Coin balance; survives session resets
    pub coins: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RewardSink for Ledger {
    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points as u64);
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    fn add_coins(&mut self, coins: u32) {
        self.coins = self.coins.saturating_add(coins as u64);
    }

    fn reset_session(&mut self) {
        self.score = 0;
    }
}

impl<S: RewardSink + ?Sized> RewardSink for &mut S {
    fn add_score(&mut self, points: u32) {
        (**self).add_score(points);
    }

    fn add_coins(&mut self, coins: u32) {
        (**self).add_coins(coins);
    }

    fn reset_session(&mut self) {
        (**self).reset_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_tracks_best() {
        let mut ledger = Ledger::new();
        ledger.add_score(5);
        ledger.add_score(3);
        assert_eq!(ledger.score, 8);
        assert_eq!(ledger.high_score, 8);

        ledger.reset_session();
        ledger.add_score(2);
        assert_eq!(ledger.score, 2);
        assert_eq!(ledger.high_score, 8);
    }

    #[test]
    fn test_coins_survive_reset() {
        let mut ledger = Ledger::new();
        ledger.add_coins(1);
        ledger.add_coins(1);
        ledger.reset_session();
        assert_eq!(ledger.coins, 2);
    }

    #[test]
    fn test_borrowed_sink() {
        fn credit<S: RewardSink>(mut sink: S) {
            sink.add_score(4);
            sink.add_coins(2);
        }

        let mut ledger = Ledger::new();
        credit(&mut ledger);
        assert_eq!(ledger.score, 4);
        assert_eq!(ledger.coins, 2);
    }
}
