//! Endless strip maintenance
//!
//! Segments are appended ahead of the reference point and retired once they
//! fall far enough behind it. Pickups live on segments and die with them.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{EventQueue, GameEvent, SoundCue};
use super::segment::{Color, HitKind, Pickup, PickupKind, Segment, SegmentTemplate};
use crate::config::StripConfig;
use crate::consts::*;
use crate::economy::{Ledger, RewardSink};
use crate::error::ConfigError;

/// Everything the strip needs to continue (serializable snapshot)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StripState {
    /// Live segments, oldest first, positions strictly increasing
    pub segments: VecDeque<Segment>,
    /// Where the next segment starts
    pub next_append_position: f32,
    /// Sequence index of the oldest live segment
    pub oldest_index: u64,
    /// Palette index used for appended segments
    pub color_index: usize,
    pub combo: u32,
    next_segment_index: u64,
    next_pickup_id: u32,
}

impl StripState {
    pub fn live_count(&self) -> usize {
        self.segments.len()
    }

    pub fn pickups(&self) -> impl Iterator<Item = &Pickup> {
        self.segments.iter().flat_map(|s| s.pickups.iter())
    }

    /// Number of segments appended since initialization
    pub fn appended_count(&self) -> u64 {
        self.next_segment_index
    }
}

/// Enter flags for the two regions of a score ring
#[derive(Debug, Clone, Copy, Default)]
struct RegionFlags {
    ring: bool,
    center: bool,
}

/// Owner of the strip and the combo counter
pub struct StripManager<R: RewardSink = Ledger> {
    config: StripConfig,
    state: StripState,
    rng: Pcg32,
    sink: R,
    events: EventQueue,
    regions: RegionFlags,
    initialized: bool,
}

impl<R: RewardSink> StripManager<R> {
    /// Create an empty manager; nothing is placed until `initialize`
    pub fn new(sink: R, seed: u64) -> Self {
        Self {
            config: StripConfig::default(),
            state: StripState::default(),
            rng: Pcg32::seed_from_u64(seed),
            sink,
            events: EventQueue::default(),
            regions: RegionFlags::default(),
            initialized: false,
        }
    }

    /// Restart the random stream (new run seed)
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Build a fresh strip starting at `origin` with `initial_segment_count` segments.
    ///
    /// On error the previous strip is left untouched.
    pub fn initialize(&mut self, config: StripConfig, origin: f32) -> Result<(), ConfigError> {
        config.validate()?;
        check_origin(&config, origin, None)?;
        self.reset(config, origin);
        for _ in 0..self.config.initial_segment_count {
            self.append_segment();
        }
        Ok(())
    }

    /// Like `initialize`, but the strip begins with a caller-supplied segment
    /// at `origin` that carries no pickups.
    pub fn initialize_with_first(
        &mut self,
        config: StripConfig,
        first: SegmentTemplate,
        origin: f32,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        if !first.has_valid_extent() {
            return Err(ConfigError::InvalidExtent {
                template: first.name,
                extent: first.extent,
            });
        }
        if config.initial_segment_count >= config.max_live_segments {
            return Err(ConfigError::InvalidSegmentCounts {
                initial: config.initial_segment_count + 1,
                max: config.max_live_segments,
            });
        }
        check_origin(&config, origin, Some(&first))?;
        self.reset(config, origin);
        self.place(None, &first, Vec::new());
        for _ in 0..self.config.initial_segment_count {
            self.append_segment();
        }
        Ok(())
    }

    fn reset(&mut self, config: StripConfig, origin: f32) {
        let color_index = self.rng.random_range(0..config.color_palette.len());
        self.config = config;
        self.state = StripState {
            next_append_position: origin,
            color_index,
            ..Default::default()
        };
        self.regions = RegionFlags::default();
        self.initialized = true;
        self.sink.reset_session();
        log::info!(
            "Strip initialized at {} (color {}, {} templates)",
            origin,
            color_index,
            self.config.segment_templates.len()
        );
    }

    /// Periodic maintenance: grow ahead, cull behind, detect missed pickups
    pub fn tick(&mut self, reference_position: f32) {
        if !self.initialized {
            return;
        }

        if self.state.segments.len() < self.config.max_live_segments {
            self.append_segment();
        }

        let lagging = self
            .state
            .segments
            .front()
            .is_some_and(|s| s.position < reference_position - RETIRE_LAG);
        if lagging {
            self.retire_segment();
        }

        if self.has_missed_pickup(reference_position) {
            self.reset_combo();
        }
    }

    /// Append one random segment at the end of the strip.
    ///
    /// Returns the new segment's sequence index.
    pub fn append_segment(&mut self) -> Option<u64> {
        if !self.initialized {
            log::warn!("append_segment before initialize ignored");
            return None;
        }

        let kind = self.rng.random_range(0..self.config.segment_templates.len());
        let template = &self.config.segment_templates[kind];
        let position = self.state.next_append_position;
        if !advances(position, template.extent) {
            log::warn!("Strip can't grow past {}, append ignored", position);
            return None;
        }

        let mut pickups = Vec::new();
        for point in &template.attachment_points {
            if !point.fits(template.extent) {
                log::warn!(
                    "Skipping attachment point {:?} outside template '{}'",
                    point,
                    template.name
                );
                continue;
            }
            if let Some(kind) = sample_pickup(&mut self.rng, &self.config) {
                let id = self.state.next_pickup_id;
                self.state.next_pickup_id += 1;
                pickups.push(Pickup {
                    id,
                    kind,
                    pos: Vec2::new(position + point.offset, point.height),
                    collected: false,
                });
            }
        }

        let template = template.clone();
        Some(self.place(Some(kind), &template, pickups))
    }

    fn place(&mut self, kind: Option<usize>, template: &SegmentTemplate, pickups: Vec<Pickup>) -> u64 {
        let index = self.state.next_segment_index;
        self.state.next_segment_index += 1;

        let segment = Segment {
            index,
            kind,
            position: self.state.next_append_position,
            extent: template.extent,
            color_index: self.state.color_index,
            attachment_points: template.attachment_points.clone(),
            pickups,
        };
        self.state.next_append_position = segment.end();

        log::debug!(
            "Appended segment {} '{}' at {} ({} pickups)",
            index,
            template.name,
            segment.position,
            segment.pickups.len()
        );
        self.events.push(GameEvent::SegmentAppended {
            index,
            position: segment.position,
        });
        self.state.segments.push_back(segment);
        index
    }

    /// Remove the oldest live segment with its pickups. No-op when empty.
    pub fn retire_segment(&mut self) -> Option<u64> {
        let segment = self.state.segments.pop_front()?;
        self.state.oldest_index = self
            .state
            .segments
            .front()
            .map_or(self.state.next_segment_index, |s| s.index);

        log::debug!("Retired segment {} at {}", segment.index, segment.position);
        self.events.push(GameEvent::SegmentRetired {
            index: segment.index,
        });
        Some(segment.index)
    }

    /// Whether an uncollected score ring has scrolled past the reference
    pub fn has_missed_pickup(&self, reference_position: f32) -> bool {
        self.state.pickups().any(|p| {
            p.kind == PickupKind::ScoreRing
                && !p.collected
                && p.pos.x < reference_position - MISS_MARGIN
        })
    }

    /// Credit a pickup reported by the collision source
    pub fn on_pickup_collected(&mut self, pickup_id: u32, hit: HitKind) {
        match hit {
            HitKind::Coin => {
                if !self.claim(pickup_id) {
                    return;
                }
                self.sink.add_coins(1);
                self.events.push(GameEvent::CoinCollected { pickup_id });
                self.events.sound(SoundCue::Coin);
            }
            HitKind::ScoreRing => {
                if self.regions.center {
                    log::debug!("Ring hit on {} ignored, center already hit", pickup_id);
                    return;
                }
                if !self.claim(pickup_id) {
                    return;
                }
                self.regions.ring = true;
                self.reset_combo();
                self.sink.add_score(1);
                self.events.push(GameEvent::ScoreAwarded {
                    pickup_id,
                    points: 1,
                    combo: 0,
                });
                self.events.sound(SoundCue::Score);
            }
            HitKind::ScoreCenter => {
                if self.regions.ring {
                    log::debug!("Center hit on {} ignored, ring already hit", pickup_id);
                    return;
                }
                if !self.claim(pickup_id) {
                    return;
                }
                self.regions.center = true;
                self.state.combo = self.state.combo.saturating_add(1);
                let points = self.state.combo;
                self.sink.add_score(points);
                self.events.push(GameEvent::ScoreAwarded {
                    pickup_id,
                    points,
                    combo: self.state.combo,
                });
                self.events.sound(SoundCue::BigScore);
            }
        }
    }

    /// Alias for `on_pickup_collected`, paired with `region_exit`
    pub fn region_enter(&mut self, pickup_id: u32, hit: HitKind) {
        self.on_pickup_collected(pickup_id, hit);
    }

    /// Leaving either region of a score ring re-arms both
    pub fn region_exit(&mut self, hit: HitKind) {
        if hit.is_score() {
            self.regions = RegionFlags::default();
        }
    }

    pub fn on_player_died(&mut self) {
        self.reset_combo();
    }

    /// Mark a known pickup collected. Unknown ids (already retired, or owned
    /// by the host) are accepted; a second claim of the same pickup is not.
    fn claim(&mut self, pickup_id: u32) -> bool {
        for segment in self.state.segments.iter_mut() {
            if let Some(pickup) = segment.pickup_mut(pickup_id) {
                if pickup.collected {
                    log::debug!("Pickup {} already collected", pickup_id);
                    return false;
                }
                pickup.collected = true;
                return true;
            }
        }
        true
    }

    fn reset_combo(&mut self) {
        if self.state.combo != 0 {
            log::debug!("Combo {} reset", self.state.combo);
            self.state.combo = 0;
            self.events.push(GameEvent::ComboReset);
        }
    }

    /// Reassign the color used for segments appended from now on
    pub fn set_color_index(&mut self, index: usize) -> bool {
        if index < self.config.color_palette.len() {
            self.state.color_index = index;
            true
        } else {
            false
        }
    }

    pub fn current_color(&self) -> Option<Color> {
        self.config.color_palette.get(self.state.color_index).copied()
    }

    pub fn state(&self) -> &StripState {
        &self.state
    }

    pub fn config(&self) -> &StripConfig {
        &self.config
    }

    pub fn combo(&self) -> u32 {
        self.state.combo
    }

    pub fn live_count(&self) -> usize {
        self.state.segments.len()
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Pending events, oldest first. Undrained events beyond
    /// `MAX_PENDING_EVENTS` are dropped oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}

/// Whether a segment placed at `position` ends strictly after it
fn advances(position: f32, extent: f32) -> bool {
    let end = position + extent;
    end.is_finite() && end > position
}

/// Every segment that can start at `origin` must end after it
fn check_origin(
    config: &StripConfig,
    origin: f32,
    first: Option<&SegmentTemplate>,
) -> Result<(), ConfigError> {
    let shortest = config
        .segment_templates
        .iter()
        .chain(first)
        .map(|t| t.extent)
        .fold(f32::INFINITY, f32::min);
    if origin.is_finite() && advances(origin, shortest) {
        Ok(())
    } else {
        Err(ConfigError::InvalidOrigin { origin })
    }
}

/// 50/50 between the score and coin categories, then that category's chance
fn sample_pickup(rng: &mut Pcg32, config: &StripConfig) -> Option<PickupKind> {
    if rng.random_bool(0.5) {
        rng.random_bool(config.scoring_pickup_probability)
            .then_some(PickupKind::ScoreRing)
    } else {
        rng.random_bool(config.coin_pickup_probability)
            .then_some(PickupKind::Coin)
    }
}
