//! Game configuration
//!
//! Strip layout and tuning values, loadable from JSON. Anything missing from
//! the JSON falls back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::segment::{Color, SegmentTemplate};

/// Strip generation options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// How many segments are created when the game starts
    pub initial_segment_count: usize,
    /// Max live segments while the game runs
    pub max_live_segments: usize,
    /// Chance to spawn a score ring on a point (after the category flip)
    pub scoring_pickup_probability: f64,
    /// Chance to spawn a coin on a point (after the category flip)
    pub coin_pickup_probability: f64,
    pub color_palette: Vec<Color>,
    pub segment_templates: Vec<SegmentTemplate>,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            initial_segment_count: 4,
            max_live_segments: 8,
            scoring_pickup_probability: 0.6,
            coin_pickup_probability: 0.3,
            color_palette: vec![
                Color::rgb(0x4f, 0xc3, 0xf7),
                Color::rgb(0xf0, 0x62, 0x92),
                Color::rgb(0xff, 0xb7, 0x4d),
                Color::rgb(0x81, 0xc7, 0x84),
                Color::rgb(0xba, 0x68, 0xc8),
            ],
            segment_templates: vec![
                SegmentTemplate::new("flat", 10.0)
                    .with_point(3.0, 2.0)
                    .with_point(7.0, 2.0),
                SegmentTemplate::new("wave", 10.0)
                    .with_point(2.0, 3.0)
                    .with_point(5.0, 5.0)
                    .with_point(8.0, 3.0),
                SegmentTemplate::new("tunnel", 10.0).with_point(5.0, 1.5),
            ],
        }
    }
}

impl StripConfig {
    /// Reject configurations the strip cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_templates.is_empty() {
            return Err(ConfigError::NoTemplates);
        }
        if self.color_palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        check_probability("scoring_pickup_probability", self.scoring_pickup_probability)?;
        check_probability("coin_pickup_probability", self.coin_pickup_probability)?;
        if let Some(t) = self.segment_templates.iter().find(|t| !t.has_valid_extent()) {
            return Err(ConfigError::InvalidExtent {
                template: t.name.clone(),
                extent: t.extent,
            });
        }
        if self.initial_segment_count > self.max_live_segments {
            return Err(ConfigError::InvalidSegmentCounts {
                initial: self.initial_segment_count,
                max: self.max_live_segments,
            });
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

/// Player flight tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Forward speed, also the constant downward pull
    pub speed: f32,
    /// Up-speed gained (or lost) per second
    pub speed_factor: f32,
    /// Cap on up-speed
    pub speed_limited: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            speed_factor: PLAYER_SPEED_FACTOR,
            speed_limited: PLAYER_SPEED_LIMIT,
        }
    }
}

/// Camera shake tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeTuning {
    pub duration: f32,
    /// Amplitude of the shake
    pub amount: f32,
    pub decrease_factor: f32,
}

impl Default for ShakeTuning {
    fn default() -> Self {
        Self {
            duration: SHAKE_DURATION,
            amount: SHAKE_AMOUNT,
            decrease_factor: SHAKE_DECREASE_FACTOR,
        }
    }
}

/// Everything a session is built from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub strip: StripConfig,
    pub player: PlayerTuning,
    pub shake: ShakeTuning,
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.strip.validate()?;
        log::info!(
            "Loaded config: {} templates, {} colors",
            config.strip.segment_templates.len(),
            config.strip.color_palette.len()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
