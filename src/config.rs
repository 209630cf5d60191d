//! Game tuning
//!
//! Defaults reproduce the shipped balance. A page may override any subset by
//! embedding JSON in `<script id="splash-config" type="application/json">`.

use serde::{Deserialize, Serialize};

use std::f32::consts::PI;

use crate::consts::{ARENA_MAX, ARENA_MIN};

/// Errors raised while loading configuration overrides
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A `base + [0, variance)` sampling range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub base: f32,
    pub variance: f32,
}

impl Spread {
    pub const fn new(base: f32, variance: f32) -> Self {
        Self { base, variance }
    }

    /// Upper end of the range
    pub fn max(&self) -> f32 {
        self.base + self.variance
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !self.base.is_finite() || !self.variance.is_finite() || !self.max().is_finite() {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }
        if self.base < 0.0 || self.variance < 0.0 {
            return Err(ConfigError::Invalid(format!("{name} must be non-negative")));
        }
        if self.variance > 0.0 && self.max() <= self.base {
            return Err(ConfigError::Invalid(format!(
                "{name} variance {} is too small to widen base {}",
                self.variance, self.base
            )));
        }
        Ok(())
    }
}

/// Axis-aligned spawn bounds in viewport percent (same range on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBounds {
    pub min: f32,
    pub max: f32,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self { min: 10.0, max: 90.0 }
    }
}

/// Per-fish tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    /// Fish colors (CSS color strings)
    pub palette: Vec<String>,
    pub bounds: SpawnBounds,
    /// Percent of viewport per baseline tick
    pub speed: Spread,
    /// Radians per baseline tick
    pub turn_rate: Spread,
    /// Radians of heading noise per tick
    pub jitter: Spread,
    /// Distance (percent) at which a target counts as reached
    pub reach_threshold: Spread,
    pub respawn_delay_ms: u32,
    /// Viewports narrower than this (CSS px) are treated as mobile
    pub mobile_breakpoint: f32,
    /// Speed multiplier on mobile viewports
    pub mobile_speed_multiplier: f32,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            palette: ["#FFB3BA", "#FFDFBA", "#FFFFBA", "#BAFFC9", "#BAE1FF", "#E3BAFF"]
                .into_iter()
                .map(String::from)
                .collect(),
            bounds: SpawnBounds::default(),
            speed: Spread::new(0.12, 0.08),
            turn_rate: Spread::new(0.005, 0.015),
            jitter: Spread::new(0.003, 0.007),
            reach_threshold: Spread::new(3.0, 3.0),
            respawn_delay_ms: 3000,
            mobile_breakpoint: 768.0,
            mobile_speed_multiplier: 1.5,
        }
    }
}

/// Session rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub initial_lives: u32,
    pub fish_count: usize,
    /// How long the "+1" feedback stays on screen
    pub hit_feedback_ms: u32,
    /// How long the broken heart stays on screen
    pub miss_feedback_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            fish_count: 5,
            hit_feedback_ms: 800,
            miss_feedback_ms: 750,
        }
    }
}

/// Ripple background tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Pixelation grid density handed to the fragment stage
    pub pixel_count: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self { pixel_count: 100.0 }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fish: FishConfig,
    pub game: GameConfig,
    pub ripple: RippleConfig,
}

impl Config {
    /// Element holding JSON overrides
    pub const ELEMENT_ID: &'static str = "splash-config";

    /// Parse overrides on top of the defaults and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fish = &self.fish;
        if fish.palette.is_empty() {
            return Err(ConfigError::Invalid("palette must not be empty".into()));
        }
        let b = fish.bounds;
        if !(ARENA_MIN..=ARENA_MAX).contains(&b.min)
            || !(ARENA_MIN..=ARENA_MAX).contains(&b.max)
            || b.min >= b.max
        {
            return Err(ConfigError::Invalid(format!(
                "bounds {}..{} must be an increasing range inside {ARENA_MIN}..{ARENA_MAX}",
                b.min, b.max
            )));
        }
        for (name, spread) in [
            ("speed", fish.speed),
            ("turn_rate", fish.turn_rate),
            ("jitter", fish.jitter),
            ("reach_threshold", fish.reach_threshold),
        ] {
            spread.validate(name)?;
        }
        // Angular rates past half a turn per tick make steering meaningless
        for (name, spread) in [("turn_rate", fish.turn_rate), ("jitter", fish.jitter)] {
            if spread.max() > PI {
                return Err(ConfigError::Invalid(format!(
                    "{name} may reach at most {PI} radians per tick, got {}",
                    spread.max()
                )));
            }
        }
        if !(fish.mobile_speed_multiplier.is_finite() && fish.mobile_speed_multiplier > 0.0) {
            return Err(ConfigError::Invalid("mobile_speed_multiplier must be positive".into()));
        }
        if self.game.initial_lives == 0 {
            return Err(ConfigError::Invalid("initial_lives must be at least 1".into()));
        }
        if !(self.ripple.pixel_count.is_finite() && self.ripple.pixel_count > 0.0) {
            return Err(ConfigError::Invalid("pixel_count must be positive".into()));
        }
        Ok(())
    }

    /// Load overrides from the page (WASM only), falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config overrides");
                    config
                }
                Err(e) => {
                    log::error!("Ignoring config overrides: {e}");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default config");
                Self::default()
            }
        }
    }

    /// Native builds always use the defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.fish.palette.len(), 6);
        assert_eq!(config.fish.respawn_delay_ms, 3000);
        assert_eq!(config.game.initial_lives, 3);
        assert_eq!(config.game.fish_count, 5);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = Config::from_json(r#"{ "game": { "fish_count": 8 }, "fish": { "respawn_delay_ms": 500 } }"#)
            .unwrap();
        assert_eq!(config.game.fish_count, 8);
        assert_eq!(config.game.initial_lives, 3);
        assert_eq!(config.fish.respawn_delay_ms, 500);
        assert_eq!(config.fish.bounds, SpawnBounds::default());
        assert_eq!(config.ripple.pixel_count, 100.0);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = Config::from_json(r#"{ "fish": { "bounds": { "min": 80, "max": 20 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_palette() {
        let err = Config::from_json(r#"{ "fish": { "palette": [] } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_variance_that_vanishes_in_f32() {
        let err = Config::from_json(r#"{ "fish": { "speed": { "base": 0.12, "variance": 1e-10 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_variance_is_allowed() {
        let config = Config::from_json(r#"{ "fish": { "speed": { "base": 0.12, "variance": 0 } } }"#)
            .unwrap();
        assert_eq!(config.fish.speed.max(), 0.12);
    }

    #[test]
    fn test_rejects_huge_angular_rates() {
        let err = Config::from_json(r#"{ "fish": { "jitter": { "base": 1e9, "variance": 1e9 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_json(r#"{ "fish": { "turn_rate": { "base": 3.0, "variance": 0.5 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut config = Config::default();
        config.fish.speed.base = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.fish.reach_threshold.variance = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.ripple.pixel_count = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
