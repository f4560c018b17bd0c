//! # Engine Configuration
//!
//! Loaded once at startup from TOML. Every section and field has a default,
//! so an empty file (or no file) yields the stock tuning.
//!
//! ```toml
//! [pool]
//! capacity = 4096
//!
//! [physics]
//! gravity = 800.0
//! grav_amplification = 20.0
//!
//! [random]
//! seed = 1234
//! ```
//!
//! The emission counts and spreads are visual tuning knobs; they are kept
//! as configuration defaults rather than constants so they can be adjusted
//! without touching emitter code.

use std::path::Path;

use cinder_core::{clamp_capacity, ABSOLUTE_MIN_CAPACITY, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};

use crate::error::{EffectsError, EffectsResult};

/// Top-level configuration container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pool sizing.
    pub pool: PoolConfig,
    /// Gravity and per-kind physics knobs.
    pub physics: PhysicsConfig,
    /// Emitter counts and spreads.
    pub emission: EmissionConfig,
    /// Entity halo geometry.
    pub halo: HaloConfig,
    /// Random source seeding.
    pub random: RandomConfig,
}

impl EngineConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::Config`] if the text is not valid TOML or a
    /// field has the wrong type.
    pub fn from_toml_str(text: &str) -> EffectsResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::ConfigFileNotFound`] if `path` does not exist,
    /// [`EffectsError::Io`] if it cannot be read, and
    /// [`EffectsError::Config`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> EffectsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EffectsError::ConfigFileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), capacity = config.pool.capacity, "loaded engine config");
        Ok(config)
    }

    /// The pool capacity the engine will actually use.
    ///
    /// Requests under the floor are clamped rather than rejected.
    #[must_use]
    pub fn pool_capacity(&self) -> usize {
        let capacity = clamp_capacity(self.pool.capacity);
        if capacity != self.pool.capacity {
            tracing::warn!(
                requested = self.pool.capacity,
                floor = ABSOLUTE_MIN_CAPACITY,
                "particle capacity below floor, clamping"
            );
        }
        capacity
    }
}

/// Pool sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Requested number of particle slots.
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Gravity and per-kind physics knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World gravity in units per second squared.
    pub gravity: f32,
    /// Fraction of world gravity applied to particles.
    pub gravity_scale: f32,
    /// Multiplier on the gravity applied to `Grav` particles.
    pub grav_amplification: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            gravity_scale: 0.05,
            grav_amplification: 1.0,
        }
    }
}

/// Emitter counts and spreads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionConfig {
    /// Particles in a plain explosion.
    pub explosion_count: usize,
    /// Particles in a colour-range explosion.
    pub color_explosion_count: usize,
    /// Particles in a blob explosion.
    pub blob_count: usize,
    /// Upper bound on a point effect's count.
    pub point_effect_max: usize,
    /// Point effects above this count burst as explosions instead of smoke.
    pub large_burst_threshold: usize,
    /// Palette index that turns a point effect into blood.
    pub blood_color: u8,
    /// Fewest particles in a blood spray.
    pub blood_count_min: usize,
    /// Most particles in a blood spray.
    pub blood_count_max: usize,
    /// Distance between consecutive trail particles.
    pub trail_step: f32,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            explosion_count: 2048,
            color_explosion_count: 512,
            blob_count: 1024,
            point_effect_max: 1024,
            large_burst_threshold: 100,
            blood_color: 73,
            blood_count_min: 100,
            blood_count_max: 200,
            trail_step: 0.5,
        }
    }
}

/// Entity halo geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaloConfig {
    /// Distance of each halo point from the entity origin.
    pub distance: f32,
    /// Length of the oscillating offset added to each point.
    pub beam_length: f32,
}

impl Default for HaloConfig {
    fn default() -> Self {
        Self {
            distance: 64.0,
            beam_length: 16.0,
        }
    }
}

/// Random source seeding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Seed for the engine's ChaCha stream.
    pub seed: u64,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self { seed: 0x5EED }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str(
            r#"
            [pool]
            capacity = 4096

            [physics]
            grav_amplification = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(config.pool.capacity, 4096);
        assert_eq!(config.physics.grav_amplification, 20.0);
        assert_eq!(config.physics.gravity, 800.0);
        assert_eq!(config.emission.explosion_count, 2048);
    }

    #[test]
    fn test_capacity_clamped_not_rejected() {
        let config = EngineConfig::from_toml_str("[pool]\ncapacity = 10\n").unwrap();
        assert_eq!(config.pool_capacity(), ABSOLUTE_MIN_CAPACITY);
    }

    #[test]
    fn test_bad_type_is_config_error() {
        let err = EngineConfig::from_toml_str("[pool]\ncapacity = \"lots\"\n").unwrap_err();
        assert!(matches!(err, EffectsError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, EffectsError::ConfigFileNotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cinder.toml");
        std::fs::write(&path, "[random]\nseed = 99\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.random.seed, 99);
    }

    #[test]
    fn test_serialize_round_trip_of_defaults() {
        let text = toml::to_string(&EngineConfig::default()).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), EngineConfig::default());
    }
}
