//! # Effects Configuration
//!
//! All tuning knobs for the cursor effects, loadable from TOML.
//!
//! ```toml
//! max_sparkles = 50
//! max_trail_points = 20
//! world_scale = 3.0
//! gpu_decay = "fixed"
//! slot_acquire = "linear_scan"
//!
//! [ambient]
//! enabled = true
//! max_particles = 50
//! colors = ["#FF4444", "#FF6B35", "#FFD23F", "#FF8C42"]
//! ```
//!
//! Missing fields fall back to [`EffectsConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{ConfigError, ConfigResult};
use crate::memory::AcquirePolicy;

/// How GPU sparkles lose life each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpuDecayMode {
    /// Every slot loses `gpu_fixed_decay` per frame; the per-instance
    /// `decay` field is carried but not applied.
    #[default]
    Fixed,
    /// Each slot loses its own randomized `decay` per frame.
    PerInstance,
}

/// Ambient mote field settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Whether the engine runs the ambient field at all.
    pub enabled: bool,
    /// Constant population of the field.
    pub max_particles: usize,
    /// `#RRGGBB` palette motes pick from.
    pub colors: Vec<String>,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_particles: 50,
            colors: vec![
                "#FF4444".to_owned(),
                "#FF6B35".to_owned(),
                "#FFD23F".to_owned(),
                "#FF8C42".to_owned(),
            ],
        }
    }
}

impl AmbientConfig {
    /// Parses the palette into colors.
    pub fn palette(&self) -> ConfigResult<Vec<Rgb>> {
        self.colors.iter().map(|c| Rgb::from_hex(c)).collect()
    }
}

/// Configuration for the whole cursor effects engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// GPU sparkle slot count; also the soft target for canvas sparkles.
    pub max_sparkles: usize,
    /// Soft target for embers. Not enforced.
    pub max_embers: usize,
    /// Hard cap of the trail FIFO.
    pub max_trail_points: usize,
    /// Scale from normalized space into the 3D scene's visible frustum.
    pub world_scale: f32,
    /// Per-axis pointer delta that counts as movement.
    pub move_threshold: f32,
    /// Sparkles in a click burst.
    pub burst_sparkles: usize,
    /// Embers in a click burst.
    pub burst_embers: usize,
    /// Surface width floor.
    pub min_width: u32,
    /// Surface height floor.
    pub min_height: u32,
    /// GPU sparkle decay semantics.
    pub gpu_decay: GpuDecayMode,
    /// Per-frame life loss in [`GpuDecayMode::Fixed`].
    pub gpu_fixed_decay: f32,
    /// Free-slot acquisition strategy for the GPU pool.
    pub slot_acquire: AcquirePolicy,
    /// RNG seed. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Ambient field.
    pub ambient: AmbientConfig,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            max_sparkles: 50,
            max_embers: 30,
            max_trail_points: 20,
            world_scale: 3.0,
            move_threshold: 1.0,
            burst_sparkles: 20,
            burst_embers: 15,
            min_width: 320,
            min_height: 240,
            gpu_decay: GpuDecayMode::Fixed,
            gpu_fixed_decay: 0.02,
            slot_acquire: AcquirePolicy::LinearScan,
            seed: None,
            ambient: AmbientConfig::default(),
        }
    }
}

impl EffectsConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded effects config");
        Ok(config)
    }

    /// Returns this config with a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                reason: reason.to_owned(),
            }
        }

        if self.max_sparkles == 0 {
            return Err(invalid("max_sparkles", "must be at least 1"));
        }
        if self.max_trail_points == 0 {
            return Err(invalid("max_trail_points", "must be at least 1"));
        }
        if !self.world_scale.is_finite() || self.world_scale <= 0.0 {
            return Err(invalid("world_scale", "must be finite and positive"));
        }
        if !self.move_threshold.is_finite() || self.move_threshold < 0.0 {
            return Err(invalid("move_threshold", "must be finite and not negative"));
        }
        if self.min_width == 0 || self.min_height == 0 {
            return Err(invalid("min_width/min_height", "must be at least 1"));
        }
        if !self.gpu_fixed_decay.is_finite() || self.gpu_fixed_decay <= 0.0 {
            return Err(invalid("gpu_fixed_decay", "must be finite and positive"));
        }
        if self.ambient.enabled && self.ambient.max_particles == 0 {
            return Err(invalid("ambient.max_particles", "must be at least 1"));
        }
        if self.ambient.colors.is_empty() {
            return Err(invalid("ambient.colors", "palette must not be empty"));
        }
        self.ambient.palette()?;

        Ok(())
    }
}
