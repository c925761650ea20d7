//! Game settings and preferences
//!
//! Persisted as a small JSON file next to the high score.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_GRID_POINTS, MAX_PARTICLES, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::highscores::HIGH_SCORE_FILE;
use crate::persistence;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particle pool capacity for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 4096,
            QualityPreset::Medium => 12_800,
            QualityPreset::High => MAX_PARTICLES,
        }
    }

    /// Grid density multiplier (1.0 = full)
    pub fn grid_density(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 0.75,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    /// Point-masses in the background grid at full density
    pub max_grid_points: u32,

    /// Fixed run seed (None = derive from the clock)
    pub seed: Option<u64>,

    /// Where the high score lives
    pub high_score_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            max_grid_points: MAX_GRID_POINTS,
            seed: None,
            high_score_path: HIGH_SCORE_FILE.to_string(),
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        self.quality.max_particles()
    }

    /// Square grid cell size that fits the requested number of point-masses
    pub fn grid_spacing(&self) -> Vec2 {
        let points = (self.max_grid_points as f32 * self.quality.grid_density()).max(1.0);
        Vec2::splat((self.screen_width * self.screen_height / points).sqrt())
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match persistence::read_json(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), persistence::PersistenceError> {
        persistence::write_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
