//! Gizmo preferences.
//!
//! Persistent settings that survive restarts, stored as TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::coordinates::CoordinatesType;
use crate::error::{GizmoError, Result};

/// RGBA color with components in `0.0..=1.0`.
pub type ColorRgba = [f32; 4];

/// Preferences that drive gizmo behavior and appearance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoPreferences {
    // Snapping
    pub snap_step: f64,

    // Layout
    /// Distance of each grabber beyond the bounding box face
    pub grabber_offset: f64,

    // Appearance
    pub idle_line_width: f32,
    pub hover_line_width: f32,
    pub emission_factor: f32,
    pub axis_colors: [ColorRgba; 3],

    // Reference frame
    pub coordinates: CoordinatesType,
}

impl Default for GizmoPreferences {
    fn default() -> Self {
        Self {
            snap_step: 1.0,
            grabber_offset: 10.0,
            idle_line_width: 1.5,
            hover_line_width: 2.0,
            emission_factor: 0.1,
            axis_colors: [
                [0.75, 0.0, 0.0, 1.0],
                [0.0, 0.75, 0.0, 1.0],
                [0.0, 0.0, 0.75, 1.0],
            ],
            coordinates: CoordinatesType::World,
        }
    }
}

impl GizmoPreferences {
    /// Load preferences from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let prefs = Self::from_toml(&content)?;
        log::info!("Loaded gizmo preferences from {:?}", path);
        Ok(prefs)
    }

    /// Parse and validate preferences from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let prefs: Self = toml::from_str(content)?;
        prefs.validate()?;
        Ok(prefs)
    }

    /// Save preferences to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        log::info!("Saved gizmo preferences to {:?}", path);
        Ok(())
    }

    /// Load from the default path, falling back to defaults if absent.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!("Ignoring preferences at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Get the default preferences path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("slicer_gizmos");
            p.push("preferences.toml");
            p
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.snap_step > 0.0) || !self.snap_step.is_finite() {
            return Err(GizmoError::InvalidSnapStep(self.snap_step));
        }
        Ok(())
    }
}
