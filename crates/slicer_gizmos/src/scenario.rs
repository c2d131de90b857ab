//! Scripted gizmo sessions.
//!
//! A scenario is a TOML file describing a camera, the preferences, a
//! selection and an ordered list of pointer events. [`Replay`] feeds those
//! events through a [`GizmoManager`] exactly as a viewport would.
//!
//! ```toml
//! [preferences]
//! snap_step = 0.5
//!
//! [selection]
//! mode = "instance"
//!
//! [[selection.volumes]]
//! id = 1
//! object_idx = 0
//! instance_idx = 0
//! mesh_box = { min = [-5.0, -5.0, -5.0], max = [5.0, 5.0, 5.0] }
//!
//! [[events]]
//! kind = "press"
//! screen = [655.0, 360.0]
//! ```

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::config::GizmoPreferences;
use crate::coordinates::CoordinatesType;
use crate::error::Result;
use crate::gizmos::{GizmoContext, GizmoKind};
use crate::manager::{GizmoManager, MouseEvent};
use crate::scene::{SelectedVolume, Selection, SelectionMode};

/// Initial selection of a scenario.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSpec {
    pub mode: SelectionMode,
    pub volumes: Vec<SelectedVolume>,
}

/// One scripted input step. Screen positions are viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioEvent {
    Move {
        screen: [f64; 2],
    },
    Press {
        screen: [f64; 2],
    },
    Drag {
        screen: [f64; 2],
        #[serde(default)]
        shift: bool,
    },
    Release,
    Undo,
    Redo,
    /// Switch the reference frame between drags
    Coordinates {
        coordinates: CoordinatesType,
    },
}

/// A complete scripted session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// `None` when the file has no `[preferences]` table
    pub preferences: Option<GizmoPreferences>,
    pub camera: Camera,
    pub selection: SelectionSpec,
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let scenario = Self::from_toml(&content)?;
        log::info!("Loaded scenario {:?} ({} events)", path, scenario.events.len());
        Ok(scenario)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(content)?;
        if let Some(prefs) = &scenario.preferences {
            prefs.validate()?;
        }
        Ok(scenario)
    }
}

/// Live state of a scenario being replayed.
pub struct Replay {
    camera: Camera,
    preferences: GizmoPreferences,
    coordinates: CoordinatesType,
    selection: Selection,
    manager: GizmoManager,
}

impl Replay {
    /// Build the selection and open the move gizmo on it.
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let selection = Selection::with_volumes(scenario.selection.mode, scenario.selection.volumes.iter().cloned());
        let preferences = scenario.preferences.clone().unwrap_or_default();
        let mut manager = GizmoManager::new();
        manager.open(GizmoKind::Move, &selection)?;
        Ok(Self {
            camera: scenario.camera,
            coordinates: preferences.coordinates,
            preferences,
            selection,
            manager,
        })
    }

    /// Replay every event of the scenario.
    pub fn run(scenario: &Scenario) -> Result<Self> {
        let mut replay = Self::new(scenario)?;
        for event in &scenario.events {
            replay.apply(*event)?;
        }
        Ok(replay)
    }

    /// Apply one event. Returns true if the gizmo consumed it.
    pub fn apply(&mut self, event: ScenarioEvent) -> Result<bool> {
        let ray = |screen: [f64; 2]| self.camera.mouse_ray(DVec2::from(screen));
        let mouse = match event {
            ScenarioEvent::Move { screen } => MouseEvent::Move { ray: ray(screen) },
            ScenarioEvent::Press { screen } => MouseEvent::Press { ray: ray(screen) },
            ScenarioEvent::Drag { screen, shift } => MouseEvent::Drag {
                ray: ray(screen),
                shift,
            },
            ScenarioEvent::Release => MouseEvent::Release,
            ScenarioEvent::Undo => {
                let label = self.manager.undo(&mut self.selection)?;
                log::info!("Undo: {:?}", label);
                return Ok(label.is_some());
            }
            ScenarioEvent::Redo => {
                let label = self.manager.redo(&mut self.selection)?;
                log::info!("Redo: {:?}", label);
                return Ok(label.is_some());
            }
            ScenarioEvent::Coordinates { coordinates } => {
                log::info!("Reference frame: {}", coordinates.name());
                self.coordinates = coordinates;
                return Ok(false);
            }
        };

        let ctx = GizmoContext::new(&self.camera, &self.preferences).with_coordinates(self.coordinates);
        let consumed = self.manager.on_mouse(mouse, &mut self.selection, &ctx);
        log::debug!("{:?} -> {:?} (consumed: {})", event, self.manager.state(), consumed);
        Ok(consumed)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn manager(&self) -> &GizmoManager {
        &self.manager
    }

    pub fn tooltip(&self) -> String {
        self.manager.tooltip(&self.selection)
    }
}
