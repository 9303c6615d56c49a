//! Application settings, persisted through eframe storage.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::canvas::{DEFAULT_CANVAS_SIZE, MAX_CANVAS_DIMENSION};
use crate::generation::{DEFAULT_GENERATION_DELAY, GenerationMode, Generator};
use crate::layout::{DEFAULT_CANVAS_RATIO, DEFAULT_FLOATING_SIZE, LayoutState, MAX_CANVAS_RATIO, MIN_CANVAS_RATIO};

/// App id used for the native storage location
pub const APP_ID: &str = "lingxian";

/// Longest simulated generation the settings may ask for
pub const MAX_GENERATION_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // older saved settings get defaults for new fields
pub struct Settings {
    /// Where `projects.json` lives; `None` uses the platform data directory
    pub data_dir: Option<PathBuf>,
    /// Drawing resolution in pixels
    pub canvas_size: [u32; 2],
    /// Canvas share of the width in split-screen mode
    pub canvas_ratio: f32,
    /// Size of the floating pane in the full-area modes
    pub preview_panel_size: [f32; 2],
    pub generation_mode: GenerationMode,
    pub generation_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            canvas_size: DEFAULT_CANVAS_SIZE,
            canvas_ratio: DEFAULT_CANVAS_RATIO,
            preview_panel_size: [DEFAULT_FLOATING_SIZE.x, DEFAULT_FLOATING_SIZE.y],
            generation_mode: GenerationMode::default(),
            generation_delay_ms: DEFAULT_GENERATION_DELAY.as_millis() as u64,
        }
    }
}

impl Settings {
    /// Load from eframe storage, falling back to defaults
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|storage| eframe::get_value::<Settings>(storage, eframe::APP_KEY))
            .unwrap_or_default()
            .sanitized()
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Repair out-of-range values from hand-edited or older storage
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();

        if self.canvas_size[0] == 0 || self.canvas_size[1] == 0 {
            log::warn!("Invalid canvas size {:?}, using default", self.canvas_size);
            self.canvas_size = defaults.canvas_size;
        } else if self.canvas_size.iter().any(|&d| d > MAX_CANVAS_DIMENSION) {
            log::warn!("Canvas size {:?} too large, capping", self.canvas_size);
            self.canvas_size = self.canvas_size.map(|d| d.min(MAX_CANVAS_DIMENSION));
        }
        if self.generation_delay_ms > MAX_GENERATION_DELAY_MS {
            log::warn!("Generation delay {} ms too long, capping", self.generation_delay_ms);
            self.generation_delay_ms = MAX_GENERATION_DELAY_MS;
        }
        self.canvas_ratio = if self.canvas_ratio.is_finite() {
            self.canvas_ratio.clamp(MIN_CANVAS_RATIO, MAX_CANVAS_RATIO)
        } else {
            defaults.canvas_ratio
        };
        let [w, h] = self.preview_panel_size;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            self.preview_panel_size = defaults.preview_panel_size;
        }
        self
    }

    /// Directory the project store should use
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(|| eframe::storage_dir(APP_ID))
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }

    pub fn generator(&self) -> Generator {
        Generator::new(self.generation_mode, self.generation_delay())
    }

    /// Fresh layout state for a workspace session
    pub fn layout_state(&self) -> LayoutState {
        let [w, h] = self.preview_panel_size;
        LayoutState::new(self.canvas_ratio, egui::vec2(w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_repairs_bad_values() {
        let settings = Settings {
            canvas_size: [0, 600],
            canvas_ratio: f32::NAN,
            preview_panel_size: [-5.0, 100.0],
            ..Default::default()
        }
        .sanitized();

        assert_eq!(settings.canvas_size, DEFAULT_CANVAS_SIZE);
        assert_eq!(settings.canvas_ratio, DEFAULT_CANVAS_RATIO);
        assert_eq!(settings.preview_panel_size, [200.0, 250.0]);
    }

    #[test]
    fn test_sanitize_clamps_ratio() {
        let settings = Settings {
            canvas_ratio: 0.95,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.canvas_ratio, MAX_CANVAS_RATIO);
    }

    #[test]
    fn test_sanitize_caps_huge_values() {
        let settings = Settings {
            canvas_size: [u32::MAX, 600],
            generation_delay_ms: u64::MAX,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(settings.canvas_size, [MAX_CANVAS_DIMENSION, 600]);
        assert_eq!(settings.generation_delay(), Duration::from_millis(MAX_GENERATION_DELAY_MS));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"generation_delay_ms": 10}"#).unwrap();
        assert_eq!(settings.generation_delay(), Duration::from_millis(10));
        assert_eq!(settings.generation_mode, GenerationMode::Filter);
        assert_eq!(settings.canvas_size, DEFAULT_CANVAS_SIZE);
    }
}
