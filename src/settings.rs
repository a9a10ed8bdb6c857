//! Site preferences
//!
//! Persisted in LocalStorage on the web; native builds always start from
//! defaults.

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::physics::BodyOptions;
use crate::theme::ThemeMode;

/// Knobs for the gravity stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration while gravity is on (pixels/s²)
    pub gravity: f32,
    /// Thickness of the static walls enclosing the viewport
    pub wall_thickness: f32,
    /// Pointer drag spring, 0..1
    pub pointer_stiffness: f32,
    /// Material for tiles registered without their own options
    pub body: BodyOptions,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: consts::GRAVITY,
            wall_thickness: consts::WALL_THICKNESS,
            pointer_stiffness: consts::POINTER_STIFFNESS,
            body: BodyOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: ThemeMode,
    /// Start with tiles already falling
    pub gravity_on_start: bool,
    pub physics: PhysicsTuning,

    // === Accessibility ===
    /// Keep tiles in the static layout even if gravity is toggled
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            // Off so the page reads normally until asked
            gravity_on_start: false,
            physics: PhysicsTuning::default(),
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Whether gravity may be switched on at all
    pub fn motion_allowed(&self) -> bool {
        !self.reduced_motion
    }

    /// Gravity state for a fresh stage
    pub fn effective_gravity_on_start(&self) -> bool {
        self.gravity_on_start && self.motion_allowed()
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "folio_arcade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save settings");
                    return;
                }
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_blocks_gravity_on_start() {
        let settings = Settings {
            gravity_on_start: true,
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_gravity_on_start());

        let settings = Settings {
            gravity_on_start: true,
            ..Settings::default()
        };
        assert!(settings.effective_gravity_on_start());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"theme":"Light","physics":{"gravity":500.0}}"#).unwrap();
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.physics.gravity, 500.0);
        assert_eq!(settings.physics.wall_thickness, consts::WALL_THICKNESS);
        assert_eq!(settings.physics.body, BodyOptions::default());
        assert!(!settings.reduced_motion);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            theme: ThemeMode::Light,
            gravity_on_start: true,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
