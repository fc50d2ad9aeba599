//! Player preferences and developer options
//!
//! Persisted separately from progress in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};

/// Developer options injected into the engine.
///
/// Test mode bypasses every unlock check. It can only be switched on when the
/// page is served from a development host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DevOptions {
    pub dev_environment: bool,
    pub test_mode: bool,
}

impl DevOptions {
    /// Storage key of the test-mode flag (a bare JSON boolean)
    pub const TEST_MODE_KEY: &'static str = "memory-lane-test-mode";

    /// Production defaults: no dev tools, no test mode
    pub fn production() -> Self {
        Self::default()
    }

    /// Local hosts and explicit ports count as development
    pub fn is_dev_host(hostname: &str, port: &str) -> bool {
        hostname == "localhost"
            || hostname == "127.0.0.1"
            || hostname.contains("localhost")
            || !port.is_empty()
    }

    /// Load the stored flag. Dev hosts default to test mode on; other hosts
    /// never enable it.
    pub fn load(storage: &dyn Storage, dev_environment: bool) -> Self {
        if !dev_environment {
            return Self::production();
        }
        let test_mode = match load_json::<bool>(storage, Self::TEST_MODE_KEY) {
            Ok(Some(flag)) => {
                log::info!("Test mode loaded: {}", if flag { "ENABLED" } else { "DISABLED" });
                flag
            }
            Ok(None) => true,
            Err(err) => {
                log::error!("Failed to load test mode: {}", err);
                true
            }
        };
        Self {
            dev_environment,
            test_mode,
        }
    }

    pub fn save(&self, storage: &dyn Storage) {
        if !self.dev_environment {
            return;
        }
        match save_json(storage, Self::TEST_MODE_KEY, &self.test_mode) {
            Ok(()) => log::info!("Test mode saved"),
            Err(err) => log::error!("Failed to save test mode: {}", err),
        }
    }

    /// Flip test mode. Refused outside a dev environment.
    pub fn toggle(&mut self) -> bool {
        if !self.dev_environment {
            log::warn!("Test mode is only available in a development environment");
            return false;
        }
        self.test_mode = !self.test_mode;
        log::info!("Test mode {}", if self.test_mode { "ENABLED" } else { "DISABLED" });
        true
    }
}

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Reduced motion (skip reveal animations)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "memory-lane-settings";

    /// Effective sound-effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn load(storage: &dyn Storage) -> Self {
        match load_json(storage, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from storage");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::error!("Failed to load settings: {}", err);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &dyn Storage) {
        match save_json(storage, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(err) => log::error!("Failed to save settings: {}", err),
        }
    }
}
