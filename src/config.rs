//! YAML configuration file with live reload.
//!
//! Capture settings are read once at startup; vignette parameters are
//! hot-applied while the preview runs.

use crate::capture::CaptureConfig;
use crate::filter::VignetteParams;
use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use tracing::{error, info, warn};

/// Application configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub vignette: VignetteParams,
}

impl Config {
    /// Loads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {:?}", path))
    }
}

/// Watches the configuration file and reports changes.
pub struct ConfigWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    rx: Receiver<std::result::Result<Event, notify::Error>>,
    current: Config,
}

impl ConfigWatcher {
    /// Starts watching the given config file. Returns `None` if the watcher
    /// cannot be set up; the preview then just runs with the startup config.
    pub fn new(path: PathBuf, current: Config) -> Option<Self> {
        let (tx, rx) = channel();

        let mut watcher = match RecommendedWatcher::new(tx, notify::Config::default()) {
            Ok(watcher) => watcher,
            Err(e) => {
                warn!("Failed to create config watcher: {}", e);
                return None;
            }
        };
        if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
            warn!("Failed to watch config file {:?}: {}", path, e);
            return None;
        }
        info!("Watching config file {:?} for changes", path);

        Some(Self {
            path,
            _watcher: watcher,
            rx,
            current,
        })
    }

    /// Drains pending filesystem events and reloads the file if it changed.
    /// Returns the new config when it differs from the current one.
    pub fn check_for_changes(&mut self) -> Option<Config> {
        let mut needs_reload = false;
        while let Ok(res) = self.rx.try_recv() {
            if let Ok(event) = res {
                if matches!(
                    event.kind,
                    notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                ) {
                    needs_reload = true;
                }
            }
        }
        if !needs_reload {
            return None;
        }

        info!("Config file changed, reloading...");
        match Config::load(&self.path) {
            Ok(new_config) => {
                if new_config == self.current {
                    return None;
                }
                if new_config.capture != self.current.capture {
                    warn!("Capture settings changed on disk; restart to apply them");
                }
                self.current = new_config;
                Some(new_config)
            }
            Err(e) => {
                error!("{:#}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let yaml = r#"
capture:
  device_index: 1
  width: 1920
  height: 1080
  fps: 25
vignette:
  center: [960.0, 540.0]
  radius: 400.0
  intensity: 0.5
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.capture.device_index, 1);
        assert_eq!(config.capture.width, 1920);
        assert_eq!(config.capture.fps, 25);
        assert_eq!(config.vignette.center, Some([960.0, 540.0]));
        assert_eq!(config.vignette.radius, Some(400.0));
        assert_eq!(config.vignette.intensity, 0.5);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let yaml = "vignette:\n  intensity: 0.3\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.capture, CaptureConfig::default());
        assert_eq!(config.vignette.center, None);
        assert_eq!(config.vignette.radius, None);
        assert_eq!(config.vignette.intensity, 0.3);
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }
}
