//! Server configuration: JSON file with per-field defaults, plus the
//! compiled-in vehicle presets.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::physics::{VehicleSpec, PRESETS};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown vehicle preset {0:?} (known: road-car, hauler)")]
    UnknownPreset(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Websocket listen address, e.g. `0.0.0.0:9001`.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Fixed simulation tick rate.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Vehicle preset spawned for every player.
    #[serde(default = "default_vehicle_preset")]
    pub vehicle_preset: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:9001".to_string()
}

fn default_tick_hz() -> u32 {
    60
}

fn default_vehicle_preset() -> String {
    "road-car".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            tick_hz: default_tick_hz(),
            vehicle_preset: default_vehicle_preset(),
        }
    }
}

impl ServerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Resolve the configured preset name against the compiled-in specs.
    pub fn vehicle_spec(&self) -> Result<VehicleSpec, ConfigError> {
        PRESETS
            .iter()
            .find(|spec| spec.name == self.vehicle_preset)
            .map(|spec| **spec)
            .ok_or_else(|| ConfigError::UnknownPreset(self.vehicle_preset.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_json_fills_defaults() {
        let cfg = ServerConfig::from_json_str(r#"{"tick_hz": 120}"#).unwrap();
        assert_eq!(cfg.tick_hz, 120);
        assert_eq!(cfg.listen_addr, "0.0.0.0:9001");
        assert_eq!(cfg.vehicle_preset, "road-car");
    }

    #[test]
    fn known_presets_resolve() {
        for name in ["road-car", "hauler"] {
            let cfg = ServerConfig {
                vehicle_preset: name.to_string(),
                ..ServerConfig::default()
            };
            assert_eq!(cfg.vehicle_spec().unwrap().name, name);
        }
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let cfg = ServerConfig {
            vehicle_preset: "hovercraft".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            cfg.vehicle_spec(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }
}
