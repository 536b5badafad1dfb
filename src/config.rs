// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime configuration
//!
//! Settings come from four layers, later ones winning: built-in defaults,
//! a TOML file, `PSXCORE_*` environment variables (optionally from a
//! `.env` file) and command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{EmulatorError, Result};
use crate::core::system::System;

/// Emulator runtime configuration
///
/// # Example
///
/// ```
/// use psxcore::config::Config;
///
/// let config: Config = toml::from_str("max_frames = 10").unwrap();
/// assert_eq!(config.max_frames, Some(10));
/// assert_eq!(config.log_level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// BIOS image (512KB)
    pub bios_path: Option<PathBuf>,
    /// PS-X EXE to sideload after the BIOS is in place
    pub exe_path: Option<PathBuf>,
    /// CPU steps per frame
    pub steps_per_frame: u32,
    /// Stop after this many frames; run until error when unset
    pub max_frames: Option<u64>,
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Log the CPU register file when emulation stops on an error
    pub dump_registers_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bios_path: None,
            exe_path: None,
            steps_per_frame: System::DEFAULT_STEPS_PER_FRAME,
            max_frames: None,
            log_level: "info".to_string(),
            dump_registers_on_error: true,
        }
    }
}

impl Config {
    pub const ENV_BIOS: &'static str = "PSXCORE_BIOS";
    pub const ENV_EXE: &'static str = "PSXCORE_EXE";
    pub const ENV_FRAMES: &'static str = "PSXCORE_FRAMES";
    pub const ENV_LOG: &'static str = "PSXCORE_LOG";

    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// [`EmulatorError::Io`] if the file cannot be read and
    /// [`EmulatorError::Config`] if it is not valid TOML for this struct.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| EmulatorError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| EmulatorError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Overlay `PSXCORE_*` variables from the process environment
    ///
    /// Call after `dotenvy::dotenv()` so a `.env` file is honored.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::Config`] if `PSXCORE_FRAMES` is not a number.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bios) = var(Self::ENV_BIOS) {
            self.bios_path = Some(PathBuf::from(bios));
        }
        if let Some(exe) = var(Self::ENV_EXE) {
            self.exe_path = Some(PathBuf::from(exe));
        }
        if let Some(frames) = var(Self::ENV_FRAMES) {
            let frames = frames.trim().parse().map_err(|e| {
                EmulatorError::Config(format!("{}={:?}: {}", Self::ENV_FRAMES, frames, e))
            })?;
            self.max_frames = Some(frames);
        }
        if let Some(level) = var(Self::ENV_LOG) {
            self.log_level = level;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.steps_per_frame, 564_480);
        assert_eq!(config.log_level, "info");
        assert!(config.dump_registers_on_error);
        assert!(config.bios_path.is_none());
        assert!(config.max_frames.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            bios_path = "bios/SCPH1001.BIN"
            dump_registers_on_error = false
            "#,
        )
        .unwrap();

        assert_eq!(config.bios_path, Some(PathBuf::from("bios/SCPH1001.BIN")));
        assert!(!config.dump_registers_on_error);
        assert_eq!(config.steps_per_frame, System::DEFAULT_STEPS_PER_FRAME);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("psxcore.toml");

        let config = Config {
            exe_path: Some(PathBuf::from("demo.exe")),
            max_frames: Some(120),
            log_level: "debug".to_string(),
            ..Config::default()
        };
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "steps_per_frame = \"many\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, EmulatorError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("none.toml")).unwrap_err();
        assert!(matches!(err, EmulatorError::Io(_)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let vars: HashMap<&str, &str> = [
            (Config::ENV_BIOS, "/roms/bios.bin"),
            (Config::ENV_FRAMES, " 30 "),
            (Config::ENV_LOG, "trace"),
        ]
        .into_iter()
        .collect();

        let mut config = Config {
            bios_path: Some(PathBuf::from("file.bin")),
            exe_path: Some(PathBuf::from("kept.exe")),
            ..Config::default()
        };
        config
            .apply_vars(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.bios_path, Some(PathBuf::from("/roms/bios.bin")));
        assert_eq!(config.exe_path, Some(PathBuf::from("kept.exe")));
        assert_eq!(config.max_frames, Some(30));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_bad_frame_count_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_vars(|key| (key == Config::ENV_FRAMES).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, EmulatorError::Config(_)));
    }
}
