// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file. Playlists are
//! deliberately not part of it, every session starts empty.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{model::Volume, session::DEFAULT_SKIP_STEP_MS};

pub(crate) const CONFIG_NAME: &str = "barely";

const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub default_volume: i32,
    pub skip_step_ms: u64,
    pub tick_interval_ms: u64,
    /// File extensions picked up when opening a directory, case-insensitive.
    pub extensions: Vec<String>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            default_volume: i32::from(Volume::DEFAULT),
            skip_step_ms: DEFAULT_SKIP_STEP_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            extensions: ["wav", "mp3", "mpeg", "ogg", "m4a", "wma", "aac", "amr", "flac"]
                .into_iter()
                .map(String::from)
                .collect(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Replaces unusable values with their defaults.
    pub(crate) fn normalized(mut self) -> Self {
        let defaults = Self::default();

        self.default_volume = i32::from(Volume::new(self.default_volume).level());
        if self.skip_step_ms == 0 {
            self.skip_step_ms = defaults.skip_step_ms;
        }
        if self.tick_interval_ms == 0 {
            self.tick_interval_ms = defaults.tick_interval_ms;
        }
        self.extensions = self
            .extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        self
    }

    pub(crate) fn volume(&self) -> Volume {
        Volume::new(self.default_volume)
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

pub fn load_config() -> AppConfig {
    confy::load::<AppConfig>(CONFIG_NAME, None)
        .unwrap_or_default()
        .normalized()
}

/// Directory holding the configuration file, also used for the log file.
pub(crate) fn config_dir() -> Option<PathBuf> {
    confy::get_configuration_file_path(CONFIG_NAME, None)
        .ok()
        .and_then(|path| path.parent().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_player() {
        let config = AppConfig::default();
        assert_eq!(config.volume().level(), 50);
        assert_eq!(config.skip_step_ms, 10_000);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert!(config.extensions.iter().any(|ext| ext == "mp3"));
    }

    #[test]
    fn normalization_repairs_bad_values() {
        let config = AppConfig {
            default_volume: 400,
            skip_step_ms: 0,
            tick_interval_ms: 0,
            extensions: vec![".MP3".into(), "".into(), "Ogg".into()],
            ..AppConfig::default()
        }
        .normalized();

        assert_eq!(config.default_volume, 100);
        assert_eq!(config.skip_step_ms, DEFAULT_SKIP_STEP_MS);
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.extensions, ["mp3", "ogg"]);
    }

    #[test]
    fn normalization_keeps_valid_values() {
        let config = AppConfig::default();
        assert_eq!(config.clone().normalized(), config);
    }
}
