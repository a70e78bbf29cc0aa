/*
 * config.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of unvm, a Node.js version manager.
 *
 * unvm is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * unvm is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with unvm.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Persisted state: where releases are installed, which are installed, which is active, and
//! the mirror to download from. Stored as JSON in `<data dir>/config.json`.
//!
//! The data directory is resolved once at startup with `data_dir()` and passed explicitly to
//! `Config::load` / `Config::save`.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dist::DEFAULT_MIRROR;

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Errors loading or saving the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: invalid config: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Parent of one directory per installed version.
    pub install_directory: PathBuf,
    /// Link pointing at the active version.
    pub active_directory: PathBuf,
    #[serde(default)]
    pub installed: BTreeSet<String>,
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default = "default_mirror")]
    pub mirror: String,
}

fn default_mirror() -> String {
    DEFAULT_MIRROR.to_string()
}

impl Config {
    /// Fresh config rooted at `data_dir`: versions in `version/`, active link at `active`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            install_directory: data_dir.join("version"),
            active_directory: data_dir.join("active"),
            installed: BTreeSet::new(),
            active: None,
            mirror: default_mirror(),
        }
    }

    /// Load `<data_dir>/config.json`, or a fresh config if the file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new(data_dir)),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Json { path, source })
    }

    /// Write `<data_dir>/config.json`, creating the directory if needed.
    pub fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(data_dir).map_err(|source| ConfigError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        let path = data_dir.join(CONFIG_FILE);
        let json = serde_json::to_vec_pretty(self).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| ConfigError::Io { path, source })
    }

    /// Directory holding `version`.
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.install_directory.join(version)
    }

    pub fn is_installed(&self, version: &str) -> bool {
        self.installed.contains(version)
    }

    pub fn is_active(&self, version: &str) -> bool {
        self.active.as_deref() == Some(version)
    }
}

/// Data directory of the running process, from the environment.
pub fn data_dir() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    data_dir_from(|name| std::env::var_os(name), &cwd)
}

/// Data directory from an environment lookup:
/// `UNVM_HOME`, else `$XDG_CONFIG_HOME/unvm` (not on macOS), else the per-user default under
/// `$HOME`, else `<cwd>/.unvm`.
pub fn data_dir_from(env: impl Fn(&str) -> Option<OsString>, cwd: &Path) -> PathBuf {
    let non_empty = |name: &str| env(name).filter(|v| !v.is_empty()).map(PathBuf::from);
    if let Some(dir) = non_empty("UNVM_HOME") {
        return dir;
    }
    if cfg!(target_os = "macos") {
        if let Some(home) = non_empty("HOME") {
            return home.join("Library").join("Application Support").join("unvm");
        }
    } else if cfg!(windows) {
        if let Some(appdata) = non_empty("APPDATA") {
            return appdata.join("unvm");
        }
    } else {
        if let Some(xdg) = non_empty("XDG_CONFIG_HOME") {
            return xdg.join("unvm");
        }
        if let Some(home) = non_empty("HOME") {
            return home.join(".config").join("unvm");
        }
    }
    cwd.join(".unvm")
}
