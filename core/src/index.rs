/*
 * index.rs
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

//! Node.js release index (`index.json`): one entry per release, newest first, and selection of
//! a release from a user-supplied selector.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors decoding the index or selecting from it.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("invalid release index: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no release matches {0:?}")]
    NoMatch(String),
}

/// One release as listed in `index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// `v<major>.<minor>.<patch>`
    pub version: String,
    pub date: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub npm: Option<String>,
    #[serde(default)]
    pub v8: String,
    #[serde(default)]
    pub uv: Option<String>,
    #[serde(default)]
    pub zlib: Option<String>,
    #[serde(default)]
    pub openssl: Option<String>,
    #[serde(default)]
    pub modules: Option<String>,
    /// LTS codename; the index encodes "not LTS" as `false`.
    #[serde(deserialize_with = "deserialize_lts", serialize_with = "serialize_lts")]
    pub lts: Option<String>,
    #[serde(default)]
    pub security: bool,
}

impl VersionEntry {
    pub fn is_lts(&self) -> bool {
        self.lts.is_some()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LtsField {
    Flag(bool),
    Codename(String),
}

fn deserialize_lts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match LtsField::deserialize(deserializer)? {
        LtsField::Flag(false) => Ok(None),
        LtsField::Flag(true) => Err(D::Error::custom("lts must be false or a codename")),
        LtsField::Codename(name) => Ok(Some(name)),
    }
}

fn serialize_lts<S: serde::Serializer>(lts: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match lts {
        Some(name) => serializer.serialize_str(name),
        None => serializer.serialize_bool(false),
    }
}

/// Decode an `index.json` body.
pub fn decode(body: &[u8]) -> Result<Vec<VersionEntry>, IndexError> {
    Ok(serde_json::from_slice(body)?)
}

/// Pick the release named by `selector` from a newest-first table.
///
/// - `latest`: newest release
/// - `lts`: newest release with an LTS codename
/// - `vX` or `vX.Y`: newest release in that line
/// - `vX.Y.Z`: exactly that release
/// - anything else: newest release whose LTS codename matches, ignoring case
pub fn resolve<'t>(table: &'t [VersionEntry], selector: &str) -> Result<&'t VersionEntry, IndexError> {
    let found = match selector {
        "latest" => table.first(),
        "lts" => table.iter().find(|e| e.is_lts()),
        s if s.starts_with('v') => match s.split('.').count() {
            1 | 2 => {
                let prefix = format!("{}.", s);
                table.iter().find(|e| e.version.starts_with(&prefix))
            }
            3 => table.iter().find(|e| e.version == s),
            _ => None,
        },
        name => table.iter().find(|e| {
            e.lts
                .as_deref()
                .map_or(false, |codename| codename.eq_ignore_ascii_case(name))
        }),
    };
    found.ok_or_else(|| IndexError::NoMatch(selector.to_string()))
}
