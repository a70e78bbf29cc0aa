/*
 * dist.rs
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

//! Layout of a Node.js distribution mirror: index URL, per-platform archive names and URLs.
//!
//! Mirrors follow nodejs.org: `<mirror>/index.json` and
//! `<mirror>/<version>/node-<version>-<os>-<arch>.<ext>`.

use std::env::consts;

/// Official distribution root.
pub const DEFAULT_MIRROR: &str = "https://nodejs.org/dist";

/// URL of the release index under `mirror`.
pub fn index_url(mirror: &str) -> String {
    format!("{}/index.json", mirror.trim_end_matches('/'))
}

/// Target platform in Node.js naming (`linux`/`darwin`/`win`, `x64`/`arm64`/...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
}

impl Platform {
    /// Platform of the running host, if Node.js publishes binaries for it.
    pub fn current() -> Option<Self> {
        Self::from_rust(consts::OS, consts::ARCH)
    }

    /// Map Rust's `std::env::consts` names to Node.js names.
    pub fn from_rust(os: &str, arch: &str) -> Option<Self> {
        let os = match os {
            "linux" => "linux",
            "macos" => "darwin",
            "windows" => "win",
            "aix" => "aix",
            _ => return None,
        };
        let arch = match arch {
            "x86_64" => "x64",
            "aarch64" => "arm64",
            "x86" => "x86",
            "arm" => "armv7l",
            "powerpc64" => "ppc64le",
            "s390x" => "s390x",
            _ => return None,
        };
        Some(Self { os, arch })
    }

    /// Archive format published for this platform.
    pub fn archive_extension(&self) -> &'static str {
        if self.os == "win" {
            "zip"
        } else {
            "tar.gz"
        }
    }
}

/// `node-<version>-<os>-<arch>`: the archive stem, also the top-level directory inside it.
pub fn archive_stem(version: &str, platform: Platform) -> String {
    format!("node-{}-{}-{}", version, platform.os, platform.arch)
}

/// Archive file name, stem plus extension.
pub fn archive_file_name(version: &str, platform: Platform) -> String {
    format!(
        "{}.{}",
        archive_stem(version, platform),
        platform.archive_extension()
    )
}

/// Download URL of the archive for `version` on `platform`.
pub fn archive_url(mirror: &str, version: &str, platform: Platform) -> String {
    format!(
        "{}/{}/{}",
        mirror.trim_end_matches('/'),
        version,
        archive_file_name(version, platform)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_url_tolerates_trailing_slash() {
        assert_eq!(index_url(DEFAULT_MIRROR), "https://nodejs.org/dist/index.json");
        assert_eq!(index_url("http://mirror.local/node/"), "http://mirror.local/node/index.json");
    }

    #[test]
    fn platform_names() {
        assert_eq!(
            Platform::from_rust("macos", "aarch64"),
            Some(Platform { os: "darwin", arch: "arm64" })
        );
        assert_eq!(Platform::from_rust("freebsd", "x86_64"), None);
        assert_eq!(Platform::from_rust("linux", "riscv64"), None);
    }

    #[test]
    fn archive_urls() {
        let linux = Platform::from_rust("linux", "x86_64").unwrap();
        assert_eq!(
            archive_url(DEFAULT_MIRROR, "v20.9.0", linux),
            "https://nodejs.org/dist/v20.9.0/node-v20.9.0-linux-x64.tar.gz"
        );
        let win = Platform::from_rust("windows", "x86_64").unwrap();
        assert_eq!(archive_file_name("v20.9.0", win), "node-v20.9.0-win-x64.zip");
    }
}
