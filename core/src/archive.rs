/*
 * archive.rs
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

//! Unpacking downloaded release archives.
//!
//! Every release archive holds a single top-level `node-<version>-<os>-<arch>/` directory.
//! `unpack_release` extracts into a staging directory next to the target, then moves that
//! top-level directory into place, so a failed extraction never leaves a half-populated
//! version directory behind.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: invalid zip archive: {source}", path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("{}: archive has no top-level {root}/ directory", path.display())]
    MissingRoot { path: PathBuf, root: String },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Extract `archive` into `dest`: `.zip` by extension, gzip-compressed tar otherwise.
pub fn unpack(archive: &Path, dest: &Path) -> Result<(), ArchiveError> {
    fs::create_dir_all(dest).map_err(io_error(dest))?;
    let file = File::open(archive).map_err(io_error(archive))?;
    if archive.extension().map_or(false, |ext| ext == "zip") {
        let mut zip = zip::ZipArchive::new(file).map_err(|source| ArchiveError::Zip {
            path: archive.to_path_buf(),
            source,
        })?;
        zip.extract(dest).map_err(|source| ArchiveError::Zip {
            path: archive.to_path_buf(),
            source,
        })
    } else {
        let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
        tar.unpack(dest).map_err(io_error(archive))
    }
}

/// Extract `archive` and move its top-level `root` directory to `target`, replacing any
/// leftover directory there.
pub fn unpack_release(archive: &Path, root: &str, target: &Path) -> Result<(), ArchiveError> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = parent.join(format!(".{}.partial", name));
    remove_dir_if_present(&staging)?;

    let result = unpack(archive, &staging).and_then(|()| {
        let extracted = staging.join(root);
        if !extracted.is_dir() {
            return Err(ArchiveError::MissingRoot {
                path: archive.to_path_buf(),
                root: root.to_string(),
            });
        }
        remove_dir_if_present(target)?;
        fs::rename(&extracted, target).map_err(io_error(target))
    });
    let _ = fs::remove_dir_all(&staging);
    if result.is_ok() {
        debug!(archive = %archive.display(), target = %target.display(), "release unpacked");
    }
    result
}

fn remove_dir_if_present(dir: &Path) -> Result<(), ArchiveError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ArchiveError::Io {
            path: dir.to_path_buf(),
            source,
        }),
    }
}
