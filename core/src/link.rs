/*
 * link.rs
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

//! The active-version link: a directory symlink (a directory junction target on Windows)
//! from the config's active directory to one installed version.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Point `link` at the directory `target`. `target` must be a directory and `link` must not
/// exist yet.
pub fn create(link: &Path, target: &Path) -> io::Result<()> {
    if !target.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", target.display()),
        ));
    }
    if fs::symlink_metadata(link).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", link.display()),
        ));
    }
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)?;
    }
    symlink_dir(target, link)?;
    debug!(link = %link.display(), target = %target.display(), "linked");
    Ok(())
}

/// Remove `link`. A missing link is not an error; anything that is not a link is refused.
pub fn remove(link: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(link) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if !meta.file_type().is_symlink() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a link", link.display()),
        ));
    }
    remove_symlink_dir(link)?;
    debug!(link = %link.display(), "unlinked");
    Ok(())
}

/// Where the executables of the active version live.
pub fn bin_dir(active: &Path) -> PathBuf {
    if cfg!(windows) {
        active.to_path_buf()
    } else {
        active.join("bin")
    }
}

/// Shell line that puts the active version on `PATH`.
pub fn path_hint(active: &Path) -> String {
    let bin = bin_dir(active);
    if cfg!(windows) {
        format!("set PATH=%PATH%;{}", bin.display())
    } else {
        format!("export PATH=\"$PATH:{}\"", bin.display())
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(unix)]
fn remove_symlink_dir(link: &Path) -> io::Result<()> {
    fs::remove_file(link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(windows)]
fn remove_symlink_dir(link: &Path) -> io::Result<()> {
    fs::remove_dir(link)
}

#[cfg(not(any(unix, windows)))]
fn symlink_dir(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "directory links are not supported on this platform",
    ))
}

#[cfg(not(any(unix, windows)))]
fn remove_symlink_dir(_link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "directory links are not supported on this platform",
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch_dir() -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "unvm-link-test-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn create_then_remove() {
        let dir = scratch_dir();
        let target = dir.join("version").join("v20.9.0");
        fs::create_dir_all(target.join("bin")).unwrap();
        fs::write(target.join("bin/node"), b"node").unwrap();
        let link = dir.join("active");

        create(&link, &target).unwrap();
        assert_eq!(fs::read(link.join("bin/node")).unwrap(), b"node");
        assert_eq!(fs::read_link(&link).unwrap(), target);

        remove(&link).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(target.join("bin/node").exists());
        remove(&link).unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn create_refuses_existing_link_and_missing_target() {
        let dir = scratch_dir();
        let target = dir.join("v20.9.0");
        let link = dir.join("active");
        assert_eq!(
            create(&link, &target).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        fs::create_dir_all(&target).unwrap();
        create(&link, &target).unwrap();
        assert_eq!(
            create(&link, &target).unwrap_err().kind(),
            io::ErrorKind::AlreadyExists
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn remove_refuses_a_real_directory() {
        let dir = scratch_dir();
        let active = dir.join("active");
        fs::create_dir_all(&active).unwrap();
        assert_eq!(remove(&active).unwrap_err().kind(), io::ErrorKind::InvalidInput);
        assert!(active.is_dir());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn path_hint_names_bin_dir() {
        assert_eq!(
            path_hint(Path::new("/home/u/.config/unvm/active")),
            "export PATH=\"$PATH:/home/u/.config/unvm/active/bin\""
        );
    }
}
