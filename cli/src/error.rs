/*
 * error.rs
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

//! Command-line errors.

use unvm_core::archive::ArchiveError;
use unvm_core::config::ConfigError;
use unvm_core::index::IndexError;
use unvm_core::protocol::http::HttpError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("GET {url} returned {status} {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("no Node.js binaries are published for this platform")]
    UnsupportedPlatform,

    #[error("{}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }
}
