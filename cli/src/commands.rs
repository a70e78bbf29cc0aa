/*
 * commands.rs
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

//! Command parsing and the commands themselves. Commands return their output as text; the
//! caller prints it.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;
use unvm_core::archive;
use unvm_core::config::Config;
use unvm_core::dist::{self, Platform};
use unvm_core::index::{self, VersionEntry};
use unvm_core::link;
use unvm_core::protocol::http::HttpClient;

use crate::error::CliError;
use crate::table::Table;

pub const USAGE: &str = "\
unvm

<version>: latest, lts, v<uint>[.<uint>[.<uint>]], <lts-name>

\t- install, i <version>  - download and install node package
\t- remove, r <version>   - remove node package
\t- use, u <version>|none - set node package as active, or inactive by using 'none'
\t- resolve <version>     - show which release <version> selects
\t- list, l [available]   - list installed or available packages
\t- ls                    - short for `list` or `l`
\t- la                    - short for `list available` or `l available`
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List { available: bool },
    Resolve(String),
    Install(String),
    Remove(String),
    Use(String),
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let Some((operation, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };
        match operation.as_str() {
            "help" | "-h" | "--help" => Ok(Command::Help),
            "list" | "l" => match rest {
                [] => Ok(Command::List { available: false }),
                [modifier] if modifier == "available" => Ok(Command::List { available: true }),
                [modifier] => Err(CliError::usage(format!(
                    "invalid list modifier '{}'",
                    modifier
                ))),
                _ => Err(argument_count()),
            },
            "ls" => no_arguments(rest).map(|_| Command::List { available: false }),
            "la" => no_arguments(rest).map(|_| Command::List { available: true }),
            "resolve" => single_argument(rest).map(Command::Resolve),
            "install" | "i" => single_argument(rest).map(Command::Install),
            "remove" | "r" => single_argument(rest).map(Command::Remove),
            "use" | "u" => single_argument(rest).map(Command::Use),
            other => Err(CliError::usage(format!("undefined operation '{}'", other))),
        }
    }

    /// Whether the command changes the persisted config.
    pub fn mutates_config(&self) -> bool {
        matches!(
            self,
            Command::Install(_) | Command::Remove(_) | Command::Use(_)
        )
    }

    pub fn execute(
        &self,
        config: &mut Config,
        client: &HttpClient,
        table: &[VersionEntry],
        platform: Option<Platform>,
    ) -> Result<String, CliError> {
        match self {
            Command::Help => Ok(USAGE.to_string()),
            Command::List { available } => Ok(list(config, table, *available)),
            Command::Resolve(selector) => resolve(table, selector),
            Command::Install(selector) => install(config, client, table, selector, platform),
            Command::Remove(selector) => remove(config, table, selector),
            Command::Use(selector) => activate(config, table, selector),
        }
    }
}

fn argument_count() -> CliError {
    CliError::usage("invalid argument count")
}

fn no_arguments(rest: &[String]) -> Result<(), CliError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(argument_count())
    }
}

fn single_argument(rest: &[String]) -> Result<String, CliError> {
    match rest {
        [arg] => Ok(arg.clone()),
        _ => Err(argument_count()),
    }
}

/// Download and decode the release index from `mirror`.
pub fn fetch_index(client: &HttpClient, mirror: &str) -> Result<Vec<VersionEntry>, CliError> {
    let url = dist::index_url(mirror);
    let mut body = Vec::new();
    let response = client.get(&url, &mut body)?;
    if !response.is_success() {
        return Err(CliError::Status {
            url,
            status: response.status_code,
            message: response.status_message,
        });
    }
    let table = index::decode(&body)?;
    info!(bytes = body.len(), releases = table.len(), "fetched release index");
    Ok(table)
}

pub fn list(config: &Config, table: &[VersionEntry], available: bool) -> String {
    let mut out = Table::new(&[
        ("Lts", true),
        ("Version", true),
        ("Npm", true),
        ("Date", true),
        ("Modules", false),
    ]);
    for entry in table {
        if available || config.is_installed(&entry.version) {
            out.push(vec![
                entry.lts.clone().unwrap_or_default(),
                entry.version.clone(),
                entry.npm.clone().unwrap_or_default(),
                entry.date.clone(),
                entry.modules.clone().unwrap_or_default(),
            ]);
        }
    }
    if out.is_empty() {
        return "no elements to list.\n".to_string();
    }
    out.to_string()
}

pub fn resolve(table: &[VersionEntry], selector: &str) -> Result<String, CliError> {
    let entry = index::resolve(table, selector)?;
    Ok(match &entry.lts {
        Some(codename) => format!("{} ({})\n", entry.version, codename),
        None => format!("{}\n", entry.version),
    })
}

/// Download the release archive, unpack it into `<install-directory>/<version>/` and record
/// the version as installed. The downloaded archive is deleted either way.
pub fn install(
    config: &mut Config,
    client: &HttpClient,
    table: &[VersionEntry],
    selector: &str,
    platform: Option<Platform>,
) -> Result<String, CliError> {
    let entry = index::resolve(table, selector)?;
    if config.is_installed(&entry.version) {
        return Ok(format!("version '{}' is already installed.\n", selector));
    }
    let platform = platform.ok_or(CliError::UnsupportedPlatform)?;

    let parent = config.install_directory.clone();
    fs::create_dir_all(&parent).map_err(|source| CliError::Io {
        path: parent.clone(),
        source,
    })?;
    let archive_path = parent.join(dist::archive_file_name(&entry.version, platform));
    let url = dist::archive_url(&config.mirror, &entry.version, platform);
    info!(%url, path = %archive_path.display(), "downloading");

    let dir = config.version_dir(&entry.version);
    let result = download(client, &url, &archive_path).and_then(|()| {
        let root = dist::archive_stem(&entry.version, platform);
        archive::unpack_release(&archive_path, &root, &dir).map_err(CliError::from)
    });
    let _ = fs::remove_file(&archive_path);
    result?;

    config.installed.insert(entry.version.clone());
    Ok(format!("installed {} to {}\n", entry.version, dir.display()))
}

fn download(client: &HttpClient, url: &str, path: &Path) -> Result<(), CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut sink = BufWriter::new(file);
    let response = client.get(url, &mut sink)?;
    if !response.is_success() {
        return Err(CliError::Status {
            url: url.to_string(),
            status: response.status_code,
            message: response.status_message,
        });
    }
    sink.flush().map_err(io_error)
}

/// Delete an installed version. The active version cannot be removed.
pub fn remove(config: &mut Config, table: &[VersionEntry], selector: &str) -> Result<String, CliError> {
    let entry = index::resolve(table, selector)?;
    if !config.is_installed(&entry.version) {
        return Ok(format!("version '{}' is not installed.\n", selector));
    }
    if config.is_active(&entry.version) {
        return Err(CliError::usage(format!(
            "version '{}' is still in use.",
            selector
        )));
    }
    let dir = config.version_dir(&entry.version);
    match fs::remove_dir_all(&dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(CliError::Io { path: dir, source }),
    }
    config.installed.remove(&entry.version);
    Ok(format!("removed {}\n", entry.version))
}

fn link_error(path: &Path) -> impl FnOnce(io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Point the active link at an installed version, or drop it with `none`.
pub fn activate(config: &mut Config, table: &[VersionEntry], selector: &str) -> Result<String, CliError> {
    if selector == "none" {
        let Some(active) = config.active.clone() else {
            return Ok("node is already inactive.\n".to_string());
        };
        link::remove(&config.active_directory).map_err(link_error(&config.active_directory))?;
        config.active = None;
        return Ok(format!("deactivated {}\n", active));
    }

    let entry = index::resolve(table, selector)?;
    if !config.is_installed(&entry.version) {
        return Err(CliError::usage(format!(
            "version '{}' is not installed.",
            selector
        )));
    }
    if config.is_active(&entry.version) {
        return Ok(format!(
            "version '{}' is already installed and active.\n",
            selector
        ));
    }
    // Also clears a link left behind without a recorded active version.
    link::remove(&config.active_directory).map_err(link_error(&config.active_directory))?;
    config.active = None;
    let target = config.version_dir(&entry.version);
    link::create(&config.active_directory, &target).map_err(link_error(&config.active_directory))?;
    config.active = Some(entry.version.clone());
    Ok(format!(
        "now using {}\nadd the active version to your PATH:\n  {}\n",
        entry.version,
        link::path_hint(&config.active_directory)
    ))
}
