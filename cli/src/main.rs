/*
 * main.rs
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

//! `unvm`: list, resolve, install, activate and remove Node.js releases.
//!
//! Log verbosity comes from `UNVM_LOG` (e.g. `UNVM_LOG=debug`); logs go to stderr.

mod commands;
mod error;
mod table;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use unvm_core::config::{self, Config};
use unvm_core::dist::Platform;
use unvm_core::protocol::http::{ClientConfig, HttpClient};

use crate::commands::{Command, USAGE};
use crate::error::CliError;

fn init_logging() {
    let filter = EnvFilter::try_from_env("UNVM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &[String]) -> Result<(), CliError> {
    let command = Command::parse(args)?;
    if command == Command::Help {
        print!("{}", USAGE);
        return Ok(());
    }

    let data_dir = config::data_dir();
    let mut config = Config::load(&data_dir)?;
    let client = HttpClient::new(ClientConfig::default());
    let table = commands::fetch_index(&client, &config.mirror)?;

    let output = command.execute(&mut config, &client, &table, Platform::current())?;
    print!("{}", output);

    if command.mutates_config() {
        config.save(&data_dir)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("unvm: {}", e);
            ExitCode::FAILURE
        }
    }
}
