/*
 * lib.rs
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

//! Core of unvm: a blocking HTTP/1.1 client with optional TLS, the Node.js
//! release index model, distribution URL layout, archive unpacking, the
//! active-version link and persisted configuration.
//!
//! The command-line front end lives in the `unvm` crate and only calls into
//! the modules exported here.

pub mod archive;
pub mod config;
pub mod dist;
pub mod index;
pub mod link;
pub mod net;
pub mod protocol;
