/*
 * mod.rs
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

//! HTTP client: blocking HTTP/1.1 over plain TCP or TLS, one connection per request.
//!
//! Design:
//! - `HttpClient::request` drives a full exchange: resolve, connect, optional TLS handshake,
//!   write the request head and streamed body, parse the response head, stream the body into
//!   the caller's sink, then follow redirects on a fresh connection.
//! - Body framing is `content-length` or read-until-close. No keep-alive, no chunked coding,
//!   no compression: every request carries `Connection: close` and `Accept-Encoding: identity`.
//! - Request bodies are any `Read`; response bodies go to any `Write`. The client never looks
//!   at body content.

mod error;
mod headers;
mod location;
mod request;
mod response;

pub mod client;
pub mod h1;

pub use client::{ClientConfig, HttpClient, DEFAULT_USER_AGENT};
pub use error::HttpError;
pub use headers::Headers;
pub use location::{Location, Scheme};
pub use request::{Method, Request};
pub use response::Response;
