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

//! HTTP client errors. Each variant names the phase that failed (url, resolve, connect,
//! handshake, write, read, parse, redirect) and carries the wire-level detail.

use std::io;

/// Errors from `HttpClient::request` and the parsing helpers it uses.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Malformed URL: missing `://`, empty host or non-numeric port.
    #[error("url parse error: {0}")]
    UrlParse(String),

    /// Name resolution failed or returned no stream candidates.
    #[error("resolve {host}:{port} failed: {detail}")]
    DnsResolution {
        host: String,
        port: u16,
        detail: String,
    },

    /// Every resolved candidate failed to connect. `last` is the final candidate's error.
    #[error("connect to {host}:{port} failed after {attempts} candidate(s): {last}")]
    Connection {
        host: String,
        port: u16,
        attempts: usize,
        last: String,
    },

    #[error("tls handshake with {host} failed: {detail}")]
    TlsHandshake { host: String, detail: String },

    /// The handshake completed far enough to see the peer certificate, which did not verify.
    #[error("tls certificate for {host} rejected: {detail}")]
    TlsVerification { host: String, detail: String },

    #[error("write to transport failed: {0}")]
    TransportWrite(#[source] io::Error),

    #[error("read from transport failed: {0}")]
    TransportRead(#[source] io::Error),

    /// The peer closed before the blank line ending the response head.
    #[error("connection closed after {received} byte(s) of response head")]
    HeaderRead { received: usize },

    #[error("response head larger than {limit} bytes")]
    HeaderTooLarge { limit: usize },

    /// Status line version token was not `HTTP/1.1`.
    #[error("unsupported protocol version in status line {0:?}")]
    InvalidProtocolVersion(String),

    #[error("malformed status line {0:?}")]
    MalformedStatusLine(String),

    #[error("invalid content-length {0:?}")]
    InvalidContentLength(String),

    /// The peer closed before delivering the declared `content-length`.
    #[error("body ended after {received} of {expected} byte(s)")]
    IncompleteBody { expected: u64, received: u64 },

    /// The caller's request body source failed.
    #[error("reading request body failed: {0}")]
    BodyRead(#[source] io::Error),

    /// The caller's response body sink failed.
    #[error("writing response body failed: {0}")]
    BodyWrite(#[source] io::Error),

    #[error("redirect status {status} without a location header")]
    MissingRedirectLocation { status: u16 },

    #[error("gave up after {limit} redirect(s)")]
    TooManyRedirects { limit: usize },
}

impl HttpError {
    pub(crate) fn url(msg: impl Into<String>) -> Self {
        Self::UrlParse(msg.into())
    }
}
