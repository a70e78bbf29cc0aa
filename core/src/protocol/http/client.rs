/*
 * client.rs
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

//! HTTP client: resolve, connect, exchange one request/response, follow redirects.
//!
//! Every hop opens a fresh connection and drops it before the next hop starts. Redirects are
//! followed in a loop bounded by `ClientConfig::max_redirects`.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::net::{self, Timeouts};
use crate::protocol::http::h1::{self, Framing, ResponseHead};
use crate::protocol::http::request::{apply_default_headers, write_request};
use crate::protocol::http::{Headers, HttpError, Method, Request, Response};

/// `User-Agent` sent when the caller does not set one.
pub const DEFAULT_USER_AGENT: &str = concat!("unvm/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const IO_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_REDIRECTS: usize = 10;

/// Client settings, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Redirects followed before `TooManyRedirects`. Zero disables following.
    pub max_redirects: usize,
    /// Per candidate address. `None` waits as long as the OS does.
    pub connect_timeout: Option<Duration>,
    /// Per socket read/write. `None` blocks indefinitely.
    pub io_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: MAX_REDIRECTS,
            connect_timeout: Some(CONNECT_TIMEOUT),
            io_timeout: Some(IO_TIMEOUT),
        }
    }
}

/// Blocking HTTP/1.1 client.
///
/// Holds the TLS trust configuration, built once, and no per-request state. Every request
/// opens its own connection, so one client can serve any number of requests, sequentially or
/// from several threads at once through a shared reference.
pub struct HttpClient {
    config: ClientConfig,
    tls: Arc<rustls::ClientConfig>,
}

impl HttpClient {
    /// Client trusting the platform roots (bundled Mozilla roots if the platform has none).
    pub fn new(config: ClientConfig) -> Self {
        let tls = net::client_tls_config(net::build_root_store());
        Self::with_tls_config(config, tls)
    }

    /// Client with a caller-built rustls config (custom roots, test CAs).
    pub fn with_tls_config(config: ClientConfig, tls: Arc<rustls::ClientConfig>) -> Self {
        Self { config, tls }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: self.config.connect_timeout,
            io: self.config.io_timeout,
        }
    }

    /// Send `request` and stream the final response body into `sink`.
    ///
    /// Bodies of redirect responses are discarded; only the final body reaches `sink`.
    /// Default headers (`Host`, `Connection`, `Accept-Encoding`, `User-Agent`) are added per
    /// hop where `request.headers` lacks them, so `Host` follows cross-host redirects.
    pub fn request(
        &self,
        request: &mut Request<'_>,
        sink: &mut dyn Write,
    ) -> Result<Response, HttpError> {
        let mut location = request.location.clone();
        let mut redirects = 0;
        loop {
            let mut headers = request.headers.clone();
            apply_default_headers(&mut headers, &location, &self.config.user_agent);
            debug!(method = %request.method, url = %location, "sending request");

            let mut transport = net::establish(&location, &self.tls, self.timeouts())?;
            let outcome = exchange(
                &mut transport,
                request.method,
                &location.pathname,
                &headers,
                request.body.as_deref_mut(),
                sink,
            );
            drop(transport);

            match outcome? {
                Exchange::Complete { head, body_len } => {
                    debug!(status = head.status_code, body_len, "response complete");
                    return Ok(Response {
                        status_code: head.status_code,
                        status_message: head.status_message,
                        headers: head.headers,
                        url: location,
                        body_len,
                    });
                }
                Exchange::Redirect { status, target } => {
                    if redirects >= self.config.max_redirects {
                        return Err(HttpError::TooManyRedirects {
                            limit: self.config.max_redirects,
                        });
                    }
                    redirects += 1;
                    let next = location.redirect(&target)?;
                    debug!(status, from = %location, to = %next, redirects, "following redirect");
                    location = next;
                }
            }
        }
    }

    /// GET `url` into `sink`.
    pub fn get(&self, url: &str, sink: &mut dyn Write) -> Result<Response, HttpError> {
        let mut request = Request::get(url)?;
        self.request(&mut request, sink)
    }
}

/// Result of a single request/response exchange.
#[derive(Debug)]
pub enum Exchange {
    /// Non-redirect response; its body went to the sink.
    Complete { head: ResponseHead, body_len: u64 },
    /// 3xx response with its `location` value; its body was drained and dropped.
    Redirect { status: u16, target: String },
}

/// Run one exchange over an established stream: write the request fully, then read the
/// response head and body.
pub fn exchange<S: Read + Write + ?Sized>(
    stream: &mut S,
    method: Method,
    pathname: &str,
    headers: &Headers,
    body: Option<&mut (dyn Read + '_)>,
    sink: &mut dyn Write,
) -> Result<Exchange, HttpError> {
    write_request(stream, method, pathname, headers, body)?;
    let (head, prefetched) = h1::read_head(stream)?;
    let head = h1::parse_head(&head)?;
    let framing = Framing::of(method, &head)?;
    if head.is_redirect() {
        let target = head
            .headers
            .get("location")
            .map(str::to_string)
            .ok_or(HttpError::MissingRedirectLocation {
                status: head.status_code,
            })?;
        h1::copy_body(stream, &prefetched, framing, &mut io::sink())?;
        return Ok(Exchange::Redirect {
            status: head.status_code,
            target,
        });
    }
    let body_len = h1::copy_body(stream, &prefetched, framing, sink)?;
    Ok(Exchange::Complete { head, body_len })
}
