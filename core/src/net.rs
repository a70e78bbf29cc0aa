/*
 * net.rs
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

//! Connection establishment: name resolution, multi-candidate TCP connect, TLS via rustls.
//!
//! A `Transport` is either a plain `TcpStream` or a rustls session over one; the choice is
//! made once per connection. Dropping a `Transport` closes the socket, so every exit path of
//! a request releases it exactly once.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use tracing::{debug, warn};

use crate::protocol::http::{HttpError, Location};

/// Build a root certificate store: platform native certs first, then webpki-roots as fallback.
pub fn build_root_store() -> RootCertStore {
    let mut root_store = RootCertStore::empty();
    match rustls_native_certs::load_native_certs() {
        Ok(certs) => {
            let (added, ignored) = root_store.add_parsable_certificates(certs);
            debug!(added, ignored, "loaded platform trust roots");
        }
        Err(e) => warn!(error = %e, "platform trust store unavailable"),
    }
    if root_store.is_empty() {
        debug!("falling back to bundled webpki roots");
        root_store.roots = webpki_roots::TLS_SERVER_ROOTS.to_vec();
    }
    root_store
}

/// TLS client config shared by every connection of an `HttpClient`: TLS 1.2 minimum,
/// platform roots, no client auth.
pub fn client_tls_config(roots: RootCertStore) -> Arc<ClientConfig> {
    let config = ClientConfig::builder_with_protocol_versions(&[
        &rustls::version::TLS13,
        &rustls::version::TLS12,
    ])
    .with_root_certificates(roots)
    .with_no_client_auth();
    Arc::new(config)
}

/// Byte channel to the origin: plain TCP or TLS over TCP.
pub enum Transport {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Transport {
    pub fn is_secure(&self) -> bool {
        matches!(self, Transport::Tls(_))
    }

    fn tcp(&self) -> &TcpStream {
        match self {
            Transport::Plain(s) => s,
            Transport::Tls(s) => &s.sock,
        }
    }

    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.tcp().peer_addr()
    }
}

impl Read for Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(s) => s.read(buf),
            Transport::Tls(s) => s.read(buf),
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(s) => s.write(buf),
            Transport::Tls(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Transport::Plain(s) => s.flush(),
            Transport::Tls(s) => s.flush(),
        }
    }
}

/// Time limits for one connection. `None` blocks for as long as the OS allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Per candidate address.
    pub connect: Option<Duration>,
    /// Per read or write, including the TLS handshake.
    pub io: Option<Duration>,
}

/// Resolve `host:port` to stream-socket candidates, in resolver order.
pub fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>, HttpError> {
    let candidates: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| HttpError::DnsResolution {
            host: host.to_string(),
            port,
            detail: e.to_string(),
        })?
        .collect();
    if candidates.is_empty() {
        return Err(HttpError::DnsResolution {
            host: host.to_string(),
            port,
            detail: "no addresses".to_string(),
        });
    }
    debug!(host, port, candidates = candidates.len(), "resolved");
    Ok(candidates)
}

/// Try each candidate in order and return the first connected socket. A failed candidate's
/// socket is closed before the next one is tried.
pub fn connect_candidates(
    host: &str,
    port: u16,
    candidates: &[SocketAddr],
    timeout: Option<Duration>,
) -> Result<TcpStream, HttpError> {
    let mut last = String::from("no candidates");
    for addr in candidates {
        let attempt = match timeout {
            Some(t) => TcpStream::connect_timeout(addr, t),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                debug!(%addr, "connected");
                return Ok(stream);
            }
            Err(e) => {
                warn!(%addr, error = %e, "connect failed, trying next candidate");
                last = format!("{}: {}", addr, e);
            }
        }
    }
    Err(HttpError::Connection {
        host: host.to_string(),
        port,
        attempts: candidates.len(),
        last,
    })
}

/// Resolve, connect and (for secure locations) complete the TLS handshake.
pub fn establish(
    location: &Location,
    tls: &Arc<ClientConfig>,
    timeouts: Timeouts,
) -> Result<Transport, HttpError> {
    let candidates = resolve(&location.host, location.port)?;
    let tcp = connect_candidates(&location.host, location.port, &candidates, timeouts.connect)?;
    tcp.set_read_timeout(timeouts.io)
        .and_then(|_| tcp.set_write_timeout(timeouts.io))
        .map_err(|e| HttpError::Connection {
            host: location.host.clone(),
            port: location.port,
            attempts: candidates.len(),
            last: e.to_string(),
        })?;
    if location.is_secure() {
        negotiate_tls(tcp, &location.host, Arc::clone(tls))
    } else {
        Ok(Transport::Plain(tcp))
    }
}

/// Run the TLS handshake over `tcp` with SNI and verification bound to `host`.
/// On failure `tcp` is dropped (closed) before the error is returned.
pub fn negotiate_tls(
    mut tcp: TcpStream,
    host: &str,
    config: Arc<ClientConfig>,
) -> Result<Transport, HttpError> {
    let server_name = ServerName::try_from(host)
        .map_err(|e| HttpError::TlsHandshake {
            host: host.to_string(),
            detail: e.to_string(),
        })?
        .to_owned();
    let mut conn =
        ClientConnection::new(config, server_name).map_err(|e| HttpError::TlsHandshake {
            host: host.to_string(),
            detail: e.to_string(),
        })?;
    while conn.is_handshaking() {
        if let Err(e) = conn.complete_io(&mut tcp) {
            return Err(classify_tls_error(host, e));
        }
    }
    debug!(
        host,
        version = ?conn.protocol_version(),
        "tls handshake complete"
    );
    Ok(Transport::Tls(Box::new(StreamOwned::new(conn, tcp))))
}

/// Certificate problems are verification failures; everything else failed the handshake.
fn classify_tls_error(host: &str, err: io::Error) -> HttpError {
    let verification = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
        .map_or(false, |e| matches!(e, rustls::Error::InvalidCertificate(_)));
    if verification {
        HttpError::TlsVerification {
            host: host.to_string(),
            detail: err.to_string(),
        }
    } else {
        HttpError::TlsHandshake {
            host: host.to_string(),
            detail: err.to_string(),
        }
    }
}
