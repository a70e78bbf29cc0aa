/*
 * parser.rs
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

//! HTTP/1.1 response reader: head up to the blank line, status line, headers, body framing.
//!
//! Reads are in fixed-size chunks, so the read that completes the head usually carries the
//! first body bytes too. `read_head` hands those back as the prefetched remainder and
//! `copy_body` delivers them before reading any further.

use std::cmp;
use std::io::{self, Read, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::protocol::http::{Headers, HttpError, Method};

/// Upper bound on the response head (status line + headers + blank line).
pub const MAX_HEAD_LEN: usize = 64 * 1024;

const READ_CHUNK: usize = 8192;
const BOUNDARY: &[u8] = b"\r\n\r\n";

/// Status line and headers of a response. Header names are lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status_code: u16,
    pub status_message: String,
    pub headers: Headers,
}

impl ResponseHead {
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }
}

/// How many body bytes belong to the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Exactly this many bytes (from `content-length`, or 0 for bodiless responses).
    Length(u64),
    /// Everything until the peer closes the connection.
    UntilClose,
}

impl Framing {
    /// Framing for a response to `method`. HEAD, 1xx, 204 and 304 responses carry no body.
    pub fn of(method: Method, head: &ResponseHead) -> Result<Self, HttpError> {
        let code = head.status_code;
        if method == Method::Head || code < 200 || code == 204 || code == 304 {
            return Ok(Framing::Length(0));
        }
        match head.headers.get("content-length") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Framing::Length)
                .map_err(|_| HttpError::InvalidContentLength(value.to_string())),
            None => Ok(Framing::UntilClose),
        }
    }
}

/// Read until the blank line ending the head. Returns the head (without the boundary) and
/// any body bytes that arrived in the same reads.
pub fn read_head<R: Read + ?Sized>(stream: &mut R) -> Result<(BytesMut, BytesMut), HttpError> {
    let mut buf = BytesMut::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) => return Err(HttpError::HeaderRead { received: buf.len() }),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(HttpError::TransportRead(e)),
        };
        // The boundary may straddle two reads.
        let from = buf.len().saturating_sub(BOUNDARY.len() - 1);
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_boundary(&buf[from..]) {
            let end = from + pos;
            let prefetched = buf.split_off(end + BOUNDARY.len());
            buf.truncate(end);
            return Ok((buf, prefetched));
        }
        if buf.len() > MAX_HEAD_LEN {
            return Err(HttpError::HeaderTooLarge {
                limit: MAX_HEAD_LEN,
            });
        }
    }
}

fn find_boundary(buf: &[u8]) -> Option<usize> {
    buf.windows(BOUNDARY.len()).position(|w| w == BOUNDARY)
}

/// Parse the head returned by `read_head`: status line, then `name: value` lines up to an
/// empty line. Lines without a colon are skipped; a repeated name keeps the last value.
pub fn parse_head(head: &[u8]) -> Result<ResponseHead, HttpError> {
    let text = String::from_utf8_lossy(head);
    let mut lines = text.split("\r\n");
    let (status_code, status_message) = parse_status_line(lines.next().unwrap_or_default())?;
    let mut headers = Headers::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim());
        }
    }
    Ok(ResponseHead {
        status_code,
        status_message,
        headers,
    })
}

/// `HTTP/1.1 <code> <message>`, tokens separated by any run of whitespace. Only `HTTP/1.1`
/// is accepted; the message may be empty and keeps its inner spacing.
pub fn parse_status_line(line: &str) -> Result<(u16, String), HttpError> {
    let (version, rest) = next_token(line);
    if version != "HTTP/1.1" {
        return Err(HttpError::InvalidProtocolVersion(line.to_string()));
    }
    let (code, message) = next_token(rest);
    let code = code
        .parse::<u16>()
        .ok()
        .filter(|c| (100..=599).contains(c))
        .ok_or_else(|| HttpError::MalformedStatusLine(line.to_string()))?;
    Ok((code, message.trim().to_string()))
}

/// Split off the first whitespace-delimited token.
fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => s.split_at(end),
        None => (s, ""),
    }
}

/// Deliver the body to `sink`: prefetched bytes first, then further reads until the framing
/// is satisfied. Returns the number of bytes written to the sink.
///
/// With `Length`, reads never ask for more than the bytes still owed, and an early close is
/// `IncompleteBody`. With `UntilClose`, a clean close or a TLS close without `close_notify`
/// both end the body.
pub fn copy_body<R: Read + ?Sized>(
    stream: &mut R,
    prefetched: &[u8],
    framing: Framing,
    sink: &mut dyn Write,
) -> Result<u64, HttpError> {
    let mut chunk = [0u8; READ_CHUNK];
    let received = match framing {
        Framing::Length(expected) => {
            let first = cmp::min(prefetched.len() as u64, expected) as usize;
            sink.write_all(&prefetched[..first])
                .map_err(HttpError::BodyWrite)?;
            let mut received = first as u64;
            while received < expected {
                let want = cmp::min(expected - received, READ_CHUNK as u64) as usize;
                let n = match stream.read(&mut chunk[..want]) {
                    Ok(0) => return Err(HttpError::IncompleteBody { expected, received }),
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                        return Err(HttpError::IncompleteBody { expected, received })
                    }
                    Err(e) => return Err(HttpError::TransportRead(e)),
                };
                sink.write_all(&chunk[..n]).map_err(HttpError::BodyWrite)?;
                received += n as u64;
                trace!(received, expected, "body chunk");
            }
            received
        }
        Framing::UntilClose => {
            sink.write_all(prefetched).map_err(HttpError::BodyWrite)?;
            let mut received = prefetched.len() as u64;
            loop {
                let n = match stream.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                    Err(e) => return Err(HttpError::TransportRead(e)),
                };
                sink.write_all(&chunk[..n]).map_err(HttpError::BodyWrite)?;
                received += n as u64;
                trace!(received, "body chunk");
            }
            received
        }
    };
    sink.flush().map_err(HttpError::BodyWrite)?;
    Ok(received)
}
