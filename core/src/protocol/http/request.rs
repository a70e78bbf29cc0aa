/*
 * request.rs
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

//! HTTP request: method, location, headers, optional streamed body; and its wire encoding.

use std::fmt;
use std::io::{self, Read, Write};

use tracing::trace;

use crate::protocol::http::{Headers, HttpError, Location};

/// Size of each read from a request body source.
const BODY_CHUNK: usize = 8192;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for `HttpClient::request`.
///
/// The body source is borrowed for the duration of the call. It is read to exhaustion on the
/// first hop; a redirected request reuses the same (by then exhausted) source. No
/// `Content-Length` is computed: declare one in `headers` if the server needs it.
pub struct Request<'a> {
    pub method: Method,
    pub location: Location,
    pub headers: Headers,
    pub body: Option<&'a mut dyn Read>,
}

impl<'a> Request<'a> {
    pub fn new(method: Method, location: Location) -> Self {
        Self {
            method,
            location,
            headers: Headers::new(),
            body: None,
        }
    }

    /// GET request for a URL.
    pub fn get(url: &str) -> Result<Self, HttpError> {
        Ok(Self::new(Method::Get, Location::parse(url)?))
    }

    /// Add or replace a header (name matched case-insensitively).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, source: &'a mut dyn Read) -> Self {
        self.body = Some(source);
        self
    }
}

impl fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("location", &self.location)
            .field("headers", &self.headers)
            .field("body", &self.body.is_some())
            .finish()
    }
}

/// Add the client's default headers where the caller has not set them (case-insensitive).
pub(crate) fn apply_default_headers(headers: &mut Headers, location: &Location, user_agent: &str) {
    headers.insert_default("Host", location.host.as_str());
    headers.insert_default("Connection", "close");
    headers.insert_default("Accept-Encoding", "identity");
    headers.insert_default("User-Agent", user_agent);
}

/// Request line, one line per header and the blank line ending the head.
pub fn encode_head(method: Method, pathname: &str, headers: &Headers) -> Vec<u8> {
    let mut head = Vec::with_capacity(256);
    head.extend_from_slice(method.as_str().as_bytes());
    head.push(b' ');
    head.extend_from_slice(pathname.as_bytes());
    head.extend_from_slice(b" HTTP/1.1\r\n");
    for (name, value) in headers.iter() {
        head.extend_from_slice(name.as_bytes());
        head.extend_from_slice(b": ");
        head.extend_from_slice(value.as_bytes());
        head.extend_from_slice(b"\r\n");
    }
    head.extend_from_slice(b"\r\n");
    head
}

/// Write the request head, then stream the body source (if any) until it is exhausted.
pub fn write_request<W: Write + ?Sized>(
    out: &mut W,
    method: Method,
    pathname: &str,
    headers: &Headers,
    body: Option<&mut (dyn Read + '_)>,
) -> Result<u64, HttpError> {
    let head = encode_head(method, pathname, headers);
    out.write_all(&head).map_err(HttpError::TransportWrite)?;
    let mut sent = 0u64;
    if let Some(body) = body {
        let mut chunk = [0u8; BODY_CHUNK];
        loop {
            let n = match body.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HttpError::BodyRead(e)),
            };
            out.write_all(&chunk[..n]).map_err(HttpError::TransportWrite)?;
            sent += n as u64;
            trace!(sent, "request body chunk written");
        }
    }
    out.flush().map_err(HttpError::TransportWrite)?;
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> Location {
        Location::parse("https://nodejs.org:8443/dist/index.json").unwrap()
    }

    #[test]
    fn defaults_are_injected_and_ordered() {
        let mut headers = Headers::new();
        apply_default_headers(&mut headers, &location(), "unvm/test");
        let head = encode_head(Method::Get, "/dist/index.json", &headers);
        assert_eq!(
            String::from_utf8(head).unwrap(),
            "GET /dist/index.json HTTP/1.1\r\n\
             Accept-Encoding: identity\r\n\
             Connection: close\r\n\
             Host: nodejs.org\r\n\
             User-Agent: unvm/test\r\n\
             \r\n"
        );
    }

    #[test]
    fn caller_headers_win_over_defaults() {
        let mut headers: Headers = [("host", "mirror.local"), ("user-agent", "custom")]
            .into_iter()
            .collect();
        apply_default_headers(&mut headers, &location(), "unvm/test");
        assert_eq!(headers.len(), 4);
        assert_eq!(headers.get("Host"), Some("mirror.local"));
        assert_eq!(headers.get("User-Agent"), Some("custom"));
    }

    #[test]
    fn body_is_streamed_after_head() {
        let mut body: &[u8] = b"{\"name\":\"x\"}";
        let headers: Headers = [("Content-Length", "12")].into_iter().collect();
        let mut out = Vec::new();
        let sent =
            write_request(&mut out, Method::Post, "/upload", &headers, Some(&mut body)).unwrap();
        assert_eq!(sent, 12);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "POST /upload HTTP/1.1\r\nContent-Length: 12\r\n\r\n{\"name\":\"x\"}"
        );
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_transport_write_error() {
        let err = write_request(&mut FailingWriter, Method::Get, "/", &Headers::new(), None)
            .unwrap_err();
        assert!(matches!(err, HttpError::TransportWrite(_)));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk error"))
        }
    }

    #[test]
    fn body_source_failure_is_body_read_error() {
        let mut source = FailingReader;
        let err = write_request(
            &mut io::sink(),
            Method::Put,
            "/",
            &Headers::new(),
            Some(&mut source),
        )
        .unwrap_err();
        assert!(matches!(err, HttpError::BodyRead(_)));
    }
}
