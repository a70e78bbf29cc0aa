/*
 * http_client.rs
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

//! End-to-end tests of `HttpClient` against loopback servers running on helper threads.
//!
//! The live test fetches the real Node.js index and is ignored by default:
//!   cargo test -p unvm_core --test http_client -- --ignored

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};

use unvm_core::protocol::http::{ClientConfig, HttpClient, HttpError, Location, Method, Request};

/// What a loopback server saw of one request.
struct Captured {
    head: String,
    body: Vec<u8>,
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn read_request(conn: &mut impl Read) -> Captured {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let end = loop {
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = conn.read(&mut buf).unwrap();
        assert!(n > 0, "client closed before finishing the request head");
        data.extend_from_slice(&buf[..n]);
    };
    let head = String::from_utf8(data[..end].to_vec()).unwrap();
    let mut body = data[end..].to_vec();
    let expected = content_length(&head);
    while body.len() < expected {
        let n = conn.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    Captured { head, body }
}

/// Serve one canned response per connection, in order, then stop.
fn serve(responses: Vec<Vec<u8>>) -> (SocketAddr, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for response in responses {
            let (mut conn, _) = listener.accept().unwrap();
            seen.push(read_request(&mut conn));
            conn.write_all(&response).unwrap();
        }
        seen
    });
    (addr, handle)
}

fn client() -> HttpClient {
    HttpClient::new(ClientConfig::default())
}

#[test]
fn get_with_content_length() {
    let (addr, server) = serve(vec![
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nX-Extra: yes\r\n\r\nhello".to_vec(),
    ]);
    let mut body = Vec::new();
    let response = client()
        .get(&format!("http://{}/dist/index.json", addr), &mut body)
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.status_message, "OK");
    assert_eq!(response.header("x-extra"), Some("yes"));
    assert_eq!(response.body_len, 5);
    assert_eq!(body, b"hello");

    let seen = server.join().unwrap();
    let head = &seen[0].head;
    assert!(head.starts_with("GET /dist/index.json HTTP/1.1\r\n"));
    assert!(head.contains("Host: 127.0.0.1\r\n"));
    assert!(head.contains("Connection: close\r\n"));
    assert!(head.contains("Accept-Encoding: identity\r\n"));
    assert!(head.contains("User-Agent: unvm/"));
}

#[test]
fn body_without_length_reads_until_close() {
    let (addr, server) = serve(vec![
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nstreamed until close".to_vec(),
    ]);
    let mut body = Vec::new();
    let response = client().get(&format!("http://{}/", addr), &mut body).unwrap();
    server.join().unwrap();
    assert_eq!(body, b"streamed until close");
    assert_eq!(response.body_len, body.len() as u64);
}

#[test]
fn error_status_is_a_response() {
    let (addr, server) = serve(vec![
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nnot found".to_vec(),
    ]);
    let mut body = Vec::new();
    let response = client().get(&format!("http://{}/missing", addr), &mut body).unwrap();
    server.join().unwrap();
    assert_eq!(response.status_code, 404);
    assert!(response.is_client_error());
    assert_eq!(body, b"not found");
}

#[test]
fn relative_redirect_keeps_redirect_body_out_of_sink() {
    let (addr, server) = serve(vec![
        b"HTTP/1.1 302 Found\r\nLocation: /v2\r\nContent-Length: 8\r\n\r\nignored!".to_vec(),
        b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\ndone".to_vec(),
    ]);
    let mut body = Vec::new();
    let response = client().get(&format!("http://{}/v1", addr), &mut body).unwrap();

    assert_eq!(body, b"done");
    assert_eq!(response.url.pathname, "/v2");
    let seen = server.join().unwrap();
    assert!(seen[0].head.starts_with("GET /v1 HTTP/1.1\r\n"));
    assert!(seen[1].head.starts_with("GET /v2 HTTP/1.1\r\n"));
}

#[test]
fn absolute_redirect_to_another_server() {
    let (target, second) = serve(vec![
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nmoved".to_vec(),
    ]);
    let redirect = format!(
        "HTTP/1.1 301 Moved Permanently\r\nLocation: http://{}/final\r\nContent-Length: 0\r\n\r\n",
        target
    );
    let (origin, first) = serve(vec![redirect.into_bytes()]);

    let mut body = Vec::new();
    let response = client().get(&format!("http://{}/start", origin), &mut body).unwrap();
    first.join().unwrap();
    let seen = second.join().unwrap();

    assert_eq!(body, b"moved");
    assert_eq!(response.url.port, target.port());
    assert_eq!(response.url.pathname, "/final");
    assert!(seen[0].head.starts_with("GET /final HTTP/1.1\r\n"));
}

#[test]
fn redirect_loop_is_bounded() {
    let hop = b"HTTP/1.1 302 Found\r\nLocation: /again\r\nContent-Length: 0\r\n\r\n".to_vec();
    let (addr, server) = serve(vec![hop.clone(), hop.clone(), hop]);
    let client = HttpClient::new(ClientConfig {
        max_redirects: 2,
        ..ClientConfig::default()
    });
    let mut body = Vec::new();
    let err = client.get(&format!("http://{}/", addr), &mut body).unwrap_err();
    assert!(matches!(err, HttpError::TooManyRedirects { limit: 2 }));
    assert_eq!(server.join().unwrap().len(), 3);
    assert!(body.is_empty());
}

#[test]
fn redirect_without_location_fails() {
    let (addr, server) = serve(vec![
        b"HTTP/1.1 301 Moved Permanently\r\nContent-Length: 0\r\n\r\n".to_vec(),
    ]);
    let err = client()
        .get(&format!("http://{}/", addr), &mut io::sink())
        .unwrap_err();
    server.join().unwrap();
    assert!(matches!(
        err,
        HttpError::MissingRedirectLocation { status: 301 }
    ));
}

#[test]
fn caller_host_header_is_not_duplicated() {
    let (addr, server) = serve(vec![b"HTTP/1.1 204 No Content\r\n\r\n".to_vec()]);
    let location = Location::parse(&format!("http://{}/", addr)).unwrap();
    let mut request = Request::new(Method::Get, location)
        .header("host", "mirror.local")
        .header("User-Agent", "custom/1.0");
    let response = client().request(&mut request, &mut io::sink()).unwrap();
    assert_eq!(response.status_code, 204);
    assert_eq!(response.body_len, 0);

    let head = server.join().unwrap().remove(0).head;
    let lower = head.to_ascii_lowercase();
    assert_eq!(lower.matches("\r\nhost:").count(), 1);
    assert!(head.contains("host: mirror.local\r\n"));
    assert!(head.contains("User-Agent: custom/1.0\r\n"));
}

#[test]
fn post_streams_request_body() {
    let (addr, server) = serve(vec![b"HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n".to_vec()]);
    let payload = vec![b'x'; 20_000];
    let mut source = &payload[..];
    let location = Location::parse(&format!("http://{}/upload", addr)).unwrap();
    let mut request = Request::new(Method::Post, location)
        .header("Content-Length", payload.len().to_string())
        .body(&mut source);
    let response = client().request(&mut request, &mut io::sink()).unwrap();
    assert_eq!(response.status_code, 201);

    let seen = server.join().unwrap();
    assert!(seen[0].head.starts_with("POST /upload HTTP/1.1\r\n"));
    assert_eq!(seen[0].body, payload);
}

#[test]
fn truncated_body_is_an_error() {
    let (addr, server) = serve(vec![b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc".to_vec()]);
    let err = client()
        .get(&format!("http://{}/", addr), &mut io::sink())
        .unwrap_err();
    server.join().unwrap();
    assert!(matches!(
        err,
        HttpError::IncompleteBody {
            expected: 10,
            received: 3
        }
    ));
}

#[test]
fn http_1_0_response_is_rejected() {
    let (addr, server) = serve(vec![b"HTTP/1.0 200 OK\r\nContent-Length: 0\r\n\r\n".to_vec()]);
    let err = client()
        .get(&format!("http://{}/", addr), &mut io::sink())
        .unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, HttpError::InvalidProtocolVersion(_)));
}

#[test]
fn refused_connection_reports_attempts() {
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let err = client()
        .get(&format!("http://{}/", addr), &mut io::sink())
        .unwrap_err();
    assert!(matches!(err, HttpError::Connection { attempts: 1, .. }));
}

#[test]
fn tls_to_plain_server_fails_handshake() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = conn.read(&mut buf);
        let _ = conn.write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n");
    });
    let err = client()
        .get(&format!("https://127.0.0.1:{}/", addr.port()), &mut io::sink())
        .unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, HttpError::TlsHandshake { .. }), "{:?}", err);
}

#[test]
fn one_client_serves_concurrent_requests() {
    let (first, first_server) = serve(vec![
        b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\none".to_vec(),
    ]);
    let (second, second_server) = serve(vec![
        b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\ntwo".to_vec(),
    ]);
    let client = client();
    let (a, b) = thread::scope(|scope| {
        let a = scope.spawn(|| {
            let mut body = Vec::new();
            client.get(&format!("http://{}/", first), &mut body).unwrap();
            body
        });
        let b = scope.spawn(|| {
            let mut body = Vec::new();
            client.get(&format!("http://{}/", second), &mut body).unwrap();
            body
        });
        (a.join().unwrap(), b.join().unwrap())
    });
    first_server.join().unwrap();
    second_server.join().unwrap();
    assert_eq!(a, b"one");
    assert_eq!(b, b"two");
}

#[test]
#[ignore]
fn live_node_index() {
    let mut body = Vec::new();
    let response = client()
        .get("https://nodejs.org/dist/index.json", &mut body)
        .unwrap();
    assert!(response.is_success());
    let table = unvm_core::index::decode(&body).unwrap();
    assert!(!table.is_empty());
    assert!(unvm_core::index::resolve(&table, "lts").unwrap().lts.is_some());
}
