/*
 * location.rs
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

//! Request target: scheme, host, port and pathname parsed from `scheme://host[:port][/path]`,
//! plus resolution of redirect targets against the current location.

use std::fmt;
use std::str::FromStr;

use crate::protocol::http::HttpError;

/// Transport selected by the URL scheme. `https` is secure; every other scheme is plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Plain,
    Secure,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Plain => 80,
            Scheme::Secure => 443,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Plain => "http",
            Scheme::Secure => "https",
        }
    }
}

/// Parsed request target. `pathname` always starts with `/` and keeps any query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub scheme: Scheme,
    /// Host name or IP literal, without brackets for IPv6.
    pub host: String,
    pub port: u16,
    pub pathname: String,
}

impl Location {
    /// Parse `scheme://host[:port][/path]`. A missing port takes the scheme default and a
    /// missing path becomes `/`.
    pub fn parse(url: &str) -> Result<Self, HttpError> {
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| HttpError::url(format!("{:?} has no scheme separator", url)))?;
        let scheme = if scheme == "https" {
            Scheme::Secure
        } else {
            Scheme::Plain
        };
        let (authority, pathname) = match rest.find('/') {
            Some(slash) => (&rest[..slash], rest[slash..].to_string()),
            None => (rest, "/".to_string()),
        };
        let (host, port) = split_authority(authority, scheme)?;
        if host.is_empty() {
            return Err(HttpError::url(format!("{:?} has an empty host", url)));
        }
        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
            pathname,
        })
    }

    pub fn is_secure(&self) -> bool {
        self.scheme == Scheme::Secure
    }

    /// Resolve a `location` header value against this location.
    ///
    /// Absolute URLs (containing `://`) replace everything; values starting with `/` replace
    /// the pathname; a query (`?...`) replaces the current query; a fragment (`#...`) leaves
    /// the pathname alone since fragments never go on the wire; anything else is appended to
    /// the current pathname as a further segment.
    pub fn redirect(&self, target: &str) -> Result<Location, HttpError> {
        let target = target.trim();
        if target.contains("://") {
            return Location::parse(target);
        }
        let mut next = self.clone();
        if target.starts_with('/') {
            next.pathname = target.to_string();
        } else if target.starts_with('?') {
            let path = self.pathname.split('?').next().unwrap_or_default();
            next.pathname = format!("{}{}", path, target);
        } else if target.starts_with('#') {
            // pathname unchanged
        } else if self.pathname.ends_with('/') {
            next.pathname = format!("{}{}", self.pathname, target);
        } else {
            next.pathname = format!("{}/{}", self.pathname, target);
        }
        Ok(next)
    }

    /// `host[:port]` as written in an authority, with the port omitted when it is the default.
    pub fn authority(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == self.scheme.default_port() {
            host
        } else {
            format!("{}:{}", host, self.port)
        }
    }
}

/// Split `host[:port]` (or `[v6]:port`) and apply the scheme's default port.
fn split_authority(authority: &str, scheme: Scheme) -> Result<(&str, u16), HttpError> {
    let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
        let close = bracketed
            .find(']')
            .ok_or_else(|| HttpError::url(format!("unterminated IPv6 literal in {:?}", authority)))?;
        let after = &bracketed[close + 1..];
        let port = match after.strip_prefix(':') {
            Some(p) => Some(p),
            None if after.is_empty() => None,
            None => {
                return Err(HttpError::url(format!(
                    "unexpected {:?} after IPv6 literal",
                    after
                )))
            }
        };
        (&bracketed[..close], port)
    } else {
        match authority.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        }
    };
    let port = match port {
        Some(p) => p
            .parse::<u16>()
            .map_err(|e| HttpError::url(format!("invalid port {:?}: {}", p, e)))?,
        None => scheme.default_port(),
    };
    Ok((host, port))
}

impl FromStr for Location {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme.as_str(), self.authority(), self.pathname)
    }
}
