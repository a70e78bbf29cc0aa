/*
 * headers.rs
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

//! Header map with unique keys and case-insensitive lookup.
//!
//! Keys are stored as given, so caller casing survives onto the wire. Iteration is ordered by
//! stored key, which makes request serialization deterministic.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing entry whose name matches case-insensitively.
    /// Returns the replaced value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let previous = self.remove(&name);
        self.entries.insert(name, value.into());
        previous
    }

    /// Set a header only if no entry matches case-insensitively. Returns true if inserted.
    pub fn insert_default(&mut self, name: &str, value: impl Into<String>) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.insert(name.to_string(), value.into());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find_key(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let key = self.find_key(name)?;
        self.entries.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let key = self.find_key(name)?.to_string();
        self.entries.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn find_key(&self, name: &str) -> Option<&str> {
        // Exact and lowercase spellings are the common cases.
        if let Some((k, _)) = self.entries.get_key_value(name) {
            return Some(k.as_str());
        }
        self.entries
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let mut h = Headers::new();
        h.insert("Content-Type", "application/json");
        assert!(h.contains("content-type"));
        assert_eq!(h.get("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn default_does_not_duplicate_lowercase_caller_header() {
        let mut h = Headers::new();
        h.insert("host", "mirror.local");
        assert!(!h.insert_default("Host", "nodejs.org"));
        assert_eq!(h.len(), 1);
        assert_eq!(h.get("Host"), Some("mirror.local"));
        assert_eq!(h.iter().next(), Some(("host", "mirror.local")));
    }

    #[test]
    fn insert_replaces_differently_cased_key() {
        let mut h = Headers::new();
        h.insert("accept", "*/*");
        assert_eq!(h.insert("Accept", "application/json"), Some("*/*".to_string()));
        assert_eq!(h.len(), 1);
        assert_eq!(h.iter().next(), Some(("Accept", "application/json")));
    }

    #[test]
    fn iteration_is_key_ordered() {
        let h: Headers = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let keys: Vec<_> = h.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }
}
