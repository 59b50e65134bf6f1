// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dotenv-style env files written by the on-start environment script.
//!
//! Variables read here are injected into every step that runs after the
//! script signals that the file is complete.

use std::collections::BTreeMap;
use std::path::Path;

/// Parse a dotenv-style file into ordered key-value pairs.
/// Returns an empty map if the file doesn't exist.
pub fn read_env_file(path: &Path) -> std::io::Result<BTreeMap<String, String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e),
    };
    Ok(parse_env(&content))
}

/// Parse dotenv content. Accepts an optional `export ` prefix and strips
/// one layer of matching single or double quotes around the value.
pub fn parse_env(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if !key.is_empty() {
            map.insert(key.to_string(), unquote(value).to_string());
        }
    }
    map
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
