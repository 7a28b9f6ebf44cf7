//! Minimal `.env` file loading.
//!
//! Values from a `.env` file fill in connection settings that are absent
//! from both the command line and the process environment; they never
//! override variables that are already set.

use std::fs;
use std::path::Path;

/// Parsed contents of a `.env` file. Missing or unreadable files yield an
/// empty set, matching the optional-dotenv behavior of the demo.
pub struct EnvFile {
    entries: Vec<(String, String)>,
}

impl EnvFile {
    /// Load `.env` from the current working directory, if present.
    pub fn load_default() -> Self {
        Self::load(Path::new(".env"))
    }

    /// Load a specific `.env` file, if present.
    pub fn load(path: &Path) -> Self {
        let entries = fs::read_to_string(path)
            .map(|content| parse(&content))
            .unwrap_or_default();
        Self { entries }
    }

    /// Look up a variable. The first occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn parse(content: &str) -> Vec<(String, String)> {
    content.lines().filter_map(parse_line).collect()
}

/// Parse one `KEY=VALUE` line. Blank lines, comments, and malformed lines
/// yield `None`; an optional `export ` prefix and surrounding quotes are
/// stripped.
fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_owned(), unquote(value.trim()).to_owned()))
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
