//! Flat `key = value` defaults-file parser
//!
//! The file supplies fallback defaults for the connection options; the
//! active configuration is whatever the host resolves. A missing file is
//! not an error, and lines that do not look like `identifier = value`
//! (comments, blanks, garbage) are skipped without complaint.

use std::path::Path;

use indexmap::IndexMap;
use regex::Regex;

use banggoo_lb_core::error::ConfigError;

/// Where the packaging drops the defaults file
pub const DEFAULT_DEFAULTS_PATH: &str =
    "/etc/neutron/services/loadbalancer/banggoo/banggoo_config.ini";

/// Read and parse the defaults file at `path`
///
/// Returns an empty mapping when the file does not exist. Read failures on
/// an existing file do surface as errors.
pub fn parse_defaults_file(path: impl AsRef<Path>) -> Result<IndexMap<String, String>, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(IndexMap::new());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok(parse_defaults(&content))
}

/// Parse defaults-file content into an ordered mapping
///
/// A later duplicate of a key overwrites the earlier entry.
pub fn parse_defaults(content: &str) -> IndexMap<String, String> {
    let line_re = Regex::new(r"^\s*(\w+)\s*=\s*(.*?)\s*$").unwrap();

    let mut defaults = IndexMap::new();
    for line in content.lines() {
        if let Some(caps) = line_re.captures(line) {
            defaults.insert(caps[1].to_string(), caps[2].to_string());
        }
    }
    defaults
}
