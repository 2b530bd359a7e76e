//! URL helpers
//!
//! `PageUrl` wraps a parsed `url::Url` whose serialization matches what a
//! browser reports as `location.href`. The string measures (entropy, digit
//! ratio, special characters) and the authority prefix work on that exact
//! serialization.

use std::collections::BTreeMap;
use url::{Host, Url};

use crate::models::errors::{AppError, AppResult, ErrorCode};

/// Parsed page URL with the accessors the feature extractor needs
#[derive(Debug, Clone)]
pub struct PageUrl {
    url: Url,
    authority_prefix: String,
}

impl PageUrl {
    /// Parse an absolute page URL
    pub fn parse(input: &str) -> AppResult<Self> {
        let url = Url::parse(input.trim()).map_err(|e| {
            AppError::with_source(
                ErrorCode::InputInvalidUrl,
                format!("Invalid page URL {:?}", input),
                e,
            )
        })?;
        let authority_prefix = authority_prefix(url.as_str()).to_string();
        Ok(Self {
            url,
            authority_prefix,
        })
    }

    /// Full serialized URL
    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    /// Lower-cased hostname, empty when the URL has no host
    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    /// Whether the host is an IPv4 literal
    pub fn is_ipv4_host(&self) -> bool {
        matches!(self.url.host(), Some(Host::Ipv4(_)))
    }

    /// `pathname` followed by `?query` when the query is non-empty
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(q) if !q.is_empty() => format!("{}?{}", self.url.path(), q),
            _ => self.url.path().to_string(),
        }
    }

    /// Authority prefix of the page itself
    pub fn authority_prefix(&self) -> &str {
        &self.authority_prefix
    }

    /// Resolve a reference the way a DOM URL property does: relative to the
    /// page, fragment-free for an empty reference, raw when unparseable.
    pub fn resolve(&self, reference: &str) -> String {
        match self.url.join(reference.trim()) {
            Ok(resolved) => resolved.into(),
            Err(_) => reference.to_string(),
        }
    }

    /// Origin plus pathname with a guaranteed trailing slash
    pub fn stripped(&self) -> String {
        let path = self.url.path();
        let path = if path.is_empty() {
            "/".to_string()
        } else if path.ends_with('/') {
            path.to_string()
        } else {
            format!("{}/", path)
        };
        format!("{}{}", self.url.origin().ascii_serialization(), path)
    }
}

/// Substring up to and including the first `/` that directly follows an
/// ASCII letter. Empty when no such slash exists.
pub fn authority_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    bytes
        .windows(2)
        .position(|w| w[0].is_ascii_alphabetic() && w[1] == b'/')
        .map(|i| &s[..i + 2])
        .unwrap_or("")
}

/// Shannon entropy (bits) over the character frequencies of `s`
pub fn shannon_entropy(s: &str) -> f64 {
    // Ordered map so the float sum is the same on every call
    let mut freq: BTreeMap<char, usize> = BTreeMap::new();
    let mut len = 0usize;
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
        len += 1;
    }
    if len == 0 {
        return 0.0;
    }
    let len = len as f64;
    freq.values()
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Share of ASCII digits among all characters
pub fn digit_ratio(s: &str) -> f64 {
    let len = s.chars().count();
    if len == 0 {
        return 0.0;
    }
    let digits = s.chars().filter(|c| c.is_ascii_digit()).count();
    digits as f64 / len as f64
}

/// Characters outside `[A-Za-z0-9:/.]`
pub fn special_char_count(s: &str) -> usize {
    s.chars()
        .filter(|c| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '/' | '.')))
        .count()
}
