//! Known-safe domain short-circuit
//!
//! A page on a listed domain (or any subdomain of it) is classified safe
//! without feature extraction.

use crate::utils::url_parts::PageUrl;

#[derive(Debug, Clone, Default)]
pub struct SafeDomainList {
    domains: Vec<String>,
}

impl SafeDomainList {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| normalize(d.as_ref()))
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }

    /// Exact match or `.domain` suffix after stripping a leading `www.`
    pub fn contains_host(&self, host: &str) -> bool {
        let host = normalize(host);
        if host.is_empty() {
            return false;
        }
        self.domains.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .map(|rest| rest.ends_with('.'))
                    .unwrap_or(false)
        })
    }

    pub fn contains(&self, page: &PageUrl) -> bool {
        self.contains_host(page.hostname())
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

fn normalize(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}
