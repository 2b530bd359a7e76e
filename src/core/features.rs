//! Feature Extraction Module
//!
//! Builds the 22-slot `FeatureVector` for one page visit from the page URL
//! and a `DocumentView`. Every feature is a pure function of those two
//! inputs, so extraction order does not matter.
//!
//! Layout:
//! - 0-15: categorical signals in {-1, 0, 1} (safe / ambiguous / malicious)
//! - 16-21: raw measurements (entropy, ratio, count, flag, depth, length)
//!
//! Missing DOM content is a valid signal, not an error: a page with no
//! images, anchors or scripts gets the safe value for the matching ratio.

use tracing::debug;

use crate::models::errors::AppResult;
use crate::models::types::{Feature, FeatureVector};
use crate::providers::document::{DocumentView, Element};
use crate::utils::constants::{
    ANCHOR_RATIO_TIERS, FEATURE_COUNT, IMAGE_RATIO_TIERS, MULTI_DOT_PARTS,
    SCRIPT_LINK_RATIO_TIERS, SUSPICIOUS_TLDS, TINY_URL_LENGTH, URL_LENGTH_MEDIUM,
    URL_LENGTH_SHORT,
};
use crate::utils::url_parts::{
    authority_prefix, digit_ratio, shannon_entropy, special_char_count, PageUrl,
};

const SAFE: f64 = -1.0;
const AMBIGUOUS: f64 = 0.0;
const MALICIOUS: f64 = 1.0;

fn flag(hit: bool) -> f64 {
    if hit {
        MALICIOUS
    } else {
        SAFE
    }
}

/// Map a cross-domain ratio onto {-1, 0, 1}: below `low` is safe, up to and
/// including `high` is ambiguous, above is malicious.
fn ratio_tier(ratio: f64, (low, high): (f64, f64)) -> f64 {
    if ratio < low {
        SAFE
    } else if ratio <= high {
        AMBIGUOUS
    } else {
        MALICIOUS
    }
}

/// Extracts features for one page
pub struct FeatureExtractor<'a, D: DocumentView + ?Sized> {
    page: &'a PageUrl,
    doc: &'a D,
}

impl<'a, D: DocumentView + ?Sized> FeatureExtractor<'a, D> {
    pub fn new(page: &'a PageUrl, doc: &'a D) -> Self {
        Self { page, doc }
    }

    /// Compute all 22 features in vector order
    pub fn extract(&self) -> AppResult<FeatureVector> {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = self.compute(feature);
        }
        debug!("🔬 Features for {}: {:?}", self.page.href(), values);
        FeatureVector::from_array(values)
    }

    /// Compute a single feature
    pub fn compute(&self, feature: Feature) -> f64 {
        match feature {
            Feature::IpLiteralHost => flag(self.page.is_ipv4_host()),
            Feature::UrlLengthTier => self.url_length_tier(),
            // Fires for URLs longer than the threshold, despite the name
            Feature::TinyUrl => flag(self.href().len() > TINY_URL_LENGTH),
            Feature::AtSymbol => flag(self.href().contains('@')),
            Feature::RedirectChain => self.redirect_chain(),
            Feature::HyphenInHost => flag(self.page.authority_prefix().contains('-')),
            Feature::MultiDotAuthority => {
                flag(self.page.authority_prefix().split('.').count() >= MULTI_DOT_PARTS)
            }
            Feature::FaviconMismatch => self.favicon_mismatch(),
            Feature::IllegalHttps => self.illegal_https(),
            Feature::ImageCrossDomain => self.cross_domain_tier(&["img"], IMAGE_RATIO_TIERS),
            Feature::AnchorCrossDomain => self.cross_domain_tier(&["a"], ANCHOR_RATIO_TIERS),
            Feature::ScriptLinkCrossDomain => {
                self.cross_domain_tier(&["script", "link"], SCRIPT_LINK_RATIO_TIERS)
            }
            Feature::FormAction => self.form_action(),
            Feature::Mailto => flag(self.any_anchor(|a| {
                a.attr("href").map(|h| h.starts_with("mailto")).unwrap_or(false)
            })),
            Feature::StatusBarTamper => self.status_bar_tamper(),
            Feature::Iframe => flag(!self.doc.elements("iframe").is_empty()),
            Feature::UrlEntropy => shannon_entropy(self.href()),
            Feature::DigitRatio => digit_ratio(self.href()),
            Feature::SpecialChars => special_char_count(self.href()) as f64,
            Feature::SuspiciousTld => self.suspicious_tld(),
            Feature::SubdomainDepth => self.page.hostname().split('.').count() as f64 - 2.0,
            Feature::PathLength => self.page.path_and_query().chars().count() as f64,
        }
    }

    fn href(&self) -> &str {
        self.page.href()
    }

    fn url_length_tier(&self) -> f64 {
        let len = self.href().len();
        if len < URL_LENGTH_SHORT {
            SAFE
        } else if len <= URL_LENGTH_MEDIUM {
            AMBIGUOUS
        } else {
            MALICIOUS
        }
    }

    /// Safe only when the scheme's `//` sits where it should and no second
    /// `//` follows it.
    fn redirect_chain(&self) -> f64 {
        let href = self.href();
        let first = href.find("//");
        let clean = |offset: usize| first == Some(offset - 2) && !href[offset..].contains("//");
        if href.starts_with("http:") && clean(7) {
            SAFE
        } else if href.starts_with("https:") && clean(8) {
            SAFE
        } else {
            MALICIOUS
        }
    }

    fn favicon_mismatch(&self) -> f64 {
        match self.doc.favicon() {
            Some(icon) => {
                let resolved = self.resource_url("link", icon);
                flag(authority_prefix(&resolved) != self.page.authority_prefix())
            }
            None => SAFE,
        }
    }

    /// Literal "https" after the first `//` counts as a safe signal.
    /// Without any `//` the whole URL is searched.
    fn illegal_https(&self) -> f64 {
        let href = self.href();
        let tail = href.find("//").map(|i| &href[i..]).unwrap_or(href);
        if tail.contains("https") {
            SAFE
        } else {
            MALICIOUS
        }
    }

    fn suspicious_tld(&self) -> f64 {
        let tld = self.page.hostname().rsplit('.').next().unwrap_or("");
        flag(SUSPICIOUS_TLDS.contains(&tld))
    }

    fn any_anchor<F: Fn(&Element) -> bool>(&self, pred: F) -> bool {
        self.doc.elements("a").into_iter().any(pred)
    }

    fn status_bar_tamper(&self) -> f64 {
        let hover = self.any_anchor(|a| {
            a.attr("onmouseover")
                .map(|v| v.contains("window.status"))
                .unwrap_or(false)
        });
        let click = self.any_anchor(|a| {
            a.attr("onclick")
                .map(|v| v.contains("location.href"))
                .unwrap_or(false)
        });
        flag(hover && click)
    }

    fn form_action(&self) -> f64 {
        let forms = self.doc.elements("form");
        if !forms.iter().any(|f| f.has_attr("action")) {
            return SAFE;
        }
        if self.same_domain_count("form") != forms.len() {
            return AMBIGUOUS;
        }
        if forms.iter().any(|f| f.attr("action") == Some("")) {
            MALICIOUS
        } else {
            SAFE
        }
    }

    fn cross_domain_tier(&self, tags: &[&str], tiers: (f64, f64)) -> f64 {
        match self.cross_domain_ratio(tags) {
            Some(ratio) => ratio_tier(ratio, tiers),
            None => SAFE,
        }
    }

    /// Share of elements whose resource lives outside the page's authority
    /// prefix. `None` when there are no such elements.
    pub fn cross_domain_ratio(&self, tags: &[&str]) -> Option<f64> {
        let total: usize = tags.iter().map(|t| self.doc.elements(t).len()).sum();
        if total == 0 {
            return None;
        }
        let identical: usize = tags.iter().map(|t| self.same_domain_count(t)).sum();
        Some((total - identical) as f64 / total as f64)
    }

    /// Elements of `tag` whose resolved resource shares the page's authority
    /// prefix. Empty resources never match.
    pub fn same_domain_count(&self, tag: &str) -> usize {
        let main = self.page.authority_prefix();
        self.doc
            .elements(tag)
            .into_iter()
            .filter(|el| {
                let resource = self.resource_url(tag, el);
                if resource.is_empty() {
                    return false;
                }
                let prefix = authority_prefix(&resource);
                if tag == "a" && prefix.is_empty() {
                    return false;
                }
                prefix == main
            })
            .count()
    }

    /// Resolved resource URL as the DOM property would report it
    fn resource_url(&self, tag: &str, el: &Element) -> String {
        let attr = match tag {
            "img" | "script" => "src",
            "form" => "action",
            _ => "href",
        };
        match el.attr(attr) {
            Some(raw) => self.page.resolve(raw),
            // A form without an action submits to the page itself
            None if tag == "form" => self.page.href().to_string(),
            None => String::new(),
        }
    }
}

/// Extract the full vector for an already-parsed page
pub fn extract_features<D: DocumentView + ?Sized>(
    page: &PageUrl,
    doc: &D,
) -> AppResult<FeatureVector> {
    FeatureExtractor::new(page, doc).extract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::document::PageSnapshot;

    fn page(url: &str) -> PageUrl {
        PageUrl::parse(url).unwrap()
    }

    fn value(url: &str, doc: &PageSnapshot, feature: Feature) -> f64 {
        let p = page(url);
        FeatureExtractor::new(&p, doc).compute(feature)
    }

    fn empty() -> PageSnapshot {
        PageSnapshot::new()
    }

    #[test]
    fn test_ip_literal_host() {
        assert_eq!(value("http://192.168.1.10/login", &empty(), Feature::IpLiteralHost), 1.0);
        assert_eq!(value("https://example.com/", &empty(), Feature::IpLiteralHost), -1.0);
    }

    #[test]
    fn test_url_length_tiers() {
        // 53 chars
        let short = format!("https://example.com/{}", "a".repeat(33));
        assert_eq!(short.len(), 53);
        assert_eq!(value(&short, &empty(), Feature::UrlLengthTier), -1.0);

        let medium = format!("https://example.com/{}", "a".repeat(55));
        assert_eq!(medium.len(), 75);
        assert_eq!(value(&medium, &empty(), Feature::UrlLengthTier), 0.0);

        let long = format!("https://example.com/{}", "a".repeat(56));
        assert_eq!(value(&long, &empty(), Feature::UrlLengthTier), 1.0);
    }

    #[test]
    fn test_tiny_url_fires_on_length() {
        // "https://example.com/" is exactly 20 characters
        assert_eq!(value("https://example.com/", &empty(), Feature::TinyUrl), -1.0);
        assert_eq!(value("https://example.com/a", &empty(), Feature::TinyUrl), 1.0);
    }

    #[test]
    fn test_at_symbol() {
        assert_eq!(value("https://example.com/u@x", &empty(), Feature::AtSymbol), 1.0);
        assert_eq!(value("https://example.com/", &empty(), Feature::AtSymbol), -1.0);
    }

    #[test]
    fn test_redirect_chain() {
        assert_eq!(value("https://example.com/a", &empty(), Feature::RedirectChain), -1.0);
        assert_eq!(value("http://example.com/a", &empty(), Feature::RedirectChain), -1.0);
        assert_eq!(
            value("https://example.com/r?u=//evil.com", &empty(), Feature::RedirectChain),
            1.0
        );
        assert_eq!(value("ftp://example.com/", &empty(), Feature::RedirectChain), 1.0);
    }

    #[test]
    fn test_hyphen_and_dots_in_authority() {
        assert_eq!(value("https://my-bank.com/", &empty(), Feature::HyphenInHost), 1.0);
        assert_eq!(value("https://bank.com/a-b", &empty(), Feature::HyphenInHost), -1.0);
        assert_eq!(
            value("https://a.b.c.d.example.com/", &empty(), Feature::MultiDotAuthority),
            1.0
        );
        assert_eq!(value("https://a.b.example.com/", &empty(), Feature::MultiDotAuthority), -1.0);
    }

    #[test]
    fn test_favicon() {
        let url = "https://example.com/";
        assert_eq!(value(url, &empty(), Feature::FaviconMismatch), -1.0);

        let local = empty().with(
            Element::new("link")
                .attr_set("rel", "shortcut icon")
                .attr_set("href", "/favicon.ico"),
        );
        assert_eq!(value(url, &local, Feature::FaviconMismatch), -1.0);

        let foreign = empty().with(
            Element::new("link")
                .attr_set("rel", "shortcut icon")
                .attr_set("href", "https://cdn.other.net/favicon.ico"),
        );
        assert_eq!(value(url, &foreign, Feature::FaviconMismatch), 1.0);

        let shouting = empty().with(
            Element::new("link")
                .attr_set("rel", "SHORTCUT ICON")
                .attr_set("href", "https://cdn.other.net/f.ico"),
        );
        assert_eq!(value(url, &shouting, Feature::FaviconMismatch), 1.0);
    }

    #[test]
    fn test_uppercase_attribute_names_from_json() {
        let url = "https://example.com/";
        let doc: PageSnapshot = serde_json::from_str(
            r#"{"elements":[
                {"tag":"A","attributes":{"HREF":"mailto:x@y.z"}},
                {"tag":"img","attributes":{"SRC":"https://cdn.other.net/a.png"}},
                {"tag":"form","attributes":{"ACTION":""}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(value(url, &doc, Feature::Mailto), 1.0);
        assert_eq!(value(url, &doc, Feature::ImageCrossDomain), 1.0);
        assert_eq!(value(url, &doc, Feature::FormAction), 1.0);
    }

    #[test]
    fn test_illegal_https_marker() {
        assert_eq!(value("https://example.com/", &empty(), Feature::IllegalHttps), 1.0);
        assert_eq!(
            value("http://example.com/https-login", &empty(), Feature::IllegalHttps),
            -1.0
        );
    }

    #[test]
    fn test_zero_denominators_are_safe() {
        let url = "https://example.com/";
        assert_eq!(value(url, &empty(), Feature::ImageCrossDomain), -1.0);
        assert_eq!(value(url, &empty(), Feature::AnchorCrossDomain), -1.0);
        assert_eq!(value(url, &empty(), Feature::ScriptLinkCrossDomain), -1.0);
    }

    #[test]
    fn test_image_ratio_tiers() {
        let url = "https://example.com/";
        let img = |src: &str| Element::new("img").attr_set("src", src);

        // 1 of 5 foreign = 0.2 < 0.22
        let mut doc = empty();
        for _ in 0..4 {
            doc.push(img("/local.png"));
        }
        doc.push(img("https://cdn.other.net/x.png"));
        assert_eq!(value(url, &doc, Feature::ImageCrossDomain), -1.0);

        // 1 of 2 foreign = 0.5
        let doc = empty().with(img("a.png")).with(img("https://cdn.other.net/x.png"));
        assert_eq!(value(url, &doc, Feature::ImageCrossDomain), 0.0);

        // all foreign
        let doc = empty().with(img("https://cdn.other.net/x.png"));
        assert_eq!(value(url, &doc, Feature::ImageCrossDomain), 1.0);
    }

    #[test]
    fn test_anchor_without_href_counts_as_foreign() {
        let url = "https://example.com/";
        let doc = empty()
            .with(Element::new("a").attr_set("href", "/about"))
            .with(Element::new("a"));
        let p = page(url);
        let ex = FeatureExtractor::new(&p, &doc);
        assert_eq!(ex.cross_domain_ratio(&["a"]), Some(0.5));
        assert_eq!(ex.compute(Feature::AnchorCrossDomain), 0.0);
    }

    #[test]
    fn test_inline_scripts_count_as_foreign() {
        let url = "https://example.com/";
        let doc = empty()
            .with(Element::new("script"))
            .with(Element::new("link").attr_set("href", "/style.css"));
        let p = page(url);
        let ex = FeatureExtractor::new(&p, &doc);
        assert_eq!(ex.cross_domain_ratio(&["script", "link"]), Some(0.5));
    }

    #[test]
    fn test_form_action() {
        let url = "https://example.com/login";
        let form = |action: Option<&str>| match action {
            Some(a) => Element::new("form").attr_set("action", a),
            None => Element::new("form"),
        };

        assert_eq!(value(url, &empty(), Feature::FormAction), -1.0);
        assert_eq!(value(url, &empty().with(form(None)), Feature::FormAction), -1.0);
        assert_eq!(
            value(url, &empty().with(form(Some("https://collector.evil/steal"))), Feature::FormAction),
            0.0
        );
        assert_eq!(value(url, &empty().with(form(Some(""))), Feature::FormAction), 1.0);
        assert_eq!(value(url, &empty().with(form(Some("/session"))), Feature::FormAction), -1.0);
    }

    #[test]
    fn test_mailto_status_bar_iframe() {
        let url = "https://example.com/";
        let doc = empty().with(Element::new("a").attr_set("href", "mailto:help@example.com"));
        assert_eq!(value(url, &doc, Feature::Mailto), 1.0);
        assert_eq!(value(url, &empty(), Feature::Mailto), -1.0);

        let hover_only = empty().with(
            Element::new("a").attr_set("onmouseover", "window.status='x'"),
        );
        assert_eq!(value(url, &hover_only, Feature::StatusBarTamper), -1.0);
        let both = hover_only
            .clone()
            .with(Element::new("a").attr_set("onclick", "location.href='https://evil'"));
        assert_eq!(value(url, &both, Feature::StatusBarTamper), 1.0);

        let frame = empty().with(Element::new("iframe"));
        assert_eq!(value(url, &frame, Feature::Iframe), 1.0);
        assert_eq!(value(url, &empty(), Feature::Iframe), -1.0);
    }

    #[test]
    fn test_continuous_features() {
        let url = "http://a1.b2.c3.example.tk/p?q=123";
        let p = page(url);
        let doc = empty();
        let ex = FeatureExtractor::new(&p, &doc);
        assert_eq!(ex.compute(Feature::SuspiciousTld), 1.0);
        assert_eq!(ex.compute(Feature::SubdomainDepth), 3.0);
        assert_eq!(ex.compute(Feature::PathLength), "/p?q=123".len() as f64);
        assert_eq!(ex.compute(Feature::SpecialChars), 2.0);
        assert!((ex.compute(Feature::DigitRatio) - 6.0 / url.len() as f64).abs() < 1e-12);
        assert!(ex.compute(Feature::UrlEntropy) > 0.0);

        let plain = page("https://example.com/");
        let ex = FeatureExtractor::new(&plain, &doc);
        assert_eq!(ex.compute(Feature::SuspiciousTld), -1.0);
        assert_eq!(ex.compute(Feature::SubdomainDepth), 0.0);
        assert_eq!(ex.compute(Feature::PathLength), 1.0);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let p = page("https://shop.example.com/cart?id=77");
        let doc = empty()
            .with(Element::new("img").attr_set("src", "https://img.cdn.net/a.png"))
            .with(Element::new("a").attr_set("href", "/home"));
        let first = extract_features(&p, &doc).unwrap();
        assert_eq!(first.len(), 22);
        for _ in 0..50 {
            let again = extract_features(&p, &doc).unwrap();
            let bits: Vec<u64> = again.as_slice().iter().map(|v| v.to_bits()).collect();
            let expected: Vec<u64> = first.as_slice().iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits, expected);
        }
    }
}
