//! Modal dialog view model
//!
//! Everything the renderer needs to draw the verdict dialog, derived from
//! the display status and the page URL. Unknown statuses render as safe.

use serde::Serialize;

use crate::models::types::{DisplayPayload, Verdict};
use crate::utils::url_parts::PageUrl;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub status: String,
    pub theme_class: &'static str,
    pub title_lines: [&'static str; 2],
    pub subtitle: &'static str,
    pub mark: &'static str,
    pub hero_image: &'static str,
    /// Origin and pathname with a trailing `/`
    pub url_chip: String,
}

impl ModalView {
    pub fn new(status: &str, page_url: &str) -> Self {
        let verdict = Verdict::from_status(status).unwrap_or(Verdict::Safe);
        let (theme_class, title_lines, subtitle, mark, hero_image) = match verdict {
            Verdict::Safe => (
                "pk-safe",
                ["No Issues", "Detected"],
                "This website is safe",
                "✓",
                "safe.png",
            ),
            Verdict::Suspicious => (
                "pk-suspicious",
                ["Suspicious", "Activity"],
                "Proceed with caution.",
                "!",
                "sus.png",
            ),
            Verdict::Malicious => (
                "pk-malicious",
                ["Malicious Site", "Detected"],
                "This website may be unsafe.",
                "✖",
                "mal.png",
            ),
        };

        Self {
            status: verdict.status().to_string(),
            theme_class,
            title_lines,
            subtitle,
            mark,
            hero_image,
            url_chip: url_chip(page_url),
        }
    }

    pub fn from_payload(payload: &DisplayPayload, page_url: &str) -> Self {
        Self::new(&payload.status, page_url)
    }
}

fn url_chip(page_url: &str) -> String {
    PageUrl::parse(page_url)
        .map(|page| page.stripped())
        .unwrap_or_else(|_| page_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malicious_view() {
        let view = ModalView::new("malicious", "https://bad.example/login?x=1#f");
        assert_eq!(view.theme_class, "pk-malicious");
        assert_eq!(view.title_lines, ["Malicious Site", "Detected"]);
        assert_eq!(view.mark, "✖");
        assert_eq!(view.hero_image, "mal.png");
        assert_eq!(view.url_chip, "https://bad.example/login/");
    }

    #[test]
    fn test_suspicious_view() {
        let view = ModalView::new("suspicious", "https://example.com/");
        assert_eq!(view.theme_class, "pk-suspicious");
        assert_eq!(view.subtitle, "Proceed with caution.");
        assert_eq!(view.hero_image, "sus.png");
        assert_eq!(view.url_chip, "https://example.com/");
    }

    #[test]
    fn test_unknown_status_renders_safe() {
        let view = ModalView::new("weird", "https://example.com/a/");
        assert_eq!(view.status, "safe");
        assert_eq!(view.theme_class, "pk-safe");
        assert_eq!(view.mark, "✓");
        assert_eq!(view.url_chip, "https://example.com/a/");
    }

    #[test]
    fn test_unparseable_url_chip() {
        let view = ModalView::new("safe", "not a url");
        assert_eq!(view.url_chip, "not a url");
    }
}
