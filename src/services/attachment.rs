//! Attachment PDF lookup.
//!
//! The list endpoints only report how many attachments a disclosure has.
//! The download links live on the HTML detail page (`/tr/Bildirim/{id}`),
//! so resolving them costs one extra throttled GET per disclosure.

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, OnceLock};
use url::Url;

use crate::utils::http::ThrottledHttp;

/// Resolves the attachment PDF URL of one disclosure.
///
/// Implementations never fail: anything that goes wrong is `None`.
#[async_trait]
pub trait AttachmentResolver: Send + Sync {
    async fn resolve(&self, announcement_id: &str) -> Option<String>;
}

pub fn detail_page_url(root: &str, announcement_id: &str) -> String {
    format!("{}/tr/Bildirim/{}", root.trim_end_matches('/'), announcement_id)
}

/// Default resolver: fetches the detail page and scans it.
pub struct DetailPageResolver {
    http: Arc<ThrottledHttp>,
    base: Url,
}

impl DetailPageResolver {
    pub fn new(http: Arc<ThrottledHttp>, base: Url) -> Self {
        Self { http, base }
    }
}

#[async_trait]
impl AttachmentResolver for DetailPageResolver {
    async fn resolve(&self, announcement_id: &str) -> Option<String> {
        let url = detail_page_url(self.base.as_str(), announcement_id);
        let html = match self.http.get_text(&url).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("attachment page for {} failed: {}", announcement_id, e);
                return None;
            }
        };

        let link = extract_attachment_link(&html, &self.base);
        match &link {
            Some(href) => log::debug!("attachment for {}: {}", announcement_id, href),
            None => log::debug!("no attachment link on detail page of {}", announcement_id),
        }
        link
    }
}

fn anchor_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("a[href]").expect("anchor selector is valid"))
}

/// "Bildirim Ekleri" section label; Turkish dotted capital İ does not case-fold to i
fn section_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)b[iİ]ld[iİ]r[iİ]m\s+ekler[iİ]").expect("section label regex is valid")
    })
}

fn raw_download_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/api/file/download/[A-Za-z0-9]+").expect("download path regex is valid")
    })
}

/// Whether an `href` points at an attachment document.
pub fn is_document_link(href: &str) -> bool {
    if href.contains("/api/file/download/") {
        return true;
    }
    let path = href.split(['?', '#']).next().unwrap_or("");
    path.to_ascii_lowercase().ends_with(".pdf")
}

fn first_document_link(scope: ElementRef<'_>) -> Option<String> {
    scope
        .select(anchor_selector())
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| is_document_link(href))
        .map(str::to_string)
}

fn absolutize(href: &str, base: &Url) -> Option<String> {
    base.join(href).ok().map(|u| u.to_string())
}

/// Find the first attachment document link in a detail page.
///
/// Search order: anchors around the "Bildirim Ekleri" label, walking
/// outwards; any matching anchor in the page; a bare download path anywhere
/// in the markup (links injected by scripts). Relative links resolve
/// against `base`.
pub fn extract_attachment_link(html: &str, base: &Url) -> Option<String> {
    let document = Html::parse_document(html);

    let label = document.tree.root().descendants().find(|node| {
        node.value()
            .as_text()
            .is_some_and(|text| section_label_re().is_match(text))
    });

    if let Some(label) = label {
        for ancestor in label.ancestors() {
            let Some(scope) = ElementRef::wrap(ancestor) else {
                continue;
            };
            if let Some(href) = first_document_link(scope) {
                return absolutize(&href, base);
            }
        }
    }

    if let Some(href) = first_document_link(document.root_element()) {
        return absolutize(&href, base);
    }

    raw_download_re()
        .find(html)
        .and_then(|m| absolutize(m.as_str(), base))
}
