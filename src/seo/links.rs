//! Anchor classification
//!
//! | href | Classification |
//! |------|----------------|
//! | starts with `/` | Internal |
//! | starts with the page's `scheme://host[:port]` | Internal |
//! | any other href starting with `http` | External |
//! | anything else (`mailto:`, `tel:`, `#frag`, `page.html`, `javascript:`) | Unclassified |
//!
//! Unclassified links are counted in neither bucket.

use crate::seo::document::Document;

/// Classification of a single anchor href
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
    Unclassified,
}

/// Internal and external anchor counts for a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
}

/// Classifies an href relative to the page origin
///
/// `origin` is the `scheme://host[:port]` prefix of the page, or `None` when
/// the page URL could not be parsed (only root-relative links are then
/// internal). Matching is a plain prefix test on the raw attribute value.
pub fn classify_link(href: &str, origin: Option<&str>) -> LinkKind {
    if href.starts_with('/') {
        return LinkKind::Internal;
    }

    if let Some(origin) = origin {
        if href.starts_with(origin) {
            return LinkKind::Internal;
        }
    }

    if href.starts_with("http") {
        LinkKind::External
    } else {
        LinkKind::Unclassified
    }
}

/// Counts internal and external `<a href>` links in a document
pub fn count_links(document: &Document, origin: Option<&str>) -> LinkCounts {
    let mut counts = LinkCounts::default();

    for anchor in document.find_all("a") {
        let Some(href) = anchor.attr("href") else {
            continue;
        };

        match classify_link(href, origin) {
            LinkKind::Internal => counts.internal += 1,
            LinkKind::External => counts.external += 1,
            LinkKind::Unclassified => {}
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Option<&str> = Some("http://example.com");

    #[test]
    fn test_root_relative_is_internal() {
        assert_eq!(classify_link("/about", ORIGIN), LinkKind::Internal);
        assert_eq!(classify_link("/", ORIGIN), LinkKind::Internal);
    }

    #[test]
    fn test_same_origin_is_internal() {
        assert_eq!(
            classify_link("http://example.com/x", ORIGIN),
            LinkKind::Internal
        );
    }

    #[test]
    fn test_other_host_is_external() {
        assert_eq!(
            classify_link("https://other.com", ORIGIN),
            LinkKind::External
        );
    }

    #[test]
    fn test_scheme_mismatch_is_external() {
        // Same host but https while the page was fetched over http
        assert_eq!(
            classify_link("https://example.com/x", ORIGIN),
            LinkKind::External
        );
    }

    #[test]
    fn test_non_http_links_are_unclassified() {
        for href in [
            "mailto:a@b.com",
            "tel:+123456",
            "#section",
            "page.html",
            "javascript:void(0)",
            "",
        ] {
            assert_eq!(
                classify_link(href, ORIGIN),
                LinkKind::Unclassified,
                "href {:?}",
                href
            );
        }
    }

    #[test]
    fn test_without_origin_only_root_relative_is_internal() {
        assert_eq!(classify_link("/a", None), LinkKind::Internal);
        assert_eq!(
            classify_link("http://example.com/x", None),
            LinkKind::External
        );
    }

    #[test]
    fn test_count_links() {
        let doc = Document::parse(
            r#"<a href="/about">A</a>
               <a href="http://example.com/x">B</a>
               <a href="https://other.com">C</a>
               <a href="mailto:a@b.com">D</a>
               <a name="anchor">no href</a>"#,
        );
        let counts = count_links(&doc, ORIGIN);
        assert_eq!(counts.internal, 2);
        assert_eq!(counts.external, 1);
    }
}
