//! SEO scoring engine
//!
//! Maps raw HTML plus the measured response time into a [`Metrics`] value.
//! Scoring starts at 100 and subtracts fixed penalties:
//!
//! | Check | Condition | Penalty |
//! |-------|-----------|---------|
//! | Title presence | no `<title>` or empty text | 20 |
//! | Title length | present but < 10 or > 60 characters | 10 |
//! | Meta description | no `<meta name="description">` or empty `content` | 20 |
//! | H1 count | no `<h1>` | 20 |
//! | H1 count | more than one `<h1>` | 10 |
//! | Image alt text | 5 per image with absent or blank `alt`, at most 20 | 0..=20 |
//! | Load time | response time above 2000 ms | 15 |
//!
//! The result is floored at 0. The engine performs no I/O and keeps no
//! state, so the same input always yields the same metrics.

mod document;
mod links;
mod metrics;

pub use document::{Document, Element};
pub use links::{classify_link, count_links, LinkCounts, LinkKind};
pub use metrics::{LoadTimeStatus, Metrics, TitleCheck, MISSING};

use crate::url::origin_prefix;

pub const BASE_SCORE: u32 = 100;

pub const TITLE_MISSING_PENALTY: u32 = 20;
pub const TITLE_LENGTH_PENALTY: u32 = 10;
pub const META_DESCRIPTION_PENALTY: u32 = 20;
pub const NO_H1_PENALTY: u32 = 20;
pub const MULTIPLE_H1_PENALTY: u32 = 10;
pub const IMAGE_ALT_PENALTY: u32 = 5;
pub const IMAGE_ALT_PENALTY_CAP: u32 = 20;
pub const SLOW_LOAD_PENALTY: u32 = 15;

pub const TITLE_MIN_CHARS: usize = 10;
pub const TITLE_MAX_CHARS: usize = 60;

/// Responses slower than this many milliseconds fail the load time check
pub const LOAD_TIME_THRESHOLD_MS: u64 = 2000;

/// Scores raw HTML
///
/// Empty input short-circuits to [`Metrics::worst_case`] without parsing.
///
/// # Arguments
///
/// * `html` - Raw page markup
/// * `response_time_ms` - Time taken to fetch the page
/// * `page_url` - Absolute URL of the page, used to tell internal links from external ones
///
/// # Example
///
/// ```
/// use sitesage::seo::score;
///
/// let html = r#"<html><head><title>This is a Perfect Title for SEO</title>
///     <meta name="description" content="A page about things."></head>
///     <body><h1>Heading</h1></body></html>"#;
/// let metrics = score(html, 500, "http://example.com");
/// assert_eq!(metrics.score, 100);
/// ```
pub fn score(html: &str, response_time_ms: u64, page_url: &str) -> Metrics {
    if html.is_empty() {
        return Metrics::worst_case();
    }

    let document = Document::parse(html);
    score_document(&document, response_time_ms, page_url)
}

/// Scores an already parsed document
pub fn score_document(document: &Document, response_time_ms: u64, page_url: &str) -> Metrics {
    let mut penalty = 0;

    // Title
    let title = check_title(document);
    penalty += match title {
        TitleCheck::Missing => TITLE_MISSING_PENALTY,
        TitleCheck::BadLength(_) => TITLE_LENGTH_PENALTY,
        TitleCheck::Ok(_) => 0,
    };

    // Meta description
    let meta_description = extract_meta_description(document);
    if meta_description.is_none() {
        penalty += META_DESCRIPTION_PENALTY;
    }

    // Headings
    let h1_count = document.count("h1");
    let h2_count = document.count("h2");
    penalty += match h1_count {
        0 => NO_H1_PENALTY,
        1 => 0,
        _ => MULTIPLE_H1_PENALTY,
    };

    // Images: the reported count is exact, the deduction saturates
    let images = document.find_all("img");
    let image_count = images.len();
    let mut images_missing_alt = 0;
    let mut alt_penalty = 0;
    for image in &images {
        let has_alt = image
            .attr("alt")
            .map(|alt| !alt.trim().is_empty())
            .unwrap_or(false);
        if !has_alt {
            images_missing_alt += 1;
            if alt_penalty < IMAGE_ALT_PENALTY_CAP {
                alt_penalty += IMAGE_ALT_PENALTY;
            }
        }
    }
    penalty += alt_penalty;

    // Links
    let origin = origin_prefix(page_url);
    let links = count_links(document, origin.as_deref());

    // Load time
    let load_time_status = classify_load_time(response_time_ms);
    if load_time_status == LoadTimeStatus::Fail {
        penalty += SLOW_LOAD_PENALTY;
    }

    Metrics {
        score: BASE_SCORE.saturating_sub(penalty),
        title: title.text().to_string(),
        meta_description: meta_description.unwrap_or_else(|| MISSING.to_string()),
        h1_count,
        h2_count,
        image_count,
        images_missing_alt,
        internal_links_count: links.internal,
        external_links_count: links.external,
        load_time_status,
    }
}

/// Evaluates the title rules
///
/// Presence is decided on the raw text. A whitespace-only title is present
/// and trims to an empty, too short title.
pub fn check_title(document: &Document) -> TitleCheck {
    let raw = match document.find_first("title") {
        Some(element) => element.text(),
        None => return TitleCheck::Missing,
    };

    if raw.is_empty() {
        return TitleCheck::Missing;
    }

    let text = raw.trim().to_string();
    let length = text.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&length) {
        TitleCheck::BadLength(text)
    } else {
        TitleCheck::Ok(text)
    }
}

/// Returns the trimmed `content` of `<meta name="description">`, or `None`
/// when the tag is absent or its content is empty
///
/// Whitespace-only content is present and comes back as `""`.
pub fn extract_meta_description(document: &Document) -> Option<String> {
    document
        .find_first_with_attr("meta", "name", "description")
        .and_then(|meta| meta.attr("content"))
        .filter(|content| !content.is_empty())
        .map(|content| content.trim().to_string())
}

/// Classifies a response time against [`LOAD_TIME_THRESHOLD_MS`]
pub fn classify_load_time(response_time_ms: u64) -> LoadTimeStatus {
    if response_time_ms > LOAD_TIME_THRESHOLD_MS {
        LoadTimeStatus::Fail
    } else {
        LoadTimeStatus::Pass
    }
}
