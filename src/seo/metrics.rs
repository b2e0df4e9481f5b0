use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder stored when a title or description is absent
pub const MISSING: &str = "Missing";

/// Pass/fail classification of the page response time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadTimeStatus {
    Pass,
    Fail,
}

impl LoadTimeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for LoadTimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the title checks
///
/// Exactly one variant applies, so presence and length penalties can never
/// both fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleCheck {
    /// No `<title>` element, or its text is empty
    Missing,
    /// Title present but shorter than 10 or longer than 60 characters
    BadLength(String),
    /// Title present with an acceptable length
    Ok(String),
}

impl TitleCheck {
    /// Title text as reported in [`Metrics::title`]
    pub fn text(&self) -> &str {
        match self {
            Self::Missing => MISSING,
            Self::BadLength(text) | Self::Ok(text) => text,
        }
    }
}

/// SEO metrics computed for a single page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Overall score in `0..=100`
    pub score: u32,
    pub title: String,
    pub meta_description: String,
    pub h1_count: usize,
    pub h2_count: usize,
    pub image_count: usize,
    /// Uncapped number of images with absent or blank `alt`
    pub images_missing_alt: usize,
    pub internal_links_count: usize,
    pub external_links_count: usize,
    pub load_time_status: LoadTimeStatus,
}

impl Metrics {
    /// The result reported for empty input: score 0, nothing found, load
    /// time failed
    pub fn worst_case() -> Self {
        Self {
            score: 0,
            title: MISSING.to_string(),
            meta_description: MISSING.to_string(),
            h1_count: 0,
            h2_count: 0,
            image_count: 0,
            images_missing_alt: 0,
            internal_links_count: 0,
            external_links_count: 0,
            load_time_status: LoadTimeStatus::Fail,
        }
    }

    /// Serializes the metrics as the JSON object persisted with a report
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
