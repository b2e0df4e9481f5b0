//! Page analysis: fetch, score, interpret, persist

mod fetcher;
mod runner;

pub use fetcher::{build_http_client, fetch_page, FetchError, FetchedPage};
pub use runner::{Analyzer, BatchSubmission, Submission, COMPLETED_MESSAGE, STARTED_MESSAGE};
