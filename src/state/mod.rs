//! Report lifecycle state
//!
//! A report moves `pending → processing → completed | failed`. The two last
//! states are terminal.

mod report_status;

pub use report_status::ReportStatus;
