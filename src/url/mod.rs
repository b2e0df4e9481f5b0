//! URL handling module for SiteSage
//!
//! This module validates submitted URLs and derives the pieces of a URL the
//! rest of the crate compares against (origin prefix, hostname).

mod origin;
mod validate;

pub use origin::{extract_host, origin_prefix};
pub use validate::parse_target_url;
