use crate::UrlError;
use url::Url;

/// Parses and validates a URL submitted for analysis
///
/// The URL must be absolute, use the `http` or `https` scheme and carry a
/// host. The returned value is the parsed form, so `Url::as_str` gives the
/// canonical string the report is stored under (e.g. a bare host gains a
/// trailing `/`).
///
/// # Examples
///
/// ```
/// use sitesage::url::parse_target_url;
///
/// let url = parse_target_url("https://Example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
///
/// assert!(parse_target_url("ftp://example.com/").is_err());
/// assert!(parse_target_url("/relative/path").is_err());
/// ```
pub fn parse_target_url(input: &str) -> Result<Url, UrlError> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}
