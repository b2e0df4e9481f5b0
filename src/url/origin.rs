use url::Url;

/// Builds the `scheme://host[:port]` prefix of a page URL
///
/// Links whose `href` starts with this prefix point back at the same site.
/// Returns `None` when the string does not parse or has no host.
///
/// # Examples
///
/// ```
/// use sitesage::url::origin_prefix;
///
/// assert_eq!(origin_prefix("http://example.com/about"), Some("http://example.com".to_string()));
/// assert_eq!(origin_prefix("https://example.com:8443/"), Some("https://example.com:8443".to_string()));
/// assert_eq!(origin_prefix("not a url"), None);
/// ```
pub fn origin_prefix(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    let host = url.host_str()?;

    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

/// Extracts the lowercase hostname of a URL string
///
/// Returns `None` for unparseable input or URLs without a host.
pub fn extract_host(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.to_lowercase()))
        .filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_drops_path_and_query() {
        assert_eq!(
            origin_prefix("https://example.com/a/b?c=d#e"),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn test_origin_keeps_explicit_port() {
        assert_eq!(
            origin_prefix("http://127.0.0.1:4000/"),
            Some("http://127.0.0.1:4000".to_string())
        );
    }

    #[test]
    fn test_origin_default_port_is_omitted() {
        assert_eq!(
            origin_prefix("https://example.com:443/"),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn test_origin_without_host() {
        assert_eq!(origin_prefix("mailto:a@b.com"), None);
    }

    #[test]
    fn test_extract_host() {
        assert_eq!(
            extract_host("https://Blog.Example.com/post"),
            Some("blog.example.com".to_string())
        );
        assert_eq!(extract_host("garbage"), None);
    }
}
