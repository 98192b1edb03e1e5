use url::Url;

/// Slug reserved for the site root
pub const INDEX_SLUG: &str = "index";

/// Converts a URL into a filesystem-safe slug for its page file
///
/// The path is trimmed of surrounding slashes and every character outside
/// `[A-Za-z0-9_-]` becomes `_`. The root path maps to [`INDEX_SLUG`].
///
/// # Examples
///
/// ```
/// use url::Url;
/// use geo_readiness::url::url_to_slug;
///
/// let url = Url::parse("https://example.com/blog/2024/hello.world").unwrap();
/// assert_eq!(url_to_slug(&url), "blog_2024_hello_world");
/// assert_eq!(url_to_slug(&Url::parse("https://example.com/").unwrap()), "index");
/// ```
pub fn url_to_slug(url: &Url) -> String {
    let path = url.path().trim_matches('/');
    if path.is_empty() {
        return INDEX_SLUG.to_string();
    }

    path.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
