use std::fmt;
use url::Url;

/// Whether a link stays on the crawl's target domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Same host and explicit port as the target
    Internal,
    /// Anything else
    External,
}

/// The single domain a crawl is scoped to
///
/// Two URLs share a domain when their lowercase hosts and explicit ports
/// match. A scheme's default port counts as no port, so `http://host/` and
/// `https://host/` are the same domain. Subdomains are separate domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDomain {
    host: String,
    port: Option<u16>,
}

impl TargetDomain {
    /// Builds the target from the site's base URL
    ///
    /// Returns None if the URL has no host.
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?.to_lowercase();
        Some(Self {
            host,
            port: url.port(),
        })
    }

    /// Returns the lowercase host of the target
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Classifies a URL as internal or external to the target
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use geo_readiness::url::{LinkScope, TargetDomain};
    ///
    /// let target = TargetDomain::from_url(&Url::parse("https://example.com/").unwrap()).unwrap();
    /// let inside = Url::parse("https://EXAMPLE.com/about").unwrap();
    /// let outside = Url::parse("https://blog.example.com/").unwrap();
    /// assert_eq!(target.classify(&inside), LinkScope::Internal);
    /// assert_eq!(target.classify(&outside), LinkScope::External);
    /// ```
    pub fn classify(&self, url: &Url) -> LinkScope {
        let same_host = url
            .host_str()
            .map(|h| h.eq_ignore_ascii_case(&self.host))
            .unwrap_or(false);

        if same_host && url.port() == self.port {
            LinkScope::Internal
        } else {
            LinkScope::External
        }
    }
}

impl fmt::Display for TargetDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}
