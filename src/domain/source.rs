use serde::{Deserialize, Serialize};
use url::Url;

/// Which grammar to expect at an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// Repeated `<item>` blocks.
    Item,
    /// Repeated `<entry>` blocks.
    Entry,
    /// Sniff the payload.
    #[default]
    Auto,
}

/// One candidate URL within a source's fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
    #[serde(default)]
    pub format: FeedFormat,
    /// Drop items whose link is not on one of the source's domains.
    /// Needed for broad endpoints such as aggregator search feeds.
    #[serde(default)]
    pub filter_domain: bool,
    /// Resolve aggregator redirect links before filtering.
    #[serde(default)]
    pub unwrap_links: bool,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, format: FeedFormat) -> Self {
        Self {
            url: url.into(),
            format,
            filter_domain: false,
            unwrap_links: false,
        }
    }

    /// Mark this endpoint as a broad mirror: unwrap links and keep only
    /// the source's own domains.
    pub fn mirror(mut self) -> Self {
        self.filter_domain = true;
        self.unwrap_links = true;
        self
    }
}

/// Static description of a news origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    /// Host names the source publishes under, e.g. `planetf1.com`.
    pub domains: Vec<String>,
    pub endpoints: Vec<Endpoint>,
}

impl SourceDescriptor {
    pub fn owns_link(&self, link: &str) -> bool {
        link_on_domains(link, &self.domains)
    }
}

/// True when the link's host is one of `domains` or a subdomain of one.
pub fn link_on_domains(link: &str, domains: &[String]) -> bool {
    let Ok(url) = Url::parse(link) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    domains.iter().any(|domain| {
        let domain = domain.to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{domain}"))
    })
}
