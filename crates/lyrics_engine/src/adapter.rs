//! Site-specific configuration for the lyrics source.

use url::Url;

use crate::extract::{href_attribute, trimmed_text, QueryDescriptor, SelectorError};

pub const AZLYRICS_SEARCH_ENDPOINT: &str = "http://search.azlyrics.com/search.php";
/// Anchors inside result cells whose class attribute is exactly `text-left visitedlyr`.
pub const AZLYRICS_RESULT_LINK_SELECTOR: &str = r#"td[class="text-left visitedlyr"] > a"#;
/// Sixth `div` child of the main lyrics column.
pub const AZLYRICS_LYRICS_SELECTOR: &str =
    r#"div[class="col-xs-12 col-lg-8 text-center"] > div:nth-of-type(6)"#;
pub const DEFAULT_QUERY_PARAM: &str = "q";

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("invalid search endpoint `{endpoint}`: {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// Immutable description of one lyrics site. Built once, shared read-only by every run.
#[derive(Debug, Clone)]
pub struct SiteAdapter {
    search_endpoint: Url,
    query_param: String,
    result_links: QueryDescriptor,
    lyrics: QueryDescriptor,
}

impl SiteAdapter {
    pub fn new(
        search_endpoint: &str,
        result_links: QueryDescriptor,
        lyrics: QueryDescriptor,
    ) -> Result<Self, AdapterError> {
        let search_endpoint = Url::parse(search_endpoint).map_err(|source| AdapterError::Endpoint {
            endpoint: search_endpoint.to_string(),
            source,
        })?;
        Ok(Self {
            search_endpoint,
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            result_links,
            lyrics,
        })
    }

    pub fn azlyrics() -> Result<Self, AdapterError> {
        Self::azlyrics_at(AZLYRICS_SEARCH_ENDPOINT)
    }

    /// AZLyrics selectors against another endpoint (mirrors, test servers).
    pub fn azlyrics_at(search_endpoint: &str) -> Result<Self, AdapterError> {
        Self::new(
            search_endpoint,
            QueryDescriptor::new(AZLYRICS_RESULT_LINK_SELECTOR, href_attribute)?,
            QueryDescriptor::new(AZLYRICS_LYRICS_SELECTOR, trimmed_text)?,
        )
    }

    pub fn with_query_param(mut self, name: impl Into<String>) -> Self {
        self.query_param = name.into();
        self
    }

    pub fn search_endpoint(&self) -> &Url {
        &self.search_endpoint
    }

    pub fn query_param(&self) -> &str {
        &self.query_param
    }

    pub fn result_links(&self) -> &QueryDescriptor {
        &self.result_links
    }

    pub fn lyrics(&self) -> &QueryDescriptor {
        &self.lyrics
    }

    /// Absolute links pass through; relative ones are joined onto the search endpoint.
    pub fn resolve_link(&self, link: &str) -> Option<Url> {
        let trimmed = link.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        if let Ok(url) = Url::parse(trimmed) {
            return Some(url);
        }
        self.search_endpoint.join(trimmed).ok()
    }
}
