use std::fmt;

use scraper::{ElementRef, Html, Selector};

/// Pulls the string of interest out of a matched node. Empty output means "skip".
pub type NodeExtractor = fn(ElementRef<'_>) -> String;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no parseable content")]
    NoParseableContent,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector `{selector}`: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// A compiled selector paired with the function that turns each match into a string.
#[derive(Clone)]
pub struct QueryDescriptor {
    source: String,
    selector: Selector,
    extractor: NodeExtractor,
}

impl QueryDescriptor {
    pub fn new(selector: &str, extractor: NodeExtractor) -> Result<Self, SelectorError> {
        let compiled = Selector::parse(selector).map_err(|err| SelectorError {
            selector: selector.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            source: selector.to_string(),
            selector: compiled,
            extractor,
        })
    }

    pub fn selector(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("selector", &self.source)
            .finish_non_exhaustive()
    }
}

/// A parsed document bound to one descriptor.
///
/// Strings are produced lazily in document order, so a caller that stops after the
/// first one never runs the extractor on the remaining matches.
pub struct Extraction<'d> {
    document: Html,
    descriptor: &'d QueryDescriptor,
}

impl Extraction<'_> {
    pub fn strings(&self) -> impl Iterator<Item = String> + '_ {
        self.document
            .select(&self.descriptor.selector)
            .map(self.descriptor.extractor)
            .filter(|s| !s.is_empty())
    }

    pub fn first(&self) -> Option<String> {
        self.strings().next()
    }
}

/// Parse `content` and bind it to `descriptor`.
///
/// The HTML5 parser recovers from any markup, so only blank content is unparseable.
/// A document with no matches is a valid, empty extraction.
pub fn extract<'d>(
    content: &str,
    descriptor: &'d QueryDescriptor,
) -> Result<Extraction<'d>, ExtractError> {
    if content.trim().is_empty() {
        return Err(ExtractError::NoParseableContent);
    }
    Ok(Extraction {
        document: Html::parse_document(content),
        descriptor,
    })
}

/// `href` attribute, trimmed; empty when absent.
pub fn href_attribute(node: ElementRef<'_>) -> String {
    node.value()
        .attr("href")
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// All descendant text, concatenated and trimmed.
pub fn trimmed_text(node: ElementRef<'_>) -> String {
    node.text().collect::<String>().trim().to_string()
}
