use std::collections::HashMap;

/// Marker attribute that opts an element into dialog loading
pub const MARKER_ATTR: &str = "data-lightbox";

/// Source attribute; absent means the fragment loads from the live page
pub const SOURCE_ATTR: &str = "href";

/// Target-region attribute
pub const TARGET_ATTR: &str = "data-target";

/// Where a fragment's content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentSource {
    /// Fetched over the transport
    Remote(String),
    /// Read from the live document's target element
    SamePage,
}

impl FragmentSource {
    pub fn url(&self) -> Option<&str> {
        match self {
            FragmentSource::Remote(url) => Some(url),
            FragmentSource::SamePage => None,
        }
    }

    /// The source half of a cache key. Same-page fragments share the empty
    /// source.
    pub fn cache_source(&self) -> &str {
        self.url().unwrap_or("")
    }
}

/// A navigation request parsed from a trigger element's attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    pub source: FragmentSource,
    pub target: String,
}

impl TriggerRequest {
    /// Parse a trigger element's attribute map. Returns `None` when the
    /// marker or the target-region attribute is missing.
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Option<Self> {
        if !attributes.contains_key(MARKER_ATTR) {
            return None;
        }

        let target = attributes.get(TARGET_ATTR)?.clone();
        let source = match attributes.get(SOURCE_ATTR) {
            Some(url) if !url.is_empty() => FragmentSource::Remote(url.clone()),
            _ => FragmentSource::SamePage,
        };

        Some(Self { source, target })
    }
}
