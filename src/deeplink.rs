//! Messaging deep links
//!
//! Orders leave the storefront as a link that opens the messaging app with the
//! order text pre-filled.

use std::fmt;

use mockall::automock;
use thiserror::Error;

/// Business number orders are sent to.
pub const DEFAULT_BUSINESS_NUMBER: &str = "6282266517859";

/// Base URL of the messaging service.
pub const DEFAULT_BASE_URL: &str = "https://wa.me";

/// Error raised when a deep link could not be opened.
#[derive(Debug, Error)]
#[error("failed to open deep link: {0}")]
pub struct LaunchError(pub String);

/// Builds deep links for a fixed business identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkBuilder {
    base_url: String,
    business: String,
}

impl DeepLinkBuilder {
    /// Create a builder for `business` on the default messaging service.
    pub fn new(business: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, business)
    }

    /// Create a builder for `business` on a custom messaging service.
    pub fn with_base_url(base_url: impl Into<String>, business: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            business: business.into(),
        }
    }

    /// Business identifier links are addressed to.
    pub fn business(&self) -> &str {
        &self.business
    }

    /// Build a link carrying `text`.
    pub fn link(&self, text: &str) -> DeepLink {
        DeepLink(format!(
            "{}/{}?text={}",
            self.base_url,
            self.business,
            encode_component(text)
        ))
    }
}

/// Characters `encodeURIComponent` leaves as-is but `urlencoding` escapes.
const COMPONENT_SAFE: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode `text` the way browsers encode a URI component, so links
/// match those produced by the web storefront byte for byte.
fn encode_component(text: &str) -> String {
    COMPONENT_SAFE
        .iter()
        .fold(urlencoding::encode(text).into_owned(), |encoded, &(escaped, raw)| {
            encoded.replace(escaped, raw)
        })
}

impl Default for DeepLinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BUSINESS_NUMBER)
    }
}

/// A ready-to-open deep link URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink(String);

impl DeepLink {
    /// The link as a URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opens deep links in a new browsing context.
#[automock]
pub trait MessageLauncher {
    /// Hand `link` to the messaging app.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] if the link could not be opened.
    fn launch(&mut self, link: &DeepLink) -> Result<(), LaunchError>;
}

/// Launcher that remembers every link it was given instead of opening it.
#[derive(Debug, Clone, Default)]
pub struct RecordingLauncher {
    links: Vec<DeepLink>,
}

impl RecordingLauncher {
    /// Create an empty launcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Links launched so far, oldest first.
    pub fn links(&self) -> &[DeepLink] {
        &self.links
    }
}

impl MessageLauncher for RecordingLauncher {
    fn launch(&mut self, link: &DeepLink) -> Result<(), LaunchError> {
        self.links.push(link.clone());
        Ok(())
    }
}
