//! Style references.
//!
//! Style evaluation happens in the content pipeline; the map only tracks
//! *which* style is current. The snapshot is immutable and shared wholesale:
//! changing the style swaps the whole `Arc`, so in-flight frames keep
//! rendering the reference they were published with.

use std::sync::Arc;

/// Immutable reference to the current style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSnapshot {
    /// URL the style was requested from; empty until one is set.
    pub url: String,
}

impl StyleSnapshot {
    /// Creates a shared snapshot for a style URL.
    #[must_use]
    pub fn from_url(url: &str) -> Arc<Self> {
        Arc::new(Self {
            url: url.to_owned(),
        })
    }
}
