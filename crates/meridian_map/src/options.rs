//! Startup configuration.
//!
//! Options are read once at construction - from code or from a TOML
//! document - and never consulted again; everything dynamic flows through
//! the map's own setters afterwards.

use serde::Deserialize;
use thiserror::Error;

use meridian_rendering::Size;

/// Construction-time map configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MapOptions {
    /// Logical viewport width in pixels.
    pub width: u32,
    /// Logical viewport height in pixels.
    pub height: u32,
    /// Device pixel ratio.
    pub pixel_ratio: f64,
    /// Style URL to load at startup, if any.
    pub style_url: Option<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            pixel_ratio: 1.0,
            style_url: None,
        }
    }
}

/// Failure to parse a configuration document.
#[derive(Error, Debug)]
pub enum OptionsError {
    /// The TOML document was malformed or carried unknown fields.
    #[error("invalid map options: {0}")]
    Parse(#[from] toml::de::Error),
}

impl MapOptions {
    /// Logical viewport size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Loads options from a TOML document.
    ///
    /// Missing fields fall back to their defaults; unknown fields are
    /// rejected so configuration typos fail at startup instead of being
    /// silently ignored.
    pub fn from_toml_str(document: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(document)?)
    }
}
