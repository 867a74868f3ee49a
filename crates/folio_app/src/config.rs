// SPDX-License-Identifier: MIT OR Apache-2.0
//! Site configuration.
//!
//! This module manages the page-level settings:
//! - Viewport size and frame rate
//! - Section heights used to lay out the page
//! - Pointer parallax limits
//! - Contact form, navigation and typewriter timings
//!
//! Settings are stored as RON. Missing files and missing fields fall back
//! to the defaults, which reproduce the stock portfolio page.

use folio_motion::Easing;
use folio_trigger::Viewport;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current site configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Site configuration file name
pub const CONFIG_FILE_NAME: &str = "folio.ron";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for the expected type
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Value could not be written as RON
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// File was written by a newer version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Read a RON file
pub fn load_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&content)?)
}

/// Write a value as pretty RON
pub fn save_ron<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    let config = ron::ser::PrettyConfig::default()
        .struct_names(true)
        .enumerate_arrays(false);
    let content = ron::ser::to_string_pretty(value, config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Height of each page section in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionHeights {
    /// Hero
    pub hero: f32,
    /// About
    pub about: f32,
    /// Projects
    pub projects: f32,
    /// Tech stack
    pub tech: f32,
    /// Contact
    pub contact: f32,
    /// Footer
    pub footer: f32,
}

impl Default for SectionHeights {
    fn default() -> Self {
        Self {
            hero: 900.0,
            about: 1400.0,
            projects: 1600.0,
            tech: 1000.0,
            contact: 1000.0,
            footer: 200.0,
        }
    }
}

/// Bounds on pointer parallax offsets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxLimits {
    /// Largest translation in pixels
    pub max_translate: f32,
    /// Largest rotation in degrees
    pub max_rotate: f32,
}

impl Default for ParallaxLimits {
    fn default() -> Self {
        Self {
            max_translate: 60.0,
            max_rotate: 20.0,
        }
    }
}

/// Simulated contact submission timings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactTimings {
    /// Seconds spent submitting
    pub submit_delay: f32,
    /// Seconds the confirmation stays up
    pub submitted_hold: f32,
}

impl Default for ContactTimings {
    fn default() -> Self {
        Self {
            submit_delay: 1.0,
            submitted_hold: 3.0,
        }
    }
}

/// Programmatic scroll timing used by navigation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationTimings {
    /// Seconds to reach the target section
    pub scroll_duration: f32,
    /// Easing of the scroll
    pub scroll_easing: Easing,
}

impl Default for NavigationTimings {
    fn default() -> Self {
        Self {
            scroll_duration: 1.0,
            scroll_easing: Easing::PowerInOut(3),
        }
    }
}

/// Hero typewriter timings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterTimings {
    /// Seconds per typed character
    pub type_interval: f32,
    /// Seconds the full role stays up
    pub hold: f32,
    /// Seconds per deleted character
    pub delete_interval: f32,
}

impl Default for TypewriterTimings {
    fn default() -> Self {
        Self {
            type_interval: 0.1,
            hold: 2.0,
            delete_interval: 0.05,
        }
    }
}

/// Site settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Format version
    pub version: u32,
    /// Viewport size
    pub viewport: Viewport,
    /// Frames per second used by scripted runs
    pub fps: u32,
    /// Section heights
    pub sections: SectionHeights,
    /// Pointer parallax limits
    pub parallax: ParallaxLimits,
    /// Contact form timings
    pub contact: ContactTimings,
    /// Navigation scroll timing
    pub navigation: NavigationTimings,
    /// Typewriter timings
    pub typewriter: TypewriterTimings,
    /// Number of ambient hero particles
    pub particles: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            viewport: Viewport::default(),
            fps: 60,
            sections: SectionHeights::default(),
            parallax: ParallaxLimits::default(),
            contact: ContactTimings::default(),
            navigation: NavigationTimings::default(),
            typewriter: TypewriterTimings::default(),
            particles: 50,
        }
    }
}

impl SiteConfig {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: SiteConfig = load_ron(path)?;
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        Ok(config)
    }

    /// Load settings, or the defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::info!("Loaded site config from {:?}", path);
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_ron(self, path)
    }

    /// Seconds per frame
    pub fn frame_time(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}
