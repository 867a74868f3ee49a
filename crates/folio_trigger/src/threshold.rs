// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scroll thresholds.
//!
//! A threshold pairs a line across the element with a line across the
//! viewport: `"top 75%"` is crossed when the element's top reaches 75% of
//! the way down the viewport. Both positions accept `top`, `center`,
//! `bottom` or a percentage.

use crate::layout::{ElementBox, Viewport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An element line meeting a viewport line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Threshold {
    /// Line across the element, as a fraction of its height from the top
    pub edge: f32,
    /// Line across the viewport, as a fraction of its height from the top
    pub line: f32,
}

impl Threshold {
    /// Create a threshold from two fractions
    pub fn new(edge: f32, line: f32) -> Self {
        Self { edge, line }
    }

    /// Scroll position at which the element line meets the viewport line
    pub fn resolve(&self, rect: ElementBox, viewport: Viewport) -> f32 {
        rect.top + self.edge * rect.height - self.line * viewport.height
    }

    fn parse_position(token: &str) -> Option<f32> {
        match token {
            "top" => Some(0.0),
            "center" => Some(0.5),
            "bottom" => Some(1.0),
            _ => token
                .strip_suffix('%')
                .and_then(|n| n.parse::<f32>().ok())
                .map(|n| n / 100.0),
        }
    }

    fn format_position(value: f32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if value == 0.0 {
            write!(f, "top")
        } else if value == 0.5 {
            write!(f, "center")
        } else if value == 1.0 {
            write!(f, "bottom")
        } else {
            write!(f, "{}%", value * 100.0)
        }
    }
}

/// Failure to parse a threshold
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdParseError {
    /// Not exactly two positions
    #[error("Threshold needs an element position and a viewport position: {0:?}")]
    Shape(String),

    /// A position is not `top`, `center`, `bottom` or a percentage
    #[error("Invalid threshold position {position:?} in {input:?}")]
    Position {
        /// The whole input
        input: String,
        /// The offending token
        position: String,
    },
}

impl FromStr for Threshold {
    type Err = ThresholdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [edge, line] = tokens.as_slice() else {
            return Err(ThresholdParseError::Shape(s.to_string()));
        };
        let parse = |token: &str| {
            Self::parse_position(token).ok_or_else(|| ThresholdParseError::Position {
                input: s.to_string(),
                position: token.to_string(),
            })
        };
        Ok(Self::new(parse(*edge)?, parse(*line)?))
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::format_position(self.edge, f)?;
        write!(f, " ")?;
        Self::format_position(self.line, f)
    }
}

impl TryFrom<String> for Threshold {
    type Error = ThresholdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Threshold> for String {
    fn from(value: Threshold) -> Self {
        value.to_string()
    }
}
