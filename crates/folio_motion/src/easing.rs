// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves.
//!
//! Curves are named the way the page configuration names them
//! (`power3.out`, `back.out(1.7)`, `sine.inOut`, `none`), and serialize back
//! to the same strings.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Default overshoot for `back` curves
pub const DEFAULT_BACK_OVERSHOOT: f32 = 1.70158;

/// An easing curve mapping linear progress to eased progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    /// No easing
    Linear,
    /// Accelerating power curve; `power1` is quadratic, `power4` quintic
    PowerIn(u8),
    /// Decelerating power curve
    PowerOut(u8),
    /// Symmetric power curve
    PowerInOut(u8),
    /// Overshoots the end then settles, with the given overshoot amount
    BackOut(f32),
    /// Sinusoidal in and out
    SineInOut,
}

impl Default for Easing {
    fn default() -> Self {
        Easing::PowerOut(1)
    }
}

impl Easing {
    /// Apply the curve to a progress value; input is clamped to `[0, 1]`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::PowerIn(n) => t.powi(Self::exponent(n)),
            Easing::PowerOut(n) => 1.0 - (1.0 - t).powi(Self::exponent(n)),
            Easing::PowerInOut(n) => {
                let p = Self::exponent(n);
                if t < 0.5 {
                    (2.0 * t).powi(p) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(p) / 2.0
                }
            }
            Easing::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u * u * u + s * u * u
            }
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }

    fn exponent(n: u8) -> i32 {
        i32::from(n.clamp(1, 4)) + 1
    }
}

/// Failure to parse an easing name
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EasingParseError {
    /// The family name is not known
    #[error("Unknown easing: {0}")]
    Unknown(String),

    /// The power level is outside 1..=4
    #[error("Invalid power level in easing: {0}")]
    InvalidPower(String),

    /// The overshoot argument could not be read
    #[error("Invalid easing argument: {0}")]
    InvalidArgument(String),
}

impl FromStr for Easing {
    type Err = EasingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name {
            "none" | "linear" => return Ok(Easing::Linear),
            "sine.inOut" => return Ok(Easing::SineInOut),
            "back.out" => return Ok(Easing::BackOut(DEFAULT_BACK_OVERSHOOT)),
            _ => {}
        }

        if let Some(arg) = name
            .strip_prefix("back.out(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let overshoot = arg
                .trim()
                .parse::<f32>()
                .map_err(|_| EasingParseError::InvalidArgument(name.to_string()))?;
            return Ok(Easing::BackOut(overshoot));
        }

        let Some(rest) = name.strip_prefix("power") else {
            return Err(EasingParseError::Unknown(name.to_string()));
        };
        let (level, mode) = rest.split_once('.').unwrap_or((rest, "out"));
        let level: u8 = level
            .parse()
            .map_err(|_| EasingParseError::InvalidPower(name.to_string()))?;
        if !(1..=4).contains(&level) {
            return Err(EasingParseError::InvalidPower(name.to_string()));
        }
        match mode {
            "in" => Ok(Easing::PowerIn(level)),
            "out" => Ok(Easing::PowerOut(level)),
            "inOut" => Ok(Easing::PowerInOut(level)),
            _ => Err(EasingParseError::Unknown(name.to_string())),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => write!(f, "none"),
            Easing::PowerIn(n) => write!(f, "power{n}.in"),
            Easing::PowerOut(n) => write!(f, "power{n}.out"),
            Easing::PowerInOut(n) => write!(f, "power{n}.inOut"),
            Easing::BackOut(s) => write!(f, "back.out({s})"),
            Easing::SineInOut => write!(f, "sine.inOut"),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = EasingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(value: Easing) -> Self {
        value.to_string()
    }
}
