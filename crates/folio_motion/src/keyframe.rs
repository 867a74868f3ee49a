// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animatable properties and the value sets steps interpolate between.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A presentation property a step can animate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    /// Horizontal translation in pixels
    X,
    /// Vertical translation in pixels
    Y,
    /// Horizontal translation as a percentage of the element width
    XPercent,
    /// Opacity
    Opacity,
    /// Uniform scale
    Scale,
    /// Horizontal scale
    ScaleX,
    /// 2D rotation in degrees
    Rotation,
    /// Rotation around the horizontal axis in degrees
    RotateX,
    /// Rotation around the vertical axis in degrees
    RotateY,
    /// Fraction of the element revealed by a left-to-right clip
    ClipReveal,
    /// Free numeric value (counters)
    Value,
}

impl Property {
    /// Value of the property when nothing animates it
    pub fn neutral(&self) -> f32 {
        match self {
            Self::Opacity | Self::Scale | Self::ScaleX | Self::ClipReveal => 1.0,
            Self::X
            | Self::Y
            | Self::XPercent
            | Self::Rotation
            | Self::RotateX
            | Self::RotateY
            | Self::Value => 0.0,
        }
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::XPercent => "xPercent",
            Self::Opacity => "opacity",
            Self::Scale => "scale",
            Self::ScaleX => "scaleX",
            Self::Rotation => "rotation",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::ClipReveal => "clipReveal",
            Self::Value => "value",
        }
    }
}

/// An ordered set of property values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet(IndexMap<Property, f32>);

impl PropertySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, property: Property, value: f32) -> Self {
        self.0.insert(property, value);
        self
    }

    /// Set a property value
    pub fn set(&mut self, property: Property, value: f32) {
        self.0.insert(property, value);
    }

    /// Get a property value if present
    pub fn get(&self, property: Property) -> Option<f32> {
        self.0.get(&property).copied()
    }

    /// Get a property value, falling back to its neutral value
    pub fn get_or_neutral(&self, property: Property) -> f32 {
        self.get(property).unwrap_or_else(|| property.neutral())
    }

    /// Iterate over properties and values
    pub fn iter(&self) -> impl Iterator<Item = (Property, f32)> + '_ {
        self.0.iter().map(|(p, v)| (*p, *v))
    }

    /// Properties present in the set
    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.0.keys().copied()
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrite this set's values with another's
    pub fn merge(&mut self, other: &PropertySet) {
        for (property, value) in other.iter() {
            self.0.insert(property, value);
        }
    }

    /// Add another set's values on top of this one, starting from neutral
    /// values for properties this set does not have
    pub fn add_offset(&mut self, offset: &PropertySet) {
        for (property, delta) in offset.iter() {
            let base = self.get_or_neutral(property);
            self.0.insert(property, base + delta);
        }
    }

    /// Interpolate every property of `to` from the matching value in `from`
    pub fn lerp(from: &PropertySet, to: &PropertySet, t: f32) -> PropertySet {
        let mut out = PropertySet::new();
        for (property, end) in to.iter() {
            let start = from.get_or_neutral(property);
            out.set(property, Interpolation::lerp(start, end, t));
        }
        out
    }

    /// Whether every property of both sets differs by less than `epsilon`
    pub fn approx_eq(&self, other: &PropertySet, epsilon: f32) -> bool {
        self.properties()
            .chain(other.properties())
            .all(|p| (self.get_or_neutral(p) - other.get_or_neutral(p)).abs() < epsilon)
    }
}

impl FromIterator<(Property, f32)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (Property, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Inverse of [`Interpolation::lerp`], clamped to `[0, 1]`
    ///
    /// A zero-length range is a step: 0 before `a`, 1 at or after it.
    pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
        if (b - a).abs() < f32::EPSILON {
            return if value >= a { 1.0 } else { 0.0 };
        }
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_uses_neutral_for_missing_from() {
        let from = PropertySet::new().with(Property::Y, 30.0);
        let to = PropertySet::new()
            .with(Property::Y, 0.0)
            .with(Property::Opacity, 0.5);
        let mid = PropertySet::lerp(&from, &to, 0.5);
        assert_eq!(mid.get(Property::Y), Some(15.0));
        assert_eq!(mid.get(Property::Opacity), Some(0.75));
    }

    #[test]
    fn test_add_offset() {
        let mut base = PropertySet::new().with(Property::X, 10.0);
        base.add_offset(
            &PropertySet::new()
                .with(Property::X, 5.0)
                .with(Property::Scale, 0.02),
        );
        assert_eq!(base.get(Property::X), Some(15.0));
        assert!((base.get_or_neutral(Property::Scale) - 1.02).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_lerp() {
        assert_eq!(Interpolation::inverse_lerp(200.0, 800.0, 500.0), 0.5);
        assert_eq!(Interpolation::inverse_lerp(200.0, 800.0, 100.0), 0.0);
        assert_eq!(Interpolation::inverse_lerp(200.0, 800.0, 950.0), 1.0);
        assert_eq!(Interpolation::inverse_lerp(5.0, 5.0, 5.0), 1.0);
        assert_eq!(Interpolation::inverse_lerp(5.0, 5.0, 4.0), 0.0);
    }
}
