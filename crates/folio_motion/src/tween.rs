// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-clock-free tween helpers.
//!
//! Everything here is a pure function of its inputs and the elapsed time,
//! so pointer following and scrub smoothing can be tested without a frame
//! loop.

use crate::easing::Easing;
use crate::keyframe::PropertySet;

/// Distance below which smoothing snaps onto its target
pub const SMOOTHING_SNAP: f32 = 1e-3;

/// Offset reached `elapsed` seconds into an eased move from `from` to `to`
pub fn interpolate_offset(
    from: &PropertySet,
    to: &PropertySet,
    elapsed: f32,
    duration: f32,
    easing: Easing,
) -> PropertySet {
    let linear = if duration <= f32::EPSILON {
        1.0
    } else {
        elapsed / duration
    };
    let eased = easing.apply(linear);

    let mut out = PropertySet::lerp(from, to, eased);
    // Properties only present in `from` ease back to neutral
    for property in from.properties() {
        if to.get(property).is_none() {
            let start = from.get_or_neutral(property);
            out.set(property, start + (property.neutral() - start) * eased);
        }
    }
    out
}

/// Exponentially approach `target`, covering ~95% of the distance in `lag`
/// seconds; snaps once closer than [`SMOOTHING_SNAP`]
pub fn smooth_toward(current: f32, target: f32, dt: f32, lag: f32) -> f32 {
    if lag <= f32::EPSILON {
        return target;
    }
    let factor = 1.0 - (-3.0 * dt.max(0.0) / lag).exp();
    let next = current + (target - current) * factor;
    if (target - next).abs() < SMOOTHING_SNAP {
        target
    } else {
        next
    }
}

/// An in-flight eased move between two offsets
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Offset when the move started
    pub from: PropertySet,
    /// Offset the move ends on
    pub to: PropertySet,
    /// Time since the move started
    pub elapsed: f32,
    /// Length of the move
    pub duration: f32,
    /// Easing curve
    pub easing: Easing,
}

impl Transition {
    /// A transition that has already settled on `value`
    pub fn settled(value: PropertySet) -> Self {
        Self {
            from: value.clone(),
            to: value,
            elapsed: 0.0,
            duration: 0.0,
            easing: Easing::Linear,
        }
    }

    /// Start a move from the current value toward `to`
    pub fn retarget(&mut self, to: PropertySet, duration: f32, easing: Easing) {
        self.from = self.value();
        self.to = to;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        self.easing = easing;
    }

    /// Advance by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    /// Current offset
    pub fn value(&self) -> PropertySet {
        interpolate_offset(&self.from, &self.to, self.elapsed, self.duration, self.easing)
    }

    /// Whether the move has reached its target
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Property;

    #[test]
    fn test_interpolate_offset_endpoints() {
        let from = PropertySet::new().with(Property::X, 10.0);
        let to = PropertySet::new().with(Property::X, 20.0);
        let start = interpolate_offset(&from, &to, 0.0, 0.5, Easing::PowerOut(2));
        let end = interpolate_offset(&from, &to, 0.5, 0.5, Easing::PowerOut(2));
        assert_eq!(start.get(Property::X), Some(10.0));
        assert_eq!(end.get(Property::X), Some(20.0));
    }

    #[test]
    fn test_interpolate_offset_drops_to_neutral() {
        let from = PropertySet::new().with(Property::RotateY, 6.0);
        let out = interpolate_offset(&from, &PropertySet::new(), 1.0, 1.0, Easing::Linear);
        assert_eq!(out.get(Property::RotateY), Some(0.0));
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut transition = Transition::settled(PropertySet::new().with(Property::X, 0.0));
        transition.retarget(PropertySet::new().with(Property::X, 10.0), 1.0, Easing::Linear);
        transition.advance(0.5);
        transition.retarget(PropertySet::new().with(Property::X, 0.0), 1.0, Easing::Linear);
        assert_eq!(transition.value().get(Property::X), Some(5.0));
        transition.advance(2.0);
        assert!(transition.is_finished());
        assert_eq!(transition.value().get(Property::X), Some(0.0));
    }

    #[test]
    fn test_smooth_toward_converges() {
        let mut value = 0.0;
        for _ in 0..240 {
            value = smooth_toward(value, 1.0, 1.0 / 60.0, 1.0);
        }
        assert_eq!(value, 1.0);
        assert_eq!(smooth_toward(0.2, 0.8, 0.016, 0.0), 0.8);
    }
}
