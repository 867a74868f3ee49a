// SPDX-License-Identifier: MIT OR Apache-2.0
//! Steps laid out on a timeline.

use crate::easing::Easing;
use crate::keyframe::PropertySet;
use crate::target::ElementId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(pub Uuid);

impl StepId {
    /// Create a new random step ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

/// One tween on a timeline: a property change applied to one or more
/// targets, staggered by a fixed offset per target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Unique step ID
    pub id: StepId,
    /// Short label used in logs
    pub label: String,
    /// Elements animated by this step, in stagger order
    pub targets: Vec<ElementId>,
    /// Starting values; missing properties start from neutral
    pub from: PropertySet,
    /// Final values
    pub to: PropertySet,
    /// Duration of one target's tween in seconds
    pub duration: f32,
    /// Easing curve
    pub easing: Easing,
    /// Offset from the end of the previous step; negative overlaps it
    pub delay: f32,
    /// Offset between consecutive targets
    pub stagger: f32,
    /// Write `from` values before the step starts
    pub immediate_render: bool,
    /// Start time on the owning timeline, set when the step is placed
    #[serde(skip)]
    start: f32,
}

impl Step {
    /// Create a step tweening from explicit values to explicit values
    pub fn from_to(
        targets: Vec<ElementId>,
        from: PropertySet,
        to: PropertySet,
        duration: f32,
    ) -> Self {
        Self {
            id: StepId::new(),
            label: String::new(),
            targets,
            from,
            to,
            duration: duration.max(0.0),
            easing: Easing::default(),
            delay: 0.0,
            stagger: 0.0,
            immediate_render: true,
            start: 0.0,
        }
    }

    /// Create a step tweening from neutral values to `to`
    pub fn to(targets: Vec<ElementId>, to: PropertySet, duration: f32) -> Self {
        let mut step = Self::from_to(targets, PropertySet::new(), to, duration);
        step.immediate_render = false;
        step
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the delay relative to the previous step
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Set the per-target stagger
    pub fn with_stagger(mut self, stagger: f32) -> Self {
        self.stagger = stagger.max(0.0);
        self
    }

    /// Total time from the first target's start to the last target's end
    pub fn span(&self) -> f32 {
        let extra_targets = self.targets.len().saturating_sub(1) as f32;
        self.duration + self.stagger * extra_targets
    }

    /// Start time on the owning timeline
    pub fn start(&self) -> f32 {
        self.start
    }

    /// End time on the owning timeline
    pub fn end(&self) -> f32 {
        self.start + self.span()
    }

    pub(crate) fn place(&mut self, start: f32) {
        self.start = start.max(0.0);
    }

    /// Write the values of every target at `time` into `out`
    ///
    /// A `to` step leaves its targets alone until time has moved past
    /// their start.
    pub fn evaluate(&self, time: f32, out: &mut IndexMap<ElementId, PropertySet>) {
        for (index, target) in self.targets.iter().enumerate() {
            let target_start = self.start + self.stagger * index as f32;
            if time < target_start || (!self.immediate_render && time <= target_start) {
                if self.immediate_render {
                    out.entry(*target)
                        .or_default()
                        .merge(&PropertySet::lerp(&self.from, &self.to, 0.0));
                }
                continue;
            }

            let linear = if self.duration <= f32::EPSILON {
                1.0
            } else {
                (time - target_start) / self.duration
            };
            let values = PropertySet::lerp(&self.from, &self.to, self.easing.apply(linear));
            out.entry(*target).or_default().merge(&values);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Property;

    fn fade_up(targets: Vec<ElementId>) -> Step {
        Step::from_to(
            targets,
            PropertySet::new()
                .with(Property::Y, 40.0)
                .with(Property::Opacity, 0.0),
            PropertySet::new()
                .with(Property::Y, 0.0)
                .with(Property::Opacity, 1.0),
            1.0,
        )
        .with_easing(Easing::Linear)
    }

    #[test]
    fn test_span_includes_stagger() {
        let step = fade_up(vec![ElementId::new(), ElementId::new(), ElementId::new()])
            .with_stagger(0.15);
        assert!((step.span() - 1.3).abs() < 1e-5);
    }

    #[test]
    fn test_stagger_offsets_targets() {
        let a = ElementId::new();
        let b = ElementId::new();
        let step = fade_up(vec![a, b]).with_stagger(0.5);

        let mut out = IndexMap::new();
        step.evaluate(0.5, &mut out);
        assert_eq!(out[&a].get(Property::Opacity), Some(0.5));
        assert_eq!(out[&b].get(Property::Opacity), Some(0.0));

        step.evaluate(2.0, &mut out);
        assert_eq!(out[&a].get(Property::Y), Some(0.0));
        assert_eq!(out[&b].get(Property::Y), Some(0.0));
    }

    #[test]
    fn test_to_step_does_not_render_early() {
        let target = ElementId::new();
        let mut step = Step::to(
            vec![target],
            PropertySet::new().with(Property::Y, -10.0),
            2.0,
        );
        step.place(1.0);

        let mut out = IndexMap::new();
        step.evaluate(0.5, &mut out);
        step.evaluate(1.0, &mut out);
        assert!(out.is_empty());

        step.evaluate(3.0, &mut out);
        assert_eq!(out[&target].get(Property::Y), Some(-10.0));
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let target = ElementId::new();
        let step = Step::from_to(
            vec![target],
            PropertySet::new().with(Property::Opacity, 0.0),
            PropertySet::new().with(Property::Opacity, 1.0),
            0.0,
        );
        let mut out = IndexMap::new();
        step.evaluate(0.0, &mut out);
        assert_eq!(out[&target].get(Property::Opacity), Some(1.0));
    }
}
