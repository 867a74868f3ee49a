// SPDX-License-Identifier: MIT OR Apache-2.0
//! Trigger bindings: boundary crossings to timeline commands.

use crate::observer::{
    Boundary, BoundaryEvent, CrossingType, ObserverError, SubscriptionId, ViewportObserver,
};
use crate::threshold::Threshold;
use folio_motion::{ElementId, Interpolation, TimelineAction, TimelineId, TimelineRegistry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingId(pub Uuid);

impl BindingId {
    /// Create a new random binding ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BindingId {
    fn default() -> Self {
        Self::new()
    }
}

/// How crossings drive a timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriggerPattern {
    /// Discrete commands on crossing
    Toggle {
        /// Boundary whose downward crossing runs `enter`
        start: Threshold,
        /// Optional boundary whose downward crossing runs `leave`
        end: Option<Threshold>,
        /// Command on entering
        enter: TimelineAction,
        /// Command on leaving
        leave: TimelineAction,
        /// Whether leaving (and entering back) runs commands at all;
        /// otherwise the timeline holds whatever state entering produced
        reversible: bool,
    },
    /// Timeline progress follows the scroll fraction between two boundaries
    Scrub {
        /// Boundary mapped to progress 0
        start: Threshold,
        /// Boundary mapped to progress 1
        end: Threshold,
        /// Seconds the timeline takes to catch up with the scroll position
        lag: Option<f32>,
    },
}

impl TriggerPattern {
    /// Play on enter, reverse when scrolling back above `start`
    pub fn reveal(start: Threshold) -> Self {
        Self::toggle(start, TimelineAction::Play, TimelineAction::Reverse, true)
    }

    /// Toggle on a single boundary
    pub fn toggle(
        start: Threshold,
        enter: TimelineAction,
        leave: TimelineAction,
        reversible: bool,
    ) -> Self {
        Self::Toggle {
            start,
            end: None,
            enter,
            leave,
            reversible,
        }
    }

    /// Scrub between two boundaries
    pub fn scrub(start: Threshold, end: Threshold, lag: Option<f32>) -> Self {
        Self::Scrub { start, end, lag }
    }

    /// Whether this is a scrub pattern
    pub fn is_scrub(&self) -> bool {
        matches!(self, Self::Scrub { .. })
    }

    fn boundaries(&self) -> Vec<Boundary> {
        match *self {
            Self::Toggle { start, end, .. } => {
                let mut boundaries = vec![Boundary::start(start)];
                boundaries.extend(end.map(Boundary::end));
                boundaries
            }
            Self::Scrub { start, end, .. } => vec![Boundary::start(start), Boundary::end(end)],
        }
    }

    fn action_for(&self, crossing: CrossingType) -> TimelineAction {
        let Self::Toggle {
            enter,
            leave,
            reversible,
            ..
        } = *self
        else {
            return TimelineAction::None;
        };
        match crossing {
            CrossingType::Enter => enter,
            CrossingType::EnterBack if reversible => enter,
            CrossingType::Leave | CrossingType::LeaveBack if reversible => leave,
            CrossingType::EnterBack | CrossingType::Leave | CrossingType::LeaveBack => {
                TimelineAction::None
            }
        }
    }
}

/// A timeline bound to an element's boundaries
#[derive(Debug, Clone)]
pub struct Binding {
    /// Unique binding ID
    pub id: BindingId,
    /// Driven timeline
    pub timeline: TimelineId,
    /// Observed element
    pub element: ElementId,
    /// Observer subscription carrying the boundaries
    pub subscription: SubscriptionId,
    /// Pattern
    pub pattern: TriggerPattern,
    /// Last progress a scrub applied
    last_progress: Option<f32>,
}

/// A command the binder sent in response to a crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredAction {
    /// Binding that fired
    pub binding: BindingId,
    /// Timeline that received the command
    pub timeline: TimelineId,
    /// Crossing that caused it
    pub crossing: CrossingType,
    /// Command sent
    pub action: TimelineAction,
}

/// Binding errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    /// Element cannot be observed
    #[error(transparent)]
    InvalidTarget(#[from] ObserverError),

    /// Timeline is not registered
    #[error("Timeline not registered: {0:?}")]
    UnknownTimeline(TimelineId),

    /// Another scrub on the same timeline covers an overlapping range
    #[error("Scrub range overlaps binding {existing:?} on timeline {timeline:?}")]
    BindingConflict {
        /// Timeline both bindings drive
        timeline: TimelineId,
        /// Binding already holding the range
        existing: BindingId,
    },
}

/// Owns bindings and routes boundary events to timelines
#[derive(Debug, Default)]
pub struct TriggerBinder {
    bindings: IndexMap<BindingId, Binding>,
    by_subscription: HashMap<SubscriptionId, BindingId>,
}

impl TriggerBinder {
    /// Create an empty binder
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `timeline` to crossings of `element`'s boundaries
    pub fn bind(
        &mut self,
        observer: &mut ViewportObserver,
        registry: &TimelineRegistry,
        timeline: TimelineId,
        element: ElementId,
        pattern: TriggerPattern,
    ) -> Result<BindingId, BindError> {
        if !registry.contains(timeline) {
            return Err(BindError::UnknownTimeline(timeline));
        }

        if let TriggerPattern::Scrub { start, end, .. } = pattern {
            let a = observer.resolve(element, start)?;
            let b = observer.resolve(element, end)?;
            let (lo, hi) = (a.min(b), a.max(b));
            for existing in self.scrubs_for(timeline) {
                let TriggerPattern::Scrub { start, end, .. } = existing.pattern else {
                    continue;
                };
                let (Ok(c), Ok(d)) = (
                    observer.resolve(existing.element, start),
                    observer.resolve(existing.element, end),
                ) else {
                    continue;
                };
                if lo < c.max(d) && c.min(d) < hi {
                    tracing::warn!(?timeline, existing = ?existing.id, "rejecting overlapping scrub");
                    return Err(BindError::BindingConflict {
                        timeline,
                        existing: existing.id,
                    });
                }
            }
        }

        let subscription = observer.observe(element, pattern.boundaries())?;
        let id = BindingId::new();
        self.bindings.insert(
            id,
            Binding {
                id,
                timeline,
                element,
                subscription,
                pattern,
                last_progress: None,
            },
        );
        self.by_subscription.insert(subscription, id);
        Ok(id)
    }

    /// Remove a binding and hand back its subscription for the caller to
    /// release; unknown bindings are ignored
    pub fn unbind(&mut self, id: BindingId) -> Option<SubscriptionId> {
        match self.bindings.shift_remove(&id) {
            Some(binding) => {
                self.by_subscription.remove(&binding.subscription);
                Some(binding.subscription)
            }
            None => {
                tracing::debug!(?id, "binding already released");
                None
            }
        }
    }

    /// Forget bindings whose subscriptions the observer dropped
    pub fn release_dropped(&mut self, dropped: &[SubscriptionId]) -> usize {
        let mut released = 0;
        for subscription in dropped {
            if let Some(id) = self.by_subscription.remove(subscription) {
                self.bindings.shift_remove(&id);
                tracing::warn!(?id, "binding released after its element detached");
                released += 1;
            }
        }
        released
    }

    /// Get a binding
    pub fn get(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(&id)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether a subscription belongs to one of this binder's bindings
    pub fn owns(&self, subscription: SubscriptionId) -> bool {
        self.by_subscription.contains_key(&subscription)
    }

    fn scrubs_for(&self, timeline: TimelineId) -> impl Iterator<Item = &Binding> {
        self.bindings
            .values()
            .filter(move |b| b.timeline == timeline && b.pattern.is_scrub())
    }

    /// Run toggle commands for crossings, in the order given
    pub fn dispatch(
        &mut self,
        events: &[BoundaryEvent],
        registry: &mut TimelineRegistry,
    ) -> Vec<FiredAction> {
        let mut fired = Vec::new();
        for event in events {
            let Some(binding) = self
                .by_subscription
                .get(&event.subscription)
                .and_then(|id| self.bindings.get(id))
            else {
                continue;
            };

            let action = binding.pattern.action_for(event.crossing);
            if action == TimelineAction::None {
                continue;
            }
            registry.apply(binding.timeline, action);
            tracing::debug!(
                binding = ?binding.id,
                crossing = ?event.crossing,
                ?action,
                "trigger fired"
            );
            fired.push(FiredAction {
                binding: binding.id,
                timeline: binding.timeline,
                crossing: event.crossing,
                action,
            });
        }
        fired
    }

    /// Push the observer's scroll position into every scrubbed timeline;
    /// returns how many received a new progress
    pub fn update_scrubs(
        &mut self,
        observer: &ViewportObserver,
        registry: &mut TimelineRegistry,
    ) -> usize {
        let scroll = observer.scroll_position();
        let mut updated = 0;
        for binding in self.bindings.values_mut() {
            let TriggerPattern::Scrub { start, end, lag } = binding.pattern else {
                continue;
            };
            let (Ok(a), Ok(b)) = (
                observer.resolve(binding.element, start),
                observer.resolve(binding.element, end),
            ) else {
                continue;
            };
            let progress = Interpolation::inverse_lerp(a, b, scroll);
            if binding.last_progress == Some(progress) {
                continue;
            }
            if let Some(timeline) = registry.get_mut(binding.timeline) {
                timeline.scrub_to(progress, lag);
                binding.last_progress = Some(progress);
                updated += 1;
            }
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ElementBox, Layout, Viewport};
    use folio_motion::{
        Easing, PlaybackState, Property, PropertySet, Step, Timeline,
    };

    struct Fixture {
        observer: ViewportObserver,
        registry: TimelineRegistry,
        binder: TriggerBinder,
        section: ElementId,
    }

    /// Viewport 100 high, document scrolls 0..=1000, the section's
    /// `top bottom` is at 200 and `bottom bottom` at 800
    fn fixture() -> Fixture {
        let mut layout = Layout::new(Viewport {
            width: 1000.0,
            height: 100.0,
        });
        let section = layout.insert("section", ElementBox::new(0.0, 300.0, 1000.0, 600.0), None);
        layout.insert("footer", ElementBox::new(0.0, 900.0, 1000.0, 200.0), None);
        Fixture {
            observer: ViewportObserver::new(layout),
            registry: TimelineRegistry::new(),
            binder: TriggerBinder::new(),
            section,
        }
    }

    fn linear_timeline(name: &str) -> Timeline {
        Timeline::new(name, "test").with_step(
            Step::from_to(
                vec![ElementId::new()],
                PropertySet::new().with(Property::Opacity, 0.0),
                PropertySet::new().with(Property::Opacity, 1.0),
                1.0,
            )
            .with_easing(Easing::Linear),
        )
    }

    fn threshold(s: &str) -> Threshold {
        s.parse().unwrap()
    }

    impl Fixture {
        fn scroll_to_fraction(&mut self, fraction: f32) -> Vec<FiredAction> {
            let max = self.observer.layout().max_scroll();
            self.observer.set_scroll(fraction * max);
            let sample = self.observer.sample();
            let fired = self.binder.dispatch(&sample.events, &mut self.registry);
            self.binder.update_scrubs(&self.observer, &mut self.registry);
            fired
        }

        fn progress(&self, id: TimelineId) -> f32 {
            self.registry.get(id).unwrap().progress()
        }
    }

    #[test]
    fn test_scrub_maps_and_clamps() {
        let mut f = fixture();
        let tl = f.registry.insert(linear_timeline("scrub"));
        f.binder
            .bind(
                &mut f.observer,
                &f.registry,
                tl,
                f.section,
                TriggerPattern::scrub(threshold("top bottom"), threshold("bottom bottom"), None),
            )
            .unwrap();

        f.scroll_to_fraction(0.5);
        assert!((f.progress(tl) - 0.5).abs() < 1e-5);
        f.scroll_to_fraction(0.1);
        assert_eq!(f.progress(tl), 0.0);
        f.scroll_to_fraction(0.95);
        assert_eq!(f.progress(tl), 1.0);
    }

    #[test]
    fn test_scrub_is_monotonic() {
        let mut f = fixture();
        let tl = f.registry.insert(linear_timeline("scrub"));
        f.binder
            .bind(
                &mut f.observer,
                &f.registry,
                tl,
                f.section,
                TriggerPattern::scrub(threshold("top bottom"), threshold("bottom bottom"), None),
            )
            .unwrap();

        let mut previous = 0.0;
        for step in 0..=40 {
            f.scroll_to_fraction(step as f32 / 40.0);
            let progress = f.progress(tl);
            assert!(progress >= previous, "progress fell at step {step}");
            previous = progress;
        }
    }

    #[test]
    fn test_fast_scroll_fires_enter_then_leave() {
        let mut f = fixture();
        let tl = f.registry.insert(linear_timeline("toggle"));
        f.binder
            .bind(
                &mut f.observer,
                &f.registry,
                tl,
                f.section,
                TriggerPattern::Toggle {
                    start: threshold("top bottom"),
                    end: Some(threshold("bottom bottom")),
                    enter: TimelineAction::Play,
                    leave: TimelineAction::Reverse,
                    reversible: true,
                },
            )
            .unwrap();

        assert!(f.scroll_to_fraction(0.0).is_empty());
        let fired = f.scroll_to_fraction(1.0);
        let sequence: Vec<_> = fired.iter().map(|a| (a.crossing, a.action)).collect();
        assert_eq!(
            sequence,
            vec![
                (CrossingType::Enter, TimelineAction::Play),
                (CrossingType::Leave, TimelineAction::Reverse),
            ]
        );
    }

    #[test]
    fn test_non_reversible_toggle_holds_final_state() {
        let mut f = fixture();
        let tl = f.registry.insert(linear_timeline("toggle"));
        f.binder
            .bind(
                &mut f.observer,
                &f.registry,
                tl,
                f.section,
                TriggerPattern::Toggle {
                    start: threshold("top bottom"),
                    end: Some(threshold("bottom bottom")),
                    enter: TimelineAction::Play,
                    leave: TimelineAction::Reverse,
                    reversible: false,
                },
            )
            .unwrap();

        f.scroll_to_fraction(0.5);
        f.registry.tick(2.0);
        assert!(f.scroll_to_fraction(1.0).is_empty());
        assert!(f.scroll_to_fraction(0.0).is_empty());
        f.registry.tick(2.0);

        let timeline = f.registry.get(tl).unwrap();
        assert_eq!(timeline.progress(), 1.0);
        assert_eq!(timeline.state(), PlaybackState::Settled);
    }

    #[test]
    fn test_reveal_reverses_on_leave_back() {
        let mut f = fixture();
        let tl = f.registry.insert(linear_timeline("reveal"));
        f.binder
            .bind(
                &mut f.observer,
                &f.registry,
                tl,
                f.section,
                TriggerPattern::reveal(threshold("top bottom")),
            )
            .unwrap();

        f.scroll_to_fraction(0.5);
        assert_eq!(f.registry.get(tl).unwrap().state(), PlaybackState::Playing);
        f.registry.tick(0.5);
        let fired = f.scroll_to_fraction(0.0);
        assert_eq!(fired[0].crossing, CrossingType::LeaveBack);
        assert_eq!(f.registry.get(tl).unwrap().state(), PlaybackState::Reversing);
    }

    #[test]
    fn test_overlapping_scrubs_conflict() {
        let mut f = fixture();
        let tl = f.registry.insert(linear_timeline("scrub"));
        let first = f
            .binder
            .bind(
                &mut f.observer,
                &f.registry,
                tl,
                f.section,
                TriggerPattern::scrub(threshold("top bottom"), threshold("bottom bottom"), None),
            )
            .unwrap();

        let overlapping = f.binder.bind(
            &mut f.observer,
            &f.registry,
            tl,
            f.section,
            TriggerPattern::scrub(threshold("center bottom"), threshold("bottom top"), None),
        );
        assert_eq!(
            overlapping,
            Err(BindError::BindingConflict {
                timeline: tl,
                existing: first
            })
        );

        let disjoint = f.binder.bind(
            &mut f.observer,
            &f.registry,
            tl,
            f.section,
            TriggerPattern::scrub(threshold("bottom bottom"), threshold("bottom top"), None),
        );
        assert!(disjoint.is_ok());

        let other = f.registry.insert(linear_timeline("other"));
        assert!(f
            .binder
            .bind(
                &mut f.observer,
                &f.registry,
                other,
                f.section,
                TriggerPattern::scrub(threshold("top bottom"), threshold("bottom bottom"), None),
            )
            .is_ok());
        assert_eq!(f.observer.subscription_count(), 3);
    }

    #[test]
    fn test_bind_errors() {
        let mut f = fixture();
        let missing = TimelineId::new();
        assert_eq!(
            f.binder.bind(
                &mut f.observer,
                &f.registry,
                missing,
                f.section,
                TriggerPattern::reveal(threshold("top 75%")),
            ),
            Err(BindError::UnknownTimeline(missing))
        );

        let tl = f.registry.insert(linear_timeline("reveal"));
        f.observer.layout_mut().detach(f.section);
        assert_eq!(
            f.binder.bind(
                &mut f.observer,
                &f.registry,
                tl,
                f.section,
                TriggerPattern::reveal(threshold("top 75%")),
            ),
            Err(BindError::InvalidTarget(ObserverError::InvalidTarget(f.section)))
        );
    }

    #[test]
    fn test_dispatch_only_touches_bound_timeline() {
        let mut f = fixture();
        let bound = f.registry.insert(linear_timeline("bound"));
        let unrelated = f.registry.insert(linear_timeline("unrelated"));
        f.binder
            .bind(
                &mut f.observer,
                &f.registry,
                bound,
                f.section,
                TriggerPattern::reveal(threshold("top bottom")),
            )
            .unwrap();

        f.scroll_to_fraction(0.5);
        assert_eq!(f.registry.get(bound).unwrap().state(), PlaybackState::Playing);
        assert_eq!(f.registry.get(unrelated).unwrap().state(), PlaybackState::Ready);
    }

    #[test]
    fn test_unbind_and_release_dropped() {
        let mut f = fixture();
        let tl = f.registry.insert(linear_timeline("reveal"));
        let id = f
            .binder
            .bind(
                &mut f.observer,
                &f.registry,
                tl,
                f.section,
                TriggerPattern::reveal(threshold("top bottom")),
            )
            .unwrap();
        let subscription = f.binder.get(id).unwrap().subscription;
        assert!(f.binder.owns(subscription));
        assert_eq!(f.binder.release_dropped(&[subscription]), 1);
        assert!(f.binder.is_empty());
        assert_eq!(f.binder.unbind(id), None);
    }
}
