// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewport observer.
//!
//! The observer owns the layout and the current scroll position. Each
//! subscription remembers the position it was last sampled at, so a
//! sample reports every boundary crossed since then, however far the
//! page jumped, and nothing at all when the position has not changed.
//!
//! An element counts as past a boundary once the scroll position is at or
//! beyond the boundary's resolved position.

use crate::layout::Layout;
use crate::threshold::Threshold;
use folio_motion::ElementId;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Strong handle to an observer, held by the page
pub type SharedObserver = Arc<RwLock<ViewportObserver>>;

/// Weak handle to an observer, held by sections
pub type WeakObserver = Weak<RwLock<ViewportObserver>>;

/// Unique identifier for a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Create a new random subscription ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a boundary opens or closes the observed range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryRole {
    /// Crossing it downward enters the range
    Start,
    /// Crossing it downward leaves the range
    End,
}

/// A threshold with its role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Where the boundary lies
    pub threshold: Threshold,
    /// What crossing it means
    pub role: BoundaryRole,
}

impl Boundary {
    /// A boundary opening the range
    pub fn start(threshold: Threshold) -> Self {
        Self {
            threshold,
            role: BoundaryRole::Start,
        }
    }

    /// A boundary closing the range
    pub fn end(threshold: Threshold) -> Self {
        Self {
            threshold,
            role: BoundaryRole::End,
        }
    }
}

/// Direction the page moved between two samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollDirection {
    /// Scroll position increased
    Down,
    /// Scroll position decreased
    Up,
}

/// Kind of boundary crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingType {
    /// Down past a start boundary; the element came in from the bottom
    Enter,
    /// Down past an end boundary; the element left through the top
    Leave,
    /// Up past an end boundary; the element came back in from the top
    EnterBack,
    /// Up past a start boundary; the element left through the bottom
    LeaveBack,
}

impl CrossingType {
    /// Classify a crossing
    pub fn classify(role: BoundaryRole, direction: ScrollDirection) -> Self {
        match (role, direction) {
            (BoundaryRole::Start, ScrollDirection::Down) => Self::Enter,
            (BoundaryRole::End, ScrollDirection::Down) => Self::Leave,
            (BoundaryRole::End, ScrollDirection::Up) => Self::EnterBack,
            (BoundaryRole::Start, ScrollDirection::Up) => Self::LeaveBack,
        }
    }
}

/// One boundary crossing, consumed in the frame it was produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryEvent {
    /// Subscription the boundary belongs to
    pub subscription: SubscriptionId,
    /// Observed element
    pub element: ElementId,
    /// Index of the boundary in the subscription
    pub boundary: usize,
    /// Kind of crossing
    pub crossing: CrossingType,
    /// Direction of travel
    pub direction: ScrollDirection,
    /// Scroll position of the boundary
    pub position: f32,
}

/// Result of one observer sample
#[derive(Debug, Clone, Default)]
pub struct ObserverSample {
    /// Scroll position the sample was taken at
    pub scroll: f32,
    /// Crossings, grouped by subscription in registration order; within a
    /// group they follow the direction of travel, so scrolling up yields
    /// `EnterBack` before `LeaveBack`
    pub events: Vec<BoundaryEvent>,
    /// Subscriptions dropped because their element was detached
    pub dropped: Vec<SubscriptionId>,
}

/// Observer errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObserverError {
    /// Element is unknown or not attached to the document
    #[error("Invalid observer target: {0} is not attached")]
    InvalidTarget(ElementId),
}

#[derive(Debug, Clone)]
struct Subscription {
    element: ElementId,
    boundaries: Vec<Boundary>,
    last_scroll: Option<f32>,
}

/// Tracks the scroll position and reports boundary crossings
#[derive(Debug)]
pub struct ViewportObserver {
    layout: Layout,
    scroll: f32,
    subscriptions: IndexMap<SubscriptionId, Subscription>,
}

impl ViewportObserver {
    /// Create an observer at the top of the document
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            scroll: 0.0,
            subscriptions: IndexMap::new(),
        }
    }

    /// Wrap the observer in a shared handle
    pub fn into_shared(self) -> SharedObserver {
        Arc::new(RwLock::new(self))
    }

    /// The observed layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Mutable access to the layout (attach/detach, resize)
    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Current scroll position
    pub fn scroll_position(&self) -> f32 {
        self.scroll
    }

    /// Move the scroll position, clamped to the document; returns the
    /// applied position
    pub fn set_scroll(&mut self, y: f32) -> f32 {
        self.scroll = y.clamp(0.0, self.layout.max_scroll());
        self.scroll
    }

    /// Start observing an element
    pub fn observe(
        &mut self,
        element: ElementId,
        boundaries: Vec<Boundary>,
    ) -> Result<SubscriptionId, ObserverError> {
        if !self.layout.is_attached(element) {
            tracing::warn!(%element, "cannot observe detached element");
            return Err(ObserverError::InvalidTarget(element));
        }
        let id = SubscriptionId::new();
        self.subscriptions.insert(
            id,
            Subscription {
                element,
                boundaries,
                last_scroll: None,
            },
        );
        Ok(id)
    }

    /// Stop observing; unknown subscriptions are ignored
    pub fn unobserve(&mut self, id: SubscriptionId) -> bool {
        if self.subscriptions.shift_remove(&id).is_some() {
            true
        } else {
            tracing::debug!(?id, "subscription already released");
            false
        }
    }

    /// Whether the subscription is live
    pub fn is_observing(&self, id: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Scroll position at which `threshold` is crossed for `element`
    pub fn resolve(&self, element: ElementId, threshold: Threshold) -> Result<f32, ObserverError> {
        self.layout
            .rect(element)
            .map(|rect| threshold.resolve(rect, self.layout.viewport()))
            .ok_or(ObserverError::InvalidTarget(element))
    }

    /// Report every crossing since each subscription's last sample
    pub fn sample(&mut self) -> ObserverSample {
        let scroll = self.scroll;
        let viewport = self.layout.viewport();
        let mut sample = ObserverSample {
            scroll,
            ..ObserverSample::default()
        };

        for (id, subscription) in self.subscriptions.iter_mut() {
            let Some(rect) = self.layout.rect(subscription.element) else {
                tracing::warn!(
                    element = %subscription.element,
                    "observed element detached, dropping subscription"
                );
                sample.dropped.push(*id);
                continue;
            };
            if subscription.last_scroll == Some(scroll) {
                continue;
            }

            let previous = subscription.last_scroll.unwrap_or(f32::NEG_INFINITY);
            let direction = if scroll > previous {
                ScrollDirection::Down
            } else {
                ScrollDirection::Up
            };

            let mut crossed: Vec<(f32, usize, BoundaryRole)> = subscription
                .boundaries
                .iter()
                .enumerate()
                .filter_map(|(index, boundary)| {
                    let position = boundary.threshold.resolve(rect, viewport);
                    let hit = match direction {
                        ScrollDirection::Down => previous < position && position <= scroll,
                        ScrollDirection::Up => scroll < position && position <= previous,
                    };
                    hit.then_some((position, index, boundary.role))
                })
                .collect();

            // Stable: boundaries at the same position keep registration order
            match direction {
                ScrollDirection::Down => crossed.sort_by(|a, b| a.0.total_cmp(&b.0)),
                ScrollDirection::Up => crossed.sort_by(|a, b| b.0.total_cmp(&a.0)),
            }

            sample.events.extend(crossed.into_iter().map(|(position, index, role)| {
                BoundaryEvent {
                    subscription: *id,
                    element: subscription.element,
                    boundary: index,
                    crossing: CrossingType::classify(role, direction),
                    direction,
                    position,
                }
            }));
            subscription.last_scroll = Some(scroll);
        }

        for id in &sample.dropped {
            self.subscriptions.shift_remove(id);
        }
        if !sample.events.is_empty() {
            tracing::trace!(scroll, events = sample.events.len(), "observer sample");
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ElementBox, Viewport};

    fn observer() -> (ViewportObserver, ElementId) {
        let mut layout = Layout::new(Viewport {
            width: 1000.0,
            height: 100.0,
        });
        let section = layout.insert("section", ElementBox::new(0.0, 300.0, 1000.0, 600.0), None);
        layout.insert("footer", ElementBox::new(0.0, 900.0, 1000.0, 200.0), None);
        (ViewportObserver::new(layout), section)
    }

    fn range() -> Vec<Boundary> {
        vec![
            Boundary::start("top bottom".parse().unwrap()),
            Boundary::end("bottom bottom".parse().unwrap()),
        ]
    }

    #[test]
    fn test_observe_detached_fails() {
        let (mut observer, section) = observer();
        observer.layout_mut().detach(section);
        assert_eq!(
            observer.observe(section, range()),
            Err(ObserverError::InvalidTarget(section))
        );
        assert_eq!(observer.subscription_count(), 0);
    }

    #[test]
    fn test_unobserve_unknown_is_noop() {
        let (mut observer, section) = observer();
        let id = observer.observe(section, range()).unwrap();
        assert!(observer.unobserve(id));
        assert!(!observer.unobserve(id));
        assert!(!observer.unobserve(SubscriptionId::new()));
    }

    #[test]
    fn test_same_position_is_idempotent() {
        let (mut observer, section) = observer();
        observer.observe(section, range()).unwrap();
        observer.set_scroll(250.0);
        assert_eq!(observer.sample().events.len(), 1);
        assert!(observer.sample().events.is_empty());
        observer.set_scroll(250.0);
        assert!(observer.sample().events.is_empty());
    }

    #[test]
    fn test_crossings_in_travel_order() {
        let (mut observer, section) = observer();
        let id = observer.observe(section, range()).unwrap();
        observer.sample();

        observer.set_scroll(1000.0);
        let down = observer.sample();
        let kinds: Vec<_> = down.events.iter().map(|e| e.crossing).collect();
        assert_eq!(kinds, vec![CrossingType::Enter, CrossingType::Leave]);
        assert!(down.events.iter().all(|e| e.subscription == id));

        observer.set_scroll(0.0);
        let up = observer.sample();
        let kinds: Vec<_> = up.events.iter().map(|e| e.crossing).collect();
        assert_eq!(kinds, vec![CrossingType::EnterBack, CrossingType::LeaveBack]);
        assert!(up.events.iter().all(|e| e.direction == ScrollDirection::Up));
    }

    #[test]
    fn test_new_subscription_catches_up() {
        let (mut observer, section) = observer();
        observer.set_scroll(500.0);
        observer.observe(section, range()).unwrap();
        let sample = observer.sample();
        assert_eq!(sample.events.len(), 1);
        assert_eq!(sample.events[0].crossing, CrossingType::Enter);
        assert_eq!(sample.events[0].position, 200.0);
    }

    #[test]
    fn test_detached_element_drops_subscription() {
        let (mut observer, section) = observer();
        let id = observer.observe(section, range()).unwrap();
        observer.layout_mut().detach(section);
        observer.set_scroll(400.0);
        let sample = observer.sample();
        assert_eq!(sample.dropped, vec![id]);
        assert!(!observer.is_observing(id));
    }

    #[test]
    fn test_detach_without_scrolling_drops_subscription() {
        let (mut observer, section) = observer();
        let id = observer.observe(section, range()).unwrap();
        observer.sample();
        observer.layout_mut().detach(section);
        let sample = observer.sample();
        assert_eq!(sample.dropped, vec![id]);
        assert!(sample.events.is_empty());
        assert!(!observer.is_observing(id));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let (mut observer, _) = observer();
        assert_eq!(observer.set_scroll(-50.0), 0.0);
        assert_eq!(observer.set_scroll(5000.0), 1000.0);
    }
}
