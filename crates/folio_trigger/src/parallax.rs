// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer parallax.
//!
//! A tracked hot zone maps the pointer position inside it to a sample in
//! `[-0.5, 0.5]` on each axis. Targets ease toward `gains * sample` while
//! the pointer moves and back to zero when it leaves. Offsets are deltas
//! composed on top of timeline output.

use crate::layout::Layout;
use folio_motion::{Easing, ElementId, Property, PropertySet, Transition};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tracked hot zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerSubscriptionId(pub Uuid);

impl PointerSubscriptionId {
    /// Create a new random subscription ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PointerSubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Pointer position relative to a hot zone's center, as a fraction of its
/// size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerSample {
    /// Horizontal offset, -0.5 at the left edge
    pub x: f32,
    /// Vertical offset, -0.5 at the top edge
    pub y: f32,
}

impl PointerSample {
    /// Sample from fractions of the zone, clamped to its edges
    pub fn from_point(fx: f32, fy: f32) -> Self {
        Self {
            x: (fx - 0.5).clamp(-0.5, 0.5),
            y: (fy - 0.5).clamp(-0.5, 0.5),
        }
    }

    /// Pointer at the zone's center
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// How strongly a target follows the pointer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxGains {
    /// Horizontal translation per unit of `sample.x`
    pub x: f32,
    /// Vertical translation per unit of `sample.y`
    pub y: f32,
    /// Rotation about the horizontal axis per unit of `sample.y`
    pub rotate_x: f32,
    /// Rotation about the vertical axis per unit of `sample.x`
    pub rotate_y: f32,
    /// Flat scale delta while the pointer is inside
    pub scale: f32,
}

impl ParallaxGains {
    /// Offset for a sample, clamped to the settings' maxima
    pub fn offset(&self, sample: PointerSample, settings: &ParallaxSettings) -> PropertySet {
        let translate = |v: f32| v.clamp(-settings.max_translate, settings.max_translate);
        let rotate = |v: f32| v.clamp(-settings.max_rotate, settings.max_rotate);
        let mut out = PropertySet::new();
        if self.x != 0.0 {
            out.set(Property::X, translate(self.x * sample.x));
        }
        if self.y != 0.0 {
            out.set(Property::Y, translate(self.y * sample.y));
        }
        if self.rotate_x != 0.0 {
            out.set(Property::RotateX, rotate(self.rotate_x * sample.y));
        }
        if self.rotate_y != 0.0 {
            out.set(Property::RotateY, rotate(self.rotate_y * sample.x));
        }
        if self.scale != 0.0 {
            out.set(Property::Scale, self.scale);
        }
        out
    }
}

/// A target moved by a hot zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallaxTarget {
    /// Element receiving the offset
    pub element: ElementId,
    /// Gains
    pub gains: ParallaxGains,
}

/// Timing and bounds for one hot zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    /// Seconds to reach a new pointer offset
    pub follow_duration: f32,
    /// Easing toward a new pointer offset
    pub follow_easing: Easing,
    /// Seconds to return to neutral after the pointer leaves
    pub reset_duration: f32,
    /// Easing back to neutral
    pub reset_easing: Easing,
    /// Largest translation in pixels
    pub max_translate: f32,
    /// Largest rotation in degrees
    pub max_rotate: f32,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            follow_duration: 0.5,
            follow_easing: Easing::PowerOut(2),
            reset_duration: 0.5,
            reset_easing: Easing::PowerOut(2),
            max_translate: 60.0,
            max_rotate: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
struct ZoneSubscription {
    zone: ElementId,
    targets: Vec<ParallaxTarget>,
    settings: ParallaxSettings,
    transitions: IndexMap<ElementId, Transition>,
    pending_move: Option<PointerSample>,
    pending_leave: bool,
    inside: bool,
}

impl ZoneSubscription {
    fn retarget_all(&mut self, sample: Option<PointerSample>) {
        for target in &self.targets {
            let transition = self
                .transitions
                .entry(target.element)
                .or_insert_with(|| Transition::settled(PropertySet::new()));
            match sample {
                Some(sample) => retarget_offset(
                    transition,
                    target.gains.offset(sample, &self.settings),
                    self.settings.follow_duration,
                    self.settings.follow_easing,
                ),
                None => retarget_offset(
                    transition,
                    PropertySet::new(),
                    self.settings.reset_duration,
                    self.settings.reset_easing,
                ),
            }
        }
    }
}

/// Retarget an offset transition; a property missing on either side is a
/// zero offset, never the property's neutral value
fn retarget_offset(transition: &mut Transition, mut to: PropertySet, duration: f32, easing: Easing) {
    let mut from = transition.value();
    for property in to.properties() {
        if from.get(property).is_none() {
            from.set(property, 0.0);
        }
    }
    for property in from.properties() {
        if to.get(property).is_none() {
            to.set(property, 0.0);
        }
    }
    *transition = Transition::settled(from);
    transition.retarget(to, duration, easing);
}

/// Eases registered targets toward pointer-driven offsets
#[derive(Debug, Default)]
pub struct ParallaxAdapter {
    subscriptions: IndexMap<PointerSubscriptionId, ZoneSubscription>,
}

impl ParallaxAdapter {
    /// Create an adapter with no hot zones
    pub fn new() -> Self {
        Self::default()
    }

    /// Track pointer movement over `zone`
    pub fn track(
        &mut self,
        zone: ElementId,
        targets: Vec<ParallaxTarget>,
        settings: ParallaxSettings,
    ) -> PointerSubscriptionId {
        let id = PointerSubscriptionId::new();
        self.subscriptions.insert(
            id,
            ZoneSubscription {
                zone,
                targets,
                settings,
                transitions: IndexMap::new(),
                pending_move: None,
                pending_leave: false,
                inside: false,
            },
        );
        id
    }

    /// Stop tracking; unknown ids are ignored
    pub fn untrack(&mut self, id: PointerSubscriptionId) -> bool {
        self.subscriptions.shift_remove(&id).is_some()
    }

    /// Number of tracked zones
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether no zones are tracked
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Queue a pointer position in viewport coordinates; returns how many
    /// zones it is inside
    pub fn pointer_move(&mut self, x: f32, y: f32, layout: &Layout, scroll: f32) -> usize {
        let doc_y = y + scroll;
        let mut hits = 0;
        for subscription in self.subscriptions.values_mut() {
            let hit = layout
                .rect(subscription.zone)
                .filter(|rect| rect.contains(x, doc_y) && rect.width > 0.0 && rect.height > 0.0);
            match hit {
                Some(rect) => {
                    subscription.pending_move = Some(PointerSample::from_point(
                        (x - rect.left) / rect.width,
                        (doc_y - rect.top) / rect.height,
                    ));
                    subscription.inside = true;
                    hits += 1;
                }
                None if subscription.inside => {
                    subscription.pending_leave = true;
                    subscription.inside = false;
                }
                None => {}
            }
        }
        hits
    }

    /// Queue a leave for every zone
    pub fn pointer_exit(&mut self) {
        for subscription in self.subscriptions.values_mut() {
            subscription.pending_leave = true;
            subscription.inside = false;
        }
    }

    /// Apply queued input, then advance every transition by `dt`
    ///
    /// The newest move is applied first and a queued leave last, so a leave
    /// in the same frame always wins.
    pub fn frame(&mut self, dt: f32) {
        for subscription in self.subscriptions.values_mut() {
            if let Some(sample) = subscription.pending_move.take() {
                subscription.retarget_all(Some(sample));
            }
            if std::mem::take(&mut subscription.pending_leave) {
                tracing::trace!(zone = %subscription.zone, "pointer left hot zone");
                subscription.retarget_all(None);
            }
            for transition in subscription.transitions.values_mut() {
                transition.advance(dt);
            }
        }
    }

    /// Whether any target is still moving
    pub fn is_animating(&self) -> bool {
        self.subscriptions
            .values()
            .flat_map(|s| s.transitions.values())
            .any(|t| !t.is_finished())
    }

    /// Current offset of every target; offsets from several zones add up
    pub fn offsets(&self) -> IndexMap<ElementId, PropertySet> {
        let mut out: IndexMap<ElementId, PropertySet> = IndexMap::new();
        for subscription in self.subscriptions.values() {
            for (element, transition) in &subscription.transitions {
                let entry = out.entry(*element).or_default();
                for (property, delta) in transition.value().iter() {
                    entry.set(property, entry.get(property).unwrap_or(0.0) + delta);
                }
            }
        }
        out
    }
}
