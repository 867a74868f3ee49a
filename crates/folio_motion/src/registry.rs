// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry of live timelines.
//!
//! The registry is an ordinary value owned by the page lifecycle. Sections
//! insert timelines when they mount and remove them when they tear down;
//! nothing here is global.

use crate::keyframe::PropertySet;
use crate::target::ElementId;
use crate::timeline::{Timeline, TimelineAction, TimelineId};
use indexmap::IndexMap;

/// Collection of timelines, kept in insertion order
#[derive(Debug, Default)]
pub struct TimelineRegistry {
    timelines: IndexMap<TimelineId, Timeline>,
}

impl TimelineRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a timeline and take ownership of it
    pub fn insert(&mut self, mut timeline: Timeline) -> TimelineId {
        timeline.mount();
        let id = timeline.id;
        tracing::debug!(timeline = %timeline.name, section = %timeline.section, "timeline registered");
        self.timelines.insert(id, timeline);
        id
    }

    /// Tear down and remove a timeline
    ///
    /// Removing an unknown or already removed timeline is a no-op.
    pub fn remove(&mut self, id: TimelineId) -> Option<Timeline> {
        match self.timelines.shift_remove(&id) {
            Some(mut timeline) => {
                timeline.teardown();
                Some(timeline)
            }
            None => {
                tracing::debug!(?id, "timeline already released");
                None
            }
        }
    }

    /// Get a timeline
    pub fn get(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(&id)
    }

    /// Get a mutable timeline
    pub fn get_mut(&mut self, id: TimelineId) -> Option<&mut Timeline> {
        self.timelines.get_mut(&id)
    }

    /// Whether the timeline is registered
    pub fn contains(&self, id: TimelineId) -> bool {
        self.timelines.contains_key(&id)
    }

    /// Find a timeline by section and name
    pub fn find(&self, section: &str, name: &str) -> Option<&Timeline> {
        self.timelines
            .values()
            .find(|t| t.section == section && t.name == name)
    }

    /// All timelines in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Timeline> {
        self.timelines.values()
    }

    /// Timelines owned by a section
    pub fn for_section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Timeline> + 'a {
        self.timelines.values().filter(move |t| t.section == section)
    }

    /// Number of registered timelines
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Send a command to one timeline
    pub fn apply(&mut self, id: TimelineId, action: TimelineAction) -> bool {
        self.timelines
            .get_mut(&id)
            .is_some_and(|t| t.apply(action))
    }

    /// Advance every timeline; returns how many moved
    pub fn tick(&mut self, dt: f32) -> usize {
        self.timelines
            .values_mut()
            .map(|t| t.advance(dt))
            .filter(|moved| *moved)
            .count()
    }

    /// Number of timelines currently moving
    pub fn animating_count(&self) -> usize {
        self.timelines.values().filter(|t| t.is_animating()).count()
    }

    /// Values of every animated element; later timelines win per property
    pub fn presentation(&self) -> IndexMap<ElementId, PropertySet> {
        let mut out: IndexMap<ElementId, PropertySet> = IndexMap::new();
        for timeline in self.timelines.values() {
            for (element, values) in timeline.evaluate() {
                out.entry(element).or_default().merge(&values);
            }
        }
        out
    }
}
