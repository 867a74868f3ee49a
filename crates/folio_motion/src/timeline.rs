// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timelines and their playback state machine.
//!
//! ```text
//! Idle -(mount)-> Ready -(play)-> Playing -(reverse)-> Reversing
//!                                    \                    |
//!                                     +--(completion)--> Settled
//! ```
//!
//! `Settled` and `Playing` go back to `Playing`/`Reversing` on later
//! commands. Teardown returns a timeline to `Idle` for good.

use crate::keyframe::PropertySet;
use crate::step::{Step, StepId};
use crate::target::ElementId;
use crate::tween::smooth_toward;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineId(pub Uuid);

impl TimelineId {
    /// Create a new random timeline ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TimelineId {
    fn default() -> Self {
        Self::new()
    }
}

/// How often a timeline repeats after its first run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatPolicy {
    /// Play once
    #[default]
    None,
    /// Repeat the given number of extra times
    Count(u32),
    /// Repeat forever
    Infinite,
}

/// Playback direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Toward the end
    #[default]
    Forward,
    /// Toward the start
    Reverse,
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Not mounted, or torn down
    #[default]
    Idle,
    /// Mounted and waiting for its first trigger
    Ready,
    /// Moving forward
    Playing,
    /// Moving backward
    Reversing,
    /// Holding its current position
    Settled,
}

/// Command a trigger can send to a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimelineAction {
    /// Do nothing
    #[default]
    None,
    /// Play forward from the current position
    Play,
    /// Play backward from the current position
    Reverse,
    /// Jump to the start and play forward
    Restart,
    /// Jump to the start and hold
    Reset,
    /// Jump to the end and hold
    Complete,
}

#[derive(Debug, Clone, Copy)]
struct ScrubTarget {
    time: f32,
    lag: f32,
}

/// A named, ordered sequence of steps owned by one page section
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Unique timeline ID
    pub id: TimelineId,
    /// Timeline name
    pub name: String,
    /// Name of the owning section
    pub section: String,
    steps: Vec<Step>,
    repeat: RepeatPolicy,
    yoyo: bool,
    time_scale: f32,
    /// Length of one iteration
    duration: f32,
    /// Elapsed time across all iterations
    time: f32,
    direction: Direction,
    state: PlaybackState,
    retired: bool,
    scrub_target: Option<ScrubTarget>,
}

impl Timeline {
    /// Create a new empty timeline
    pub fn new(name: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            id: TimelineId::new(),
            name: name.into(),
            section: section.into(),
            steps: Vec::new(),
            repeat: RepeatPolicy::None,
            yoyo: false,
            time_scale: 1.0,
            duration: 0.0,
            time: 0.0,
            direction: Direction::Forward,
            state: PlaybackState::Idle,
            retired: false,
            scrub_target: None,
        }
    }

    /// Set the repeat policy and yoyo alternation
    pub fn with_repeat(mut self, repeat: RepeatPolicy, yoyo: bool) -> Self {
        self.repeat = repeat;
        self.yoyo = yoyo;
        self
    }

    /// Set the playback speed multiplier
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale.max(0.0);
        self
    }

    /// Builder-style [`Timeline::add_step`]
    pub fn with_step(mut self, step: Step) -> Self {
        self.add_step(step);
        self
    }

    /// Append a step after the previous one, offset by its delay
    pub fn add_step(&mut self, mut step: Step) -> StepId {
        let previous_end = self.steps.last().map(Step::end).unwrap_or(0.0);
        step.place(previous_end + step.delay);
        self.duration = self.duration.max(step.end());
        let id = step.id;
        self.steps.push(step);
        id
    }

    /// Steps in order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Repeat policy
    pub fn repeat(&self) -> RepeatPolicy {
        self.repeat
    }

    /// Whether alternate iterations run backward
    pub fn yoyo(&self) -> bool {
        self.yoyo
    }

    /// Length of one iteration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Length of all iterations, `None` when repeating forever
    pub fn total_duration(&self) -> Option<f32> {
        match self.repeat {
            RepeatPolicy::None => Some(self.duration),
            RepeatPolicy::Count(n) => Some(self.duration * (n as f32 + 1.0)),
            RepeatPolicy::Infinite => None,
        }
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Elapsed time across all iterations
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Whether the timeline is mounted and not torn down
    pub fn is_live(&self) -> bool {
        !self.retired && self.state != PlaybackState::Idle
    }

    /// Whether the timeline moves on the next tick
    pub fn is_animating(&self) -> bool {
        matches!(self.state, PlaybackState::Playing | PlaybackState::Reversing)
    }

    /// Playback position as a fraction of the whole timeline
    ///
    /// Timelines that repeat forever report progress within the current
    /// iteration.
    pub fn progress(&self) -> f32 {
        let span = self.total_duration().unwrap_or(self.duration);
        if span <= f32::EPSILON {
            let started = !matches!(self.state, PlaybackState::Idle | PlaybackState::Ready);
            return if started && self.direction == Direction::Forward {
                1.0
            } else {
                0.0
            };
        }
        match self.repeat {
            RepeatPolicy::Infinite => (self.time % span) / span,
            _ => (self.time / span).clamp(0.0, 1.0),
        }
    }

    /// Move from `Idle` to `Ready`
    ///
    /// Returns false if the timeline was already mounted or torn down.
    pub fn mount(&mut self) -> bool {
        if self.retired || self.state != PlaybackState::Idle {
            return false;
        }
        self.transition(PlaybackState::Ready);
        true
    }

    /// Run a trigger command; returns whether anything changed
    pub fn apply(&mut self, action: TimelineAction) -> bool {
        match action {
            TimelineAction::None => false,
            TimelineAction::Play => self.play(),
            TimelineAction::Reverse => self.reverse(),
            TimelineAction::Restart => self.restart(),
            TimelineAction::Reset => self.reset(),
            TimelineAction::Complete => self.complete(),
        }
    }

    /// Play forward from the current position
    pub fn play(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        let before = (self.state, self.direction);
        self.scrub_target = None;
        self.direction = Direction::Forward;
        if self.at_end() {
            self.transition(PlaybackState::Settled);
        } else {
            self.transition(PlaybackState::Playing);
        }
        before != (self.state, self.direction)
    }

    /// Play backward from the current position
    pub fn reverse(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        let before = (self.state, self.direction);
        self.scrub_target = None;
        self.direction = Direction::Reverse;
        if self.time <= 0.0 {
            self.transition(PlaybackState::Settled);
        } else {
            self.transition(PlaybackState::Reversing);
        }
        before != (self.state, self.direction)
    }

    /// Jump to the start and play forward
    pub fn restart(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        self.time = 0.0;
        self.scrub_target = None;
        self.direction = Direction::Forward;
        self.transition(PlaybackState::Playing);
        true
    }

    /// Jump to the start and hold
    pub fn reset(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        self.time = 0.0;
        self.scrub_target = None;
        self.direction = Direction::Reverse;
        self.transition(PlaybackState::Settled);
        true
    }

    /// Jump to the end and hold; a timeline repeating forever keeps its
    /// position
    pub fn complete(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        if let Some(total) = self.total_duration() {
            self.time = total;
        }
        self.scrub_target = None;
        self.direction = Direction::Forward;
        self.transition(PlaybackState::Settled);
        true
    }

    /// Move the playback position to `progress` of the timeline
    ///
    /// Without `lag` the position is applied immediately and the timeline
    /// settles there. With `lag` the position is approached over the next
    /// ticks.
    pub fn scrub_to(&mut self, progress: f32, lag: Option<f32>) -> bool {
        if !self.is_live() {
            return false;
        }
        let span = self.total_duration().unwrap_or(self.duration);
        let target = progress.clamp(0.0, 1.0) * span;

        match lag {
            Some(lag) if lag > f32::EPSILON => {
                self.scrub_target = Some(ScrubTarget { time: target, lag });
                self.follow_scrub_direction(target);
            }
            _ => {
                self.scrub_target = None;
                self.direction = if target >= self.time {
                    Direction::Forward
                } else {
                    Direction::Reverse
                };
                self.time = target;
                self.transition(PlaybackState::Settled);
            }
        }
        true
    }

    /// Advance playback by `dt` seconds; returns whether the position moved
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.is_live() || dt <= 0.0 {
            return false;
        }
        let before = self.time;

        if let Some(scrub) = self.scrub_target {
            self.time = smooth_toward(self.time, scrub.time, dt, scrub.lag);
            if self.time == scrub.time {
                self.scrub_target = None;
                self.transition(PlaybackState::Settled);
            }
            return self.time != before;
        }

        let step = dt * self.time_scale;
        match self.state {
            PlaybackState::Playing => {
                self.time += step;
                if let Some(total) = self.total_duration() {
                    if self.time >= total {
                        self.time = total;
                        tracing::debug!(timeline = %self.name, "timeline completed");
                        self.transition(PlaybackState::Settled);
                    }
                }
            }
            PlaybackState::Reversing => {
                self.time -= step;
                if self.time <= 0.0 {
                    self.time = 0.0;
                    tracing::debug!(timeline = %self.name, "timeline rewound");
                    self.transition(PlaybackState::Settled);
                }
            }
            PlaybackState::Idle | PlaybackState::Ready | PlaybackState::Settled => {}
        }
        self.time != before
    }

    /// Stop the timeline for good
    ///
    /// Returns false if it was already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.retired {
            return false;
        }
        self.retired = true;
        self.scrub_target = None;
        self.transition(PlaybackState::Idle);
        true
    }

    /// Position within the current iteration, with yoyo applied
    pub fn local_time(&self) -> f32 {
        if self.duration <= f32::EPSILON {
            return 0.0;
        }
        let iterations = match self.repeat {
            RepeatPolicy::None => Some(1),
            RepeatPolicy::Count(n) => Some(n as u64 + 1),
            RepeatPolicy::Infinite => None,
        };

        let mut iteration = (self.time / self.duration).floor().max(0.0) as u64;
        let mut local = self.time - iteration as f32 * self.duration;
        if let Some(count) = iterations {
            if iteration >= count {
                iteration = count - 1;
                local = self.duration;
            }
        }

        if self.yoyo && iteration % 2 == 1 {
            self.duration - local
        } else {
            local
        }
    }

    /// Values of every target at the current position
    pub fn evaluate(&self) -> IndexMap<ElementId, PropertySet> {
        let mut out = IndexMap::new();
        if !self.is_live() {
            return out;
        }
        let local = self.local_time();
        for step in &self.steps {
            step.evaluate(local, &mut out);
        }
        out
    }

    fn at_end(&self) -> bool {
        self.total_duration()
            .is_some_and(|total| self.time >= total)
    }

    fn follow_scrub_direction(&mut self, target: f32) {
        if (target - self.time).abs() < f32::EPSILON {
            self.scrub_target = None;
            self.transition(PlaybackState::Settled);
        } else if target > self.time {
            self.direction = Direction::Forward;
            self.transition(PlaybackState::Playing);
        } else {
            self.direction = Direction::Reverse;
            self.transition(PlaybackState::Reversing);
        }
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            tracing::debug!(
                timeline = %self.name,
                section = %self.section,
                from = ?self.state,
                to = ?next,
                "timeline state changed"
            );
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::keyframe::Property;

    fn reveal(target: ElementId) -> Timeline {
        let mut timeline = Timeline::new("reveal", "about").with_step(
            Step::from_to(
                vec![target],
                PropertySet::new().with(Property::Opacity, 0.0),
                PropertySet::new().with(Property::Opacity, 1.0),
                1.0,
            )
            .with_easing(Easing::Linear),
        );
        timeline.mount();
        timeline
    }

    #[test]
    fn test_mount_moves_idle_to_ready() {
        let mut timeline = Timeline::new("t", "hero");
        assert_eq!(timeline.state(), PlaybackState::Idle);
        assert!(timeline.mount());
        assert_eq!(timeline.state(), PlaybackState::Ready);
        assert!(!timeline.mount());
    }

    #[test]
    fn test_play_until_settled() {
        let target = ElementId::new();
        let mut timeline = reveal(target);
        timeline.play();
        assert_eq!(timeline.state(), PlaybackState::Playing);

        timeline.advance(0.5);
        assert_eq!(timeline.progress(), 0.5);
        assert_eq!(timeline.evaluate()[&target].get(Property::Opacity), Some(0.5));

        timeline.advance(1.0);
        assert_eq!(timeline.state(), PlaybackState::Settled);
        assert_eq!(timeline.progress(), 1.0);
    }

    #[test]
    fn test_reverse_from_middle_and_replay() {
        let mut timeline = reveal(ElementId::new());
        timeline.play();
        timeline.advance(0.6);
        timeline.reverse();
        assert_eq!(timeline.state(), PlaybackState::Reversing);
        assert_eq!(timeline.direction(), Direction::Reverse);

        timeline.advance(0.2);
        timeline.play();
        assert_eq!(timeline.state(), PlaybackState::Playing);

        timeline.reverse();
        timeline.advance(5.0);
        assert_eq!(timeline.state(), PlaybackState::Settled);
        assert_eq!(timeline.time(), 0.0);
    }

    #[test]
    fn test_play_at_end_settles() {
        let mut timeline = reveal(ElementId::new());
        timeline.complete();
        assert!(!timeline.play());
        assert_eq!(timeline.state(), PlaybackState::Settled);
    }

    #[test]
    fn test_teardown_is_terminal() {
        let mut timeline = reveal(ElementId::new());
        timeline.play();
        assert!(timeline.teardown());
        assert_eq!(timeline.state(), PlaybackState::Idle);
        assert!(!timeline.teardown());
        assert!(!timeline.play());
        assert!(!timeline.mount());
        assert!(!timeline.advance(1.0));
        assert!(timeline.evaluate().is_empty());
    }

    #[test]
    fn test_scrub_without_lag_is_immediate() {
        let mut timeline = reveal(ElementId::new());
        timeline.scrub_to(0.25, None);
        assert_eq!(timeline.progress(), 0.25);
        assert_eq!(timeline.state(), PlaybackState::Settled);
        timeline.scrub_to(3.0, None);
        assert_eq!(timeline.progress(), 1.0);
    }

    #[test]
    fn test_scrub_with_lag_catches_up() {
        let mut timeline = reveal(ElementId::new());
        timeline.scrub_to(1.0, Some(0.5));
        assert_eq!(timeline.state(), PlaybackState::Playing);
        timeline.advance(1.0 / 60.0);
        assert!(timeline.progress() > 0.0 && timeline.progress() < 1.0);
        for _ in 0..300 {
            timeline.advance(1.0 / 60.0);
        }
        assert_eq!(timeline.progress(), 1.0);
        assert_eq!(timeline.state(), PlaybackState::Settled);
    }

    #[test]
    fn test_finite_repeat_with_yoyo() {
        let target = ElementId::new();
        let mut timeline = reveal(target).with_repeat(RepeatPolicy::Count(1), true);
        assert_eq!(timeline.total_duration(), Some(2.0));
        timeline.play();
        timeline.advance(1.5);
        assert_eq!(timeline.local_time(), 0.5);
        timeline.advance(1.0);
        assert_eq!(timeline.state(), PlaybackState::Settled);
        assert_eq!(timeline.local_time(), 0.0);
        assert_eq!(timeline.evaluate()[&target].get(Property::Opacity), Some(0.0));
    }

    #[test]
    fn test_infinite_repeat_never_settles() {
        let mut timeline = reveal(ElementId::new()).with_repeat(RepeatPolicy::Infinite, false);
        timeline.play();
        for _ in 0..100 {
            timeline.advance(0.25);
        }
        assert_eq!(timeline.state(), PlaybackState::Playing);
        assert_eq!(timeline.total_duration(), None);
        assert!(timeline.progress() < 1.0);
    }

    #[test]
    fn test_sequential_steps_with_overlap() {
        let a = ElementId::new();
        let b = ElementId::new();
        let mut timeline = Timeline::new("intro", "hero");
        timeline.add_step(Step::to(vec![a], PropertySet::new().with(Property::X, 10.0), 1.0));
        let second = Step::to(vec![b], PropertySet::new().with(Property::X, 10.0), 1.0)
            .with_delay(-0.5);
        timeline.add_step(second);
        assert_eq!(timeline.steps()[1].start(), 0.5);
        assert_eq!(timeline.duration(), 1.5);
    }
}
