// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline engine for Folio.
//!
//! This crate provides the animation side of the page choreography:
//! - Easing curves with GSAP-style names
//! - Property sets applied to page elements
//! - Staggered steps laid out on a timeline
//! - Playback state machine with repeat and yoyo
//! - An explicit registry owned by the page lifecycle
//!
//! ## Architecture
//!
//! Timelines never read the clock. They advance only when the page ticks
//! them with a frame delta, or when a trigger scrubs them to a progress
//! value, so every transition can be exercised without a real frame loop.

pub mod easing;
pub mod keyframe;
pub mod registry;
pub mod step;
pub mod target;
pub mod timeline;
pub mod tween;

pub use easing::{Easing, EasingParseError};
pub use keyframe::{Interpolation, Property, PropertySet};
pub use registry::TimelineRegistry;
pub use step::{Step, StepId};
pub use target::ElementId;
pub use timeline::{
    Direction, PlaybackState, RepeatPolicy, Timeline, TimelineAction, TimelineId,
};
pub use tween::{interpolate_offset, smooth_toward, Transition};
