// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scroll and pointer triggers for Folio.
//!
//! This crate turns input into timeline commands:
//! - A layout model of named element boxes
//! - Thresholds such as `"top 75%"` resolved against that layout
//! - A viewport observer reporting boundary crossings
//! - A trigger binder mapping crossings to play/reverse/scrub
//! - A pointer parallax adapter easing targets toward pointer offsets
//!
//! ## Architecture
//!
//! Data flows one way: the observer samples the scroll position once per
//! frame and emits boundary events; the binder turns those events into
//! commands on the bound timelines. Pointer parallax runs on its own and
//! produces additive offsets.

pub mod binder;
pub mod layout;
pub mod observer;
pub mod parallax;
pub mod threshold;

pub use binder::{BindError, Binding, BindingId, FiredAction, TriggerBinder, TriggerPattern};
pub use layout::{ElementBox, Layout, Viewport};
pub use observer::{
    Boundary, BoundaryEvent, BoundaryRole, CrossingType, ObserverError, ObserverSample,
    ScrollDirection, SharedObserver, SubscriptionId, ViewportObserver, WeakObserver,
};
pub use parallax::{
    ParallaxAdapter, ParallaxGains, ParallaxSettings, ParallaxTarget, PointerSample,
    PointerSubscriptionId,
};
pub use threshold::{Threshold, ThresholdParseError};
