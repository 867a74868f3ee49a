// SPDX-License-Identifier: MIT OR Apache-2.0
//! Section controllers.
//!
//! A controller builds its section's timelines, trigger bindings and
//! pointer subscriptions on mount. Everything it creates goes through a
//! [`MountContext`], which records the ids; the recorded set becomes the
//! section's [`Teardown`]. A mount that fails part way is rolled back from
//! the same record.

mod about;
mod contact;
mod hero;
mod navigation;
mod projects;
mod tech_stack;

pub use about::AboutController;
pub use contact::ContactController;
pub use hero::HeroController;
pub use navigation::NavigationController;
pub use projects::ProjectsController;
pub use tech_stack::TechStackController;

use crate::config::SiteConfig;
use crate::content::Content;
use folio_motion::{
    Easing, ElementId, Property, PropertySet, Step, Timeline, TimelineAction, TimelineId,
    TimelineRegistry,
};
use folio_trigger::{
    BindError, BindingId, Boundary, BoundaryEvent, ObserverError, ParallaxAdapter,
    ParallaxSettings, ParallaxTarget, PointerSubscriptionId, SharedObserver, SubscriptionId,
    Threshold, TriggerBinder, TriggerPattern, WeakObserver,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Page sections, in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// Navigation bar
    Navigation,
    /// Hero
    Hero,
    /// About
    About,
    /// Projects
    Projects,
    /// Tech stack marquee
    TechStack,
    /// Contact
    Contact,
}

impl SectionKind {
    /// Every section, in mount order
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Navigation,
        SectionKind::Hero,
        SectionKind::About,
        SectionKind::Projects,
        SectionKind::TechStack,
        SectionKind::Contact,
    ];

    /// Element and timeline-owner name of the section
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Navigation => "navigation",
            SectionKind::Hero => "hero",
            SectionKind::About => "about",
            SectionKind::Projects => "projects",
            SectionKind::TechStack => "tech",
            SectionKind::Contact => "contact",
        }
    }

    /// Look a section up by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Section mount errors
#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    /// A named element is not in the layout
    #[error("{section}: element {name:?} is not in the layout")]
    MissingElement {
        /// Section being mounted
        section: &'static str,
        /// Element name
        name: String,
    },

    /// A trigger could not be bound
    #[error("{section}: {source}")]
    Bind {
        /// Section being mounted
        section: &'static str,
        /// Underlying error
        #[source]
        source: BindError,
    },

    /// An element could not be observed
    #[error("{section}: {source}")]
    Observe {
        /// Section being mounted
        section: &'static str,
        /// Underlying error
        #[source]
        source: ObserverError,
    },
}

/// Behaviour of one page section
pub trait SectionController {
    /// Which section this is
    fn kind(&self) -> SectionKind;

    /// Build timelines, bindings and pointer subscriptions
    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<(), SectionError>;

    /// Forget per-mount state after teardown
    fn unmount(&mut self) {}

    /// Boundary events for subscriptions the section created directly;
    /// returns whether the event was consumed
    fn on_boundary(&mut self, _event: &BoundaryEvent) -> bool {
        false
    }
}

/// Ids created by one mount
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SectionResources {
    /// Timelines in the registry
    pub timelines: Vec<TimelineId>,
    /// Trigger bindings
    pub bindings: Vec<BindingId>,
    /// Observer subscriptions outside of bindings
    pub subscriptions: Vec<SubscriptionId>,
    /// Pointer parallax subscriptions
    pub pointers: Vec<PointerSubscriptionId>,
}

impl SectionResources {
    /// Whether nothing is recorded
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
            && self.bindings.is_empty()
            && self.subscriptions.is_empty()
            && self.pointers.is_empty()
    }
}

/// Everything a controller may touch while mounting
pub struct MountContext<'a> {
    section: SectionKind,
    observer: &'a SharedObserver,
    registry: &'a mut TimelineRegistry,
    binder: &'a mut TriggerBinder,
    parallax: &'a mut ParallaxAdapter,
    /// Site settings
    pub config: &'a SiteConfig,
    /// Page content
    pub content: &'a Content,
    created: SectionResources,
}

impl<'a> MountContext<'a> {
    /// Create a context for mounting `section`
    pub fn new(
        section: SectionKind,
        observer: &'a SharedObserver,
        registry: &'a mut TimelineRegistry,
        binder: &'a mut TriggerBinder,
        parallax: &'a mut ParallaxAdapter,
        config: &'a SiteConfig,
        content: &'a Content,
    ) -> Self {
        Self {
            section,
            observer,
            registry,
            binder,
            parallax,
            config,
            content,
            created: SectionResources::default(),
        }
    }

    /// Section being mounted
    pub fn section(&self) -> SectionKind {
        self.section
    }

    /// Resolve an element by name
    pub fn element(&self, name: &str) -> Result<ElementId, SectionError> {
        self.observer
            .read()
            .layout()
            .lookup(name)
            .ok_or_else(|| SectionError::MissingElement {
                section: self.section.name(),
                name: name.to_string(),
            })
    }

    /// Resolve `count` elements named `group.0`, `group.1`, ...
    pub fn elements(&self, group: &str, count: usize) -> Result<Vec<ElementId>, SectionError> {
        (0..count)
            .map(|index| self.element(&crate::blueprint::item(group, index)))
            .collect()
    }

    /// Register a timeline owned by this section
    pub fn add_timeline(&mut self, timeline: Timeline) -> TimelineId {
        let id = self.registry.insert(timeline);
        self.created.timelines.push(id);
        id
    }

    /// Register a timeline and start playing it
    pub fn play_timeline(&mut self, timeline: Timeline) -> TimelineId {
        let id = self.add_timeline(timeline);
        self.registry.apply(id, TimelineAction::Play);
        id
    }

    /// Register a timeline revealed when `trigger` crosses `start`
    pub fn reveal(
        &mut self,
        timeline: Timeline,
        trigger: ElementId,
        start: Threshold,
    ) -> Result<TimelineId, SectionError> {
        let id = self.add_timeline(timeline);
        self.bind(id, trigger, TriggerPattern::reveal(start))?;
        Ok(id)
    }

    /// Register a timeline whose progress follows scrolling between two
    /// thresholds of `trigger`
    pub fn scrub(
        &mut self,
        timeline: Timeline,
        trigger: ElementId,
        start: Threshold,
        end: Threshold,
        lag: Option<f32>,
    ) -> Result<TimelineId, SectionError> {
        let id = self.add_timeline(timeline);
        self.bind(id, trigger, TriggerPattern::scrub(start, end, lag))?;
        Ok(id)
    }

    /// Bind a registered timeline to an element's boundaries
    pub fn bind(
        &mut self,
        timeline: TimelineId,
        element: ElementId,
        pattern: TriggerPattern,
    ) -> Result<BindingId, SectionError> {
        let mut observer = self.observer.write();
        let id = self
            .binder
            .bind(&mut observer, self.registry, timeline, element, pattern)
            .map_err(|source| SectionError::Bind {
                section: self.section.name(),
                source,
            })?;
        self.created.bindings.push(id);
        Ok(id)
    }

    /// Observe boundaries directly; events arrive through
    /// [`SectionController::on_boundary`]
    pub fn observe(
        &mut self,
        element: ElementId,
        boundaries: Vec<Boundary>,
    ) -> Result<SubscriptionId, SectionError> {
        let id = self
            .observer
            .write()
            .observe(element, boundaries)
            .map_err(|source| SectionError::Observe {
                section: self.section.name(),
                source,
            })?;
        self.created.subscriptions.push(id);
        Ok(id)
    }

    /// Track pointer movement over a hot zone
    pub fn track_pointer(
        &mut self,
        zone: ElementId,
        targets: Vec<ParallaxTarget>,
        settings: ParallaxSettings,
    ) -> PointerSubscriptionId {
        let id = self.parallax.track(zone, targets, settings);
        self.created.pointers.push(id);
        id
    }

    /// Parallax settings with the configured bounds
    pub fn parallax_settings(&self, follow_duration: f32, reset_duration: f32) -> ParallaxSettings {
        ParallaxSettings {
            follow_duration,
            reset_duration,
            max_translate: self.config.parallax.max_translate,
            max_rotate: self.config.parallax.max_rotate,
            ..Default::default()
        }
    }

    /// Finish a successful mount
    pub fn finish(self) -> Teardown {
        tracing::info!(
            section = self.section.name(),
            timelines = self.created.timelines.len(),
            bindings = self.created.bindings.len(),
            "section mounted"
        );
        Teardown::new(self.section, Arc::downgrade(self.observer), self.created)
    }

    /// Undo everything a failed mount created
    pub fn rollback(self) -> usize {
        let mut teardown = Teardown::new(self.section, Arc::downgrade(self.observer), self.created);
        teardown.run(self.registry, self.binder, self.parallax)
    }
}

/// Releases everything one mount created
///
/// Running a teardown twice is a no-op, and a dropped observer only skips
/// the unobserve calls.
#[derive(Debug)]
pub struct Teardown {
    section: SectionKind,
    observer: WeakObserver,
    resources: SectionResources,
}

impl Teardown {
    fn new(section: SectionKind, observer: WeakObserver, resources: SectionResources) -> Self {
        Self {
            section,
            observer,
            resources,
        }
    }

    /// Section this teardown belongs to
    pub fn section(&self) -> SectionKind {
        self.section
    }

    /// Ids still held
    pub fn resources(&self) -> &SectionResources {
        &self.resources
    }

    /// Release everything; returns how many resources were released
    pub fn run(
        &mut self,
        registry: &mut TimelineRegistry,
        binder: &mut TriggerBinder,
        parallax: &mut ParallaxAdapter,
    ) -> usize {
        let resources = std::mem::take(&mut self.resources);
        if resources.is_empty() {
            tracing::debug!(section = self.section.name(), "teardown already ran");
            return 0;
        }

        let mut subscriptions = resources.subscriptions;
        subscriptions.extend(resources.bindings.iter().filter_map(|id| binder.unbind(*id)));

        let mut released = resources.bindings.len();
        match self.observer.upgrade() {
            Some(observer) => {
                let mut observer = observer.write();
                for subscription in &subscriptions {
                    if !observer.unobserve(*subscription) {
                        tracing::debug!(?subscription, "subscription already dropped");
                    }
                }
                released += subscriptions.len();
            }
            None => tracing::debug!(
                section = self.section.name(),
                "observer gone, skipping unobserve"
            ),
        }

        for pointer in &resources.pointers {
            if !parallax.untrack(*pointer) {
                tracing::debug!(?pointer, "pointer subscription already released");
            }
        }
        for timeline in &resources.timelines {
            registry.remove(*timeline);
        }
        released += resources.pointers.len() + resources.timelines.len();

        tracing::info!(section = self.section.name(), released, "section torn down");
        released
    }
}

/// `from` values of the common "fade up" reveal
pub(crate) fn faded_up(y: f32) -> PropertySet {
    PropertySet::new()
        .with(Property::Y, y)
        .with(Property::Opacity, 0.0)
}

/// Settled values of the common "fade up" reveal
pub(crate) fn settled() -> PropertySet {
    PropertySet::new()
        .with(Property::Y, 0.0)
        .with(Property::Opacity, 1.0)
}

/// Fade targets in while rising from `y` below
pub(crate) fn fade_up(targets: Vec<ElementId>, y: f32, duration: f32) -> Step {
    Step::from_to(targets, faded_up(y), settled(), duration).with_easing(Easing::PowerOut(3))
}

/// Parse a threshold written in source
pub(crate) fn at(threshold: &str) -> Threshold {
    threshold.parse().unwrap_or_else(|err| {
        tracing::error!("invalid built-in threshold: {err}");
        Threshold::new(0.0, 1.0)
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::blueprint::build_layout;
    use folio_trigger::ViewportObserver;

    /// Registry, binder, parallax and a shared observer over the default
    /// page layout
    pub(crate) struct Harness {
        pub observer: SharedObserver,
        pub registry: TimelineRegistry,
        pub binder: TriggerBinder,
        pub parallax: ParallaxAdapter,
        pub config: SiteConfig,
        pub content: Content,
    }

    impl Harness {
        pub fn new() -> Self {
            let config = SiteConfig::default();
            let content = Content::default();
            let observer = ViewportObserver::new(build_layout(&config, &content)).into_shared();
            Self {
                observer,
                registry: TimelineRegistry::new(),
                binder: TriggerBinder::new(),
                parallax: ParallaxAdapter::new(),
                config,
                content,
            }
        }

        pub fn mount(
            &mut self,
            controller: &mut dyn SectionController,
        ) -> Result<Teardown, SectionError> {
            let mut ctx = MountContext::new(
                controller.kind(),
                &self.observer,
                &mut self.registry,
                &mut self.binder,
                &mut self.parallax,
                &self.config,
                &self.content,
            );
            match controller.mount(&mut ctx) {
                Ok(()) => Ok(ctx.finish()),
                Err(err) => {
                    ctx.rollback();
                    Err(err)
                }
            }
        }

        pub fn teardown(&mut self, teardown: &mut Teardown) -> usize {
            teardown.run(&mut self.registry, &mut self.binder, &mut self.parallax)
        }

        /// Timeline names and shapes of a section, sorted
        pub fn timeline_set(&self, section: &str) -> Vec<(String, usize, String)> {
            let mut set: Vec<_> = self
                .registry
                .for_section(section)
                .map(|t| {
                    (
                        t.name.clone(),
                        t.steps().len(),
                        format!("{:.3} {:?} {:?}", t.duration(), t.state(), t.repeat()),
                    )
                })
                .collect();
            set.sort();
            set
        }
    }

    #[test]
    fn test_section_names_round_trip() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(SectionKind::from_name("footer"), None);
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let mut harness = Harness::new();
        let mut about = AboutController::default();
        let mut teardown = harness.mount(&mut about).unwrap();
        assert!(harness.registry.for_section("about").count() > 0);
        assert!(!harness.binder.is_empty());
        assert_eq!(harness.parallax.len(), 1);

        assert!(harness.teardown(&mut teardown) > 0);
        assert_eq!(harness.registry.for_section("about").count(), 0);
        assert!(harness.binder.is_empty());
        assert!(harness.parallax.is_empty());
        assert_eq!(harness.observer.read().subscription_count(), 0);

        assert_eq!(harness.teardown(&mut teardown), 0);
    }

    #[test]
    fn test_teardown_after_observer_dropped() {
        let mut harness = Harness::new();
        let mut projects = ProjectsController::default();
        let mut teardown = harness.mount(&mut projects).unwrap();

        let replacement = ViewportObserver::new(build_layout(&harness.config, &harness.content));
        drop(std::mem::replace(&mut harness.observer, replacement.into_shared()));

        assert!(harness.teardown(&mut teardown) > 0);
        assert_eq!(harness.registry.for_section("projects").count(), 0);
        assert!(harness.binder.is_empty());
    }

    #[test]
    fn test_failed_mount_rolls_back() {
        let mut harness = Harness::new();
        {
            let mut observer = harness.observer.write();
            let about = observer.layout().lookup("about").unwrap();
            observer.layout_mut().detach(about);
        }
        let mut about = AboutController::default();
        let err = harness.mount(&mut about).unwrap_err();
        assert!(matches!(err, SectionError::Bind { section: "about", .. }));
        assert_eq!(harness.registry.for_section("about").count(), 0);
        assert!(harness.binder.is_empty());
        assert!(harness.parallax.is_empty());
        assert_eq!(harness.observer.read().subscription_count(), 0);
    }

    #[test]
    fn test_remount_yields_identical_timelines() {
        let mut harness = Harness::new();
        let mut controllers: Vec<Box<dyn SectionController>> = vec![
            Box::new(NavigationController::default()),
            Box::new(HeroController::default()),
            Box::new(AboutController::default()),
            Box::new(ProjectsController::default()),
            Box::new(TechStackController::default()),
            Box::new(ContactController::default()),
        ];
        for controller in &mut controllers {
            let name = controller.kind().name();
            let mut first = harness.mount(controller.as_mut()).unwrap();
            let before = harness.timeline_set(name);
            assert!(!before.is_empty(), "{name} built no timelines");

            harness.teardown(&mut first);
            controller.unmount();
            assert!(harness.timeline_set(name).is_empty());

            let mut second = harness.mount(controller.as_mut()).unwrap();
            assert_eq!(harness.timeline_set(name), before, "{name} changed on remount");
            harness.teardown(&mut second);
            controller.unmount();
        }
        assert!(harness.registry.is_empty());
        assert_eq!(harness.observer.read().subscription_count(), 0);
    }
}
