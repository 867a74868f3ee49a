// SPDX-License-Identifier: MIT OR Apache-2.0
//! Page lifecycle and frame loop.
//!
//! The page owns the observer, the timeline registry, the trigger binder,
//! the parallax adapter and one controller per section. Each call to
//! [`Page::frame`] runs the whole pipeline once:
//!
//! 1. Advance any programmatic scroll
//! 2. Sample the observer
//! 3. Dispatch boundary events to the binder and the sections
//! 4. Update scrubbed timelines from the sampled position
//! 5. Tick the registry
//! 6. Apply pointer input and advance parallax
//! 7. Advance the contact form and the typewriter

use crate::blueprint::build_layout;
use crate::config::SiteConfig;
use crate::contact_form::{ContactError, ContactFields, ContactForm, FormState};
use crate::content::Content;
use crate::sections::{
    AboutController, ContactController, HeroController, MountContext, NavigationController,
    ProjectsController, SectionController, SectionError, SectionKind, TechStackController,
    Teardown,
};
use crate::typewriter::Typewriter;
use folio_motion::{PlaybackState, Property, PropertySet, TimelineRegistry, Transition};
use folio_trigger::{ParallaxAdapter, SharedObserver, TriggerBinder, ViewportObserver};
use indexmap::IndexMap;
use serde::Serialize;

/// One controller per section
#[derive(Debug, Default)]
struct Sections {
    navigation: NavigationController,
    hero: HeroController,
    about: AboutController,
    projects: ProjectsController,
    tech: TechStackController,
    contact: ContactController,
}

impl Sections {
    fn get_mut(&mut self, kind: SectionKind) -> &mut dyn SectionController {
        match kind {
            SectionKind::Navigation => &mut self.navigation,
            SectionKind::Hero => &mut self.hero,
            SectionKind::About => &mut self.about,
            SectionKind::Projects => &mut self.projects,
            SectionKind::TechStack => &mut self.tech,
            SectionKind::Contact => &mut self.contact,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PointerInput {
    Move { x: f32, y: f32 },
    Exit,
}

/// Outcome of mounting every section
#[derive(Debug, Clone, Default, Serialize)]
pub struct MountReport {
    /// Sections that mounted
    pub mounted: Vec<SectionKind>,
    /// Sections that failed, with the reason
    pub failed: Vec<(SectionKind, String)>,
}

/// State of one timeline in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSnapshot {
    /// Owning section
    pub section: String,
    /// Timeline name
    pub name: String,
    /// Playback state
    pub state: PlaybackState,
    /// Progress through the timeline
    pub progress: f32,
}

/// Presentation state of the page at one instant
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    /// Frames run so far
    pub frame: u64,
    /// Seconds simulated so far
    pub time: f32,
    /// Scroll position
    pub scroll: f32,
    /// Largest scroll position
    pub max_scroll: f32,
    /// Highlighted navigation section
    pub active_section: String,
    /// Whether the mobile menu is open
    pub menu_open: bool,
    /// Contact form state
    pub form: FormState,
    /// Hero typewriter text
    pub typewriter: String,
    /// Mounted sections
    pub mounted: Vec<SectionKind>,
    /// Sections that failed to mount, with the reason
    pub failures: IndexMap<SectionKind, String>,
    /// Every live timeline
    pub timelines: Vec<TimelineSnapshot>,
    /// Presentation values by element name, parallax included
    pub elements: IndexMap<String, IndexMap<&'static str, f32>>,
}

/// The whole page
pub struct Page {
    config: SiteConfig,
    content: Content,
    observer: SharedObserver,
    registry: TimelineRegistry,
    binder: TriggerBinder,
    parallax: ParallaxAdapter,
    sections: Sections,
    teardowns: IndexMap<SectionKind, Teardown>,
    failures: IndexMap<SectionKind, String>,
    form: ContactForm,
    typewriter: Typewriter,
    scroll_motion: Option<Transition>,
    pointer_queue: Vec<PointerInput>,
    frame: u64,
    time: f32,
}

impl Page {
    /// Lay out the page; nothing is mounted yet
    pub fn new(config: SiteConfig, content: Content) -> Self {
        let observer = ViewportObserver::new(build_layout(&config, &content)).into_shared();
        let form = ContactForm::new(config.contact);
        let typewriter = Typewriter::new(&content.roles, config.typewriter);
        Self {
            config,
            content,
            observer,
            registry: TimelineRegistry::new(),
            binder: TriggerBinder::new(),
            parallax: ParallaxAdapter::new(),
            sections: Sections::default(),
            teardowns: IndexMap::new(),
            failures: IndexMap::new(),
            form,
            typewriter,
            scroll_motion: None,
            pointer_queue: Vec::new(),
            frame: 0,
            time: 0.0,
        }
    }

    /// Site settings
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Shared observer
    pub fn observer(&self) -> &SharedObserver {
        &self.observer
    }

    /// Timeline registry
    pub fn registry(&self) -> &TimelineRegistry {
        &self.registry
    }

    /// Navigation controller
    pub fn navigation(&self) -> &NavigationController {
        &self.sections.navigation
    }

    /// Contact form
    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Hero typewriter
    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    /// Whether a section is mounted
    pub fn is_mounted(&self, kind: SectionKind) -> bool {
        self.teardowns.contains_key(&kind)
    }

    /// Sections whose last mount failed
    pub fn failures(&self) -> &IndexMap<SectionKind, String> {
        &self.failures
    }

    /// Mount every section in page order; a failing section is skipped
    pub fn mount_all(&mut self) -> MountReport {
        let mut report = MountReport::default();
        for kind in SectionKind::ALL {
            match self.mount(kind) {
                Ok(()) => report.mounted.push(kind),
                Err(err) => report.failed.push((kind, err.to_string())),
            }
        }
        tracing::info!(
            mounted = report.mounted.len(),
            failed = report.failed.len(),
            "page mounted"
        );
        report
    }

    /// Mount one section; mounting a mounted section does nothing
    ///
    /// On failure everything the section created is rolled back and the
    /// rest of the page is untouched.
    pub fn mount(&mut self, kind: SectionKind) -> Result<(), SectionError> {
        if self.is_mounted(kind) {
            tracing::debug!(section = kind.name(), "section already mounted");
            return Ok(());
        }
        let controller = self.sections.get_mut(kind);
        let mut ctx = MountContext::new(
            kind,
            &self.observer,
            &mut self.registry,
            &mut self.binder,
            &mut self.parallax,
            &self.config,
            &self.content,
        );
        match controller.mount(&mut ctx) {
            Ok(()) => {
                let teardown = ctx.finish();
                self.teardowns.insert(kind, teardown);
                self.failures.shift_remove(&kind);
                Ok(())
            }
            Err(err) => {
                let released = ctx.rollback();
                controller.unmount();
                tracing::warn!(section = kind.name(), released, "section failed to mount: {err}");
                self.failures.insert(kind, err.to_string());
                Err(err)
            }
        }
    }

    /// Tear a section down; returns how many resources were released
    pub fn unmount(&mut self, kind: SectionKind) -> usize {
        let Some(mut teardown) = self.teardowns.shift_remove(&kind) else {
            tracing::debug!(section = kind.name(), "section not mounted");
            return 0;
        };
        let released = teardown.run(&mut self.registry, &mut self.binder, &mut self.parallax);
        self.sections.get_mut(kind).unmount();
        released
    }

    /// Tear a section down and mount it again
    pub fn remount(&mut self, kind: SectionKind) -> Result<(), SectionError> {
        self.unmount(kind);
        self.mount(kind)
    }

    /// Tear every section down, in reverse page order
    pub fn unmount_all(&mut self) -> usize {
        SectionKind::ALL
            .into_iter()
            .rev()
            .map(|kind| self.unmount(kind))
            .sum()
    }

    /// Jump to a scroll position, cancelling any programmatic scroll
    pub fn scroll_to(&mut self, y: f32) -> f32 {
        self.scroll_motion = None;
        self.observer.write().set_scroll(y)
    }

    /// Scroll by `dy` pixels
    pub fn scroll_by(&mut self, dy: f32) -> f32 {
        let current = self.observer.read().scroll_position();
        self.scroll_to(current + dy)
    }

    /// Start a smooth scroll to a section; returns false for unknown
    /// sections
    pub fn navigate(&mut self, section: &str) -> bool {
        let (target, current) = {
            let observer = self.observer.read();
            (
                self.sections.navigation.scroll_target(section, observer.layout()),
                observer.scroll_position(),
            )
        };
        let Some(target) = target else {
            return false;
        };

        let mut motion = Transition::settled(PropertySet::new().with(Property::Value, current));
        motion.retarget(
            PropertySet::new().with(Property::Value, target),
            self.config.navigation.scroll_duration,
            self.config.navigation.scroll_easing,
        );
        tracing::info!(section, from = current, to = target, "navigating");
        self.scroll_motion = Some(motion);
        true
    }

    /// Whether a programmatic scroll is in progress
    pub fn is_navigating(&self) -> bool {
        self.scroll_motion.is_some()
    }

    /// Pointer moved to a viewport position; applied on the next frame
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer_queue.push(PointerInput::Move { x, y });
    }

    /// Pointer left the window; applied on the next frame
    pub fn pointer_exit(&mut self) {
        self.pointer_queue.push(PointerInput::Exit);
    }

    /// Fill in and submit the contact form
    pub fn submit_contact(&mut self, fields: ContactFields) -> Result<bool, ContactError> {
        self.form.fill(fields);
        self.form.submit()
    }

    /// Open or close the mobile menu
    pub fn toggle_menu(&mut self) -> bool {
        self.sections.navigation.toggle_menu()
    }

    /// Run one frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.frame += 1;
        self.time += dt;

        if let Some(motion) = self.scroll_motion.as_mut() {
            motion.advance(dt);
            let y = motion.value().get_or_neutral(Property::Value);
            let finished = motion.is_finished();
            self.observer.write().set_scroll(y);
            if finished {
                tracing::debug!(scroll = y, "programmatic scroll finished");
                self.scroll_motion = None;
            }
        }

        let sample = self.observer.write().sample();
        if !sample.dropped.is_empty() {
            let released = self.binder.release_dropped(&sample.dropped);
            tracing::warn!(
                dropped = sample.dropped.len(),
                released,
                "subscriptions dropped for detached elements"
            );
        }

        let fired = self.binder.dispatch(&sample.events, &mut self.registry);
        if !fired.is_empty() {
            tracing::trace!(fired = fired.len(), scroll = sample.scroll, "trigger actions fired");
        }
        for event in &sample.events {
            if self.binder.owns(event.subscription) {
                continue;
            }
            for kind in self.teardowns.keys() {
                if self.sections.get_mut(*kind).on_boundary(event) {
                    break;
                }
            }
        }

        self.binder.update_scrubs(&self.observer.read(), &mut self.registry);
        self.registry.tick(dt);

        if !self.pointer_queue.is_empty() {
            let observer = self.observer.read();
            for input in self.pointer_queue.drain(..) {
                match input {
                    PointerInput::Move { x, y } => {
                        self.parallax
                            .pointer_move(x, y, observer.layout(), observer.scroll_position());
                    }
                    PointerInput::Exit => self.parallax.pointer_exit(),
                }
            }
        }
        self.parallax.frame(dt);

        for transition in self.form.advance(dt) {
            tracing::debug!(from = ?transition.from, to = ?transition.to, "contact form advanced");
        }
        self.typewriter.advance(dt);
    }

    /// Presentation values of every animated element, parallax included
    pub fn presentation(&self) -> IndexMap<String, PropertySet> {
        let observer = self.observer.read();
        let layout = observer.layout();
        let mut values = self.registry.presentation();
        for (element, offset) in self.parallax.offsets() {
            values.entry(element).or_default().add_offset(&offset);
        }
        values
            .into_iter()
            .filter_map(|(element, set)| Some((layout.name(element)?.to_string(), set)))
            .collect()
    }

    /// Capture the current state
    pub fn snapshot(&self) -> PageSnapshot {
        let (scroll, max_scroll) = {
            let observer = self.observer.read();
            (observer.scroll_position(), observer.layout().max_scroll())
        };
        let timelines = self
            .registry
            .iter()
            .map(|timeline| TimelineSnapshot {
                section: timeline.section.clone(),
                name: timeline.name.clone(),
                state: timeline.state(),
                progress: timeline.progress(),
            })
            .collect();
        let elements = self
            .presentation()
            .into_iter()
            .map(|(name, set)| (name, set.iter().map(|(p, v)| (p.name(), v)).collect()))
            .collect();

        PageSnapshot {
            frame: self.frame,
            time: self.time,
            scroll,
            max_scroll,
            active_section: self.sections.navigation.active_section().to_string(),
            menu_open: self.sections.navigation.is_menu_open(),
            form: self.form.state(),
            typewriter: self.typewriter.text(),
            mounted: self.teardowns.keys().copied().collect(),
            failures: self.failures.clone(),
            timelines,
            elements,
        }
    }
}
