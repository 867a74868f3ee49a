// SPDX-License-Identifier: MIT OR Apache-2.0
//! Navigation bar: intro, reading progress, active section and menu.

use super::{at, MountContext, SectionController, SectionError, SectionKind};
use crate::blueprint::{NAV, PAGE};
use crate::content::NavItem;
use folio_motion::{Easing, Property, PropertySet, Step, Timeline};
use folio_trigger::{Boundary, BoundaryEvent, CrossingType, Layout, SubscriptionId};
use indexmap::IndexMap;

/// Navigation controller
#[derive(Debug)]
pub struct NavigationController {
    items: Vec<NavItem>,
    active: String,
    menu_open: bool,
    tracking: IndexMap<SubscriptionId, String>,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            active: "hero".to_string(),
            menu_open: false,
            tracking: IndexMap::new(),
        }
    }
}

impl NavigationController {
    /// Section currently highlighted
    pub fn active_section(&self) -> &str {
        &self.active
    }

    /// Whether the mobile menu is open
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Open or close the mobile menu; returns the new state
    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        tracing::debug!(open = self.menu_open, "menu toggled");
        self.menu_open
    }

    /// Scroll position that brings `section` to the top, closing the menu
    ///
    /// Returns `None` for sections that are not in the layout.
    pub fn scroll_target(&mut self, section: &str, layout: &Layout) -> Option<f32> {
        self.menu_open = false;
        let Some(rect) = layout.lookup(section).and_then(|id| layout.rect(id)) else {
            tracing::warn!(section, "cannot scroll to missing section");
            return None;
        };
        Some(rect.top.clamp(0.0, layout.max_scroll()))
    }
}

impl SectionController for NavigationController {
    fn kind(&self) -> SectionKind {
        SectionKind::Navigation
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<(), SectionError> {
        let section = self.kind().name();
        self.items = ctx.content.nav_items.clone();
        self.tracking.clear();

        let nav = ctx.element(NAV)?;
        ctx.play_timeline(
            Timeline::new("intro", section).with_step(
                Step::from_to(
                    vec![nav],
                    PropertySet::new()
                        .with(Property::Y, -100.0)
                        .with(Property::Opacity, 0.0),
                    PropertySet::new()
                        .with(Property::Y, 0.0)
                        .with(Property::Opacity, 1.0),
                    1.0,
                )
                .with_easing(Easing::PowerOut(3))
                .with_delay(0.5),
            ),
        );

        let progress = ctx.element("nav.progress")?;
        let page = ctx.element(PAGE)?;
        ctx.scrub(
            Timeline::new("progress", section).with_step(
                Step::from_to(
                    vec![progress],
                    PropertySet::new().with(Property::ScaleX, 0.0),
                    PropertySet::new().with(Property::ScaleX, 1.0),
                    1.0,
                )
                .with_easing(Easing::Linear),
            ),
            page,
            at("top top"),
            at("bottom bottom"),
            Some(0.3),
        )?;

        // A missing section only loses its highlight
        for item in &self.items {
            let Ok(element) = ctx.element(&item.section) else {
                tracing::warn!(section = %item.section, "nav item has no section");
                continue;
            };
            let boundaries = vec![
                Boundary::start(at("top center")),
                Boundary::end(at("bottom center")),
            ];
            match ctx.observe(element, boundaries) {
                Ok(subscription) => {
                    self.tracking.insert(subscription, item.section.clone());
                }
                Err(err) => tracing::warn!("not tracking {}: {err}", item.section),
            }
        }
        Ok(())
    }

    fn unmount(&mut self) {
        self.tracking.clear();
        self.menu_open = false;
    }

    fn on_boundary(&mut self, event: &BoundaryEvent) -> bool {
        let Some(section) = self.tracking.get(&event.subscription) else {
            return false;
        };
        if matches!(event.crossing, CrossingType::Enter | CrossingType::EnterBack)
            && self.active != *section
        {
            tracing::info!(from = %self.active, to = %section, "active section changed");
            self.active.clone_from(section);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::tests::Harness;
    use folio_motion::TimelineAction;

    fn scroll(harness: &mut Harness, nav: &mut NavigationController, y: f32) {
        let sample = {
            let mut observer = harness.observer.write();
            observer.set_scroll(y);
            observer.sample()
        };
        harness.binder.dispatch(&sample.events, &mut harness.registry);
        for event in &sample.events {
            nav.on_boundary(event);
        }
    }

    #[test]
    fn test_active_section_follows_scroll() {
        let mut harness = Harness::new();
        let mut nav = NavigationController::default();
        let _teardown = harness.mount(&mut nav).unwrap();
        let hero = harness.config.sections.hero;
        let half = harness.config.viewport.height / 2.0;

        scroll(&mut harness, &mut nav, 0.0);
        assert_eq!(nav.active_section(), "hero");

        scroll(&mut harness, &mut nav, hero - half + 10.0);
        assert_eq!(nav.active_section(), "about");

        scroll(&mut harness, &mut nav, 0.0);
        assert_eq!(nav.active_section(), "hero");
    }

    #[test]
    fn test_fast_scroll_to_bottom_lands_on_contact() {
        let mut harness = Harness::new();
        let mut nav = NavigationController::default();
        let _teardown = harness.mount(&mut nav).unwrap();
        let max = harness.observer.read().layout().max_scroll();
        scroll(&mut harness, &mut nav, max);
        assert_eq!(nav.active_section(), "contact");
    }

    #[test]
    fn test_scroll_target_closes_menu() {
        let mut harness = Harness::new();
        let mut nav = NavigationController::default();
        let _teardown = harness.mount(&mut nav).unwrap();
        assert!(nav.toggle_menu());

        let observer = harness.observer.read();
        let target = nav.scroll_target("projects", observer.layout());
        let sections = harness.config.sections;
        assert_eq!(target, Some(sections.hero + sections.about));
        assert!(!nav.is_menu_open());
        assert_eq!(nav.scroll_target("nowhere", observer.layout()), None);
    }

    #[test]
    fn test_progress_bar_is_scrubbed() {
        let mut harness = Harness::new();
        let mut nav = NavigationController::default();
        let _teardown = harness.mount(&mut nav).unwrap();
        let max = harness.observer.read().layout().max_scroll();
        harness.observer.write().set_scroll(max / 2.0);
        harness
            .binder
            .update_scrubs(&harness.observer.read(), &mut harness.registry);
        for _ in 0..120 {
            harness.registry.tick(1.0 / 60.0);
        }
        let progress = harness.registry.find("navigation", "progress").unwrap();
        assert!((progress.progress() - 0.5).abs() < 1e-3);

        let intro = harness.registry.find("navigation", "intro").unwrap().id;
        assert!(!harness.registry.apply(intro, TimelineAction::Play));
    }
}
