// SPDX-License-Identifier: MIT OR Apache-2.0
//! Page blueprint: the element boxes the choreography animates.
//!
//! Sections are stacked top to bottom in page order. Every animated element
//! gets a dotted name under its section (`about.skill.3`) and a parent link
//! so a whole section can be detached at once.

use crate::config::SiteConfig;
use crate::content::Content;
use folio_motion::ElementId;
use folio_trigger::{ElementBox, Layout};

/// Root element spanning the whole document
pub const PAGE: &str = "page";

/// Fixed navigation bar
pub const NAV: &str = "nav";

/// Widest the centered content column gets
const CONTENT_WIDTH: f32 = 1280.0;

/// Height of the navigation bar
const NAV_HEIGHT: f32 = 64.0;

/// Name of the `index`th element of a group, e.g. `item("about.skill", 3)`
pub fn item(group: &str, index: usize) -> String {
    format!("{group}.{index}")
}

struct Builder<'a> {
    layout: &'a mut Layout,
    left: f32,
    width: f32,
}

impl Builder<'_> {
    fn add(&mut self, name: &str, rect: ElementBox, parent: ElementId) -> ElementId {
        self.layout.insert(name, rect, Some(parent))
    }

    /// Evenly spaced rows of `count` boxes filling `columns` columns of
    /// `area`
    fn grid(
        &mut self,
        group: &str,
        count: usize,
        columns: usize,
        area: ElementBox,
        row_height: f32,
        parent: ElementId,
    ) {
        let columns = columns.max(1);
        let gap = 16.0;
        let cell = (area.width - gap * (columns as f32 - 1.0)) / columns as f32;
        for index in 0..count {
            let (row, column) = (index / columns, index % columns);
            let rect = ElementBox::new(
                area.left + column as f32 * (cell + gap),
                area.top + row as f32 * (row_height + gap),
                cell,
                row_height,
            );
            self.add(&item(group, index), rect, parent);
        }
    }

    fn hero(&mut self, top: f32, height: f32, config: &SiteConfig, content: &Content) {
        let viewport = self.layout.viewport();
        let section = self.layout.insert("hero", ElementBox::new(0.0, top, viewport.width, height), None);
        let (x0, w) = (self.left, self.width);

        let body = ElementBox::new(x0, top + height * 0.2, w, height * 0.55);
        let container = self.add("hero.content", body, section);
        let column = x0 + w * 0.25;
        let rows = [
            ("hero.title.0", 24.0),
            ("hero.title.1", 120.0),
            ("hero.role", 48.0),
            ("hero.tagline", 56.0),
        ];
        let mut y = body.top;
        for (name, row_height) in rows {
            self.add(name, ElementBox::new(column, y, w * 0.5, row_height), container);
            y += row_height + 8.0;
        }
        for index in 0..2 {
            let rect = ElementBox::new(column + index as f32 * 200.0, y, 180.0, 56.0);
            self.add(&item("hero.cta", index), rect, container);
        }
        y += 72.0;
        for index in 0..3 {
            let rect = ElementBox::new(column + index as f32 * 56.0, y, 44.0, 44.0);
            self.add(&item("hero.social", index), rect, container);
        }

        let stats_card = self.add(
            "hero.stats_card",
            ElementBox::new(x0, body.top + 40.0, 256.0, 320.0),
            container,
        );
        for index in 0..content.stats.len() {
            let rect = ElementBox::new(x0 + 24.0, body.top + 120.0 + index as f32 * 72.0, 200.0, 56.0);
            self.add(&item("hero.stat", index), rect, stats_card);
        }
        self.add(
            "hero.floating_card",
            ElementBox::new(x0 + w - 288.0, body.top + 40.0, 288.0, 300.0),
            container,
        );

        let indicator = self.add(
            "hero.scroll_indicator",
            ElementBox::new(viewport.width / 2.0 - 40.0, top + height - 112.0, 80.0, 80.0),
            section,
        );
        self.add(
            "hero.scroll_circle",
            ElementBox::new(viewport.width / 2.0 - 40.0, top + height - 112.0, 80.0, 80.0),
            indicator,
        );

        // Deterministic spread over the section
        for index in 0..config.particles {
            let fx = ((index * 37) % 100) as f32 / 100.0;
            let fy = ((index * 61) % 100) as f32 / 100.0;
            let rect = ElementBox::new(fx * viewport.width, top + fy * height, 4.0, 4.0);
            self.add(&item("hero.particle", index), rect, section);
        }
    }

    fn about(&mut self, top: f32, height: f32, content: &Content) {
        let viewport = self.layout.viewport();
        let section = self.layout.insert("about", ElementBox::new(0.0, top, viewport.width, height), None);
        let (x0, w) = (self.left, self.width);
        let half = w / 2.0 - 24.0;
        let right = x0 + w / 2.0 + 24.0;

        self.add("about.label", ElementBox::new(x0, top + 80.0, w, 40.0), section);

        let container = self.add(
            "about.image_container",
            ElementBox::new(x0, top + 160.0, half, 600.0),
            section,
        );
        self.add("about.image", ElementBox::new(x0, top + 160.0, half, 600.0), container);
        self.add(
            "about.badge",
            ElementBox::new(x0 + half - 120.0, top + 700.0, 140.0, 80.0),
            container,
        );

        let body = ElementBox::new(right, top + 160.0, half, 400.0);
        let body_id = self.add("about.content", body, section);
        self.grid("about.content", 3, 1, body, 120.0, body_id);

        let services = ElementBox::new(right, top + 600.0, half, 300.0);
        let services_id = self.add("about.services", services, section);
        self.grid("about.service", content.services.len(), 2, services, 140.0, services_id);

        let skills = ElementBox::new(right, top + 940.0, half, 260.0);
        let skills_id = self.add("about.skills", skills, section);
        self.grid("about.skill", content.skills.len(), 4, skills, 40.0, skills_id);
    }

    fn projects(&mut self, top: f32, height: f32, content: &Content) {
        let viewport = self.layout.viewport();
        let section = self.layout.insert("projects", ElementBox::new(0.0, top, viewport.width, height), None);
        let (x0, w) = (self.left, self.width);

        self.add("projects.title", ElementBox::new(x0, top + 80.0, w, 120.0), section);
        let rows = content.projects.len().div_ceil(3);
        let cards = ElementBox::new(x0, top + 240.0, w, rows as f32 * 436.0);
        let cards_id = self.add("projects.cards", cards, section);
        self.grid("projects.card", content.projects.len(), 3, cards, 420.0, cards_id);
    }

    fn tech(&mut self, top: f32, height: f32, content: &Content) {
        let viewport = self.layout.viewport();
        let section = self.layout.insert("tech", ElementBox::new(0.0, top, viewport.width, height), None);

        self.add("tech.title", ElementBox::new(self.left, top + 80.0, self.width, 120.0), section);
        // Each row repeats the list once so the slide loops seamlessly
        let items = content.technologies.len() * 2;
        for row in 0..2 {
            let group = item("tech.marquee", row);
            let row_top = top + 260.0 + row as f32 * 160.0;
            let rect = ElementBox::new(0.0, row_top, items as f32 * 176.0, 120.0);
            let row_id = self.add(&group, rect, section);
            self.grid(&format!("{group}.item"), items, items, rect, 120.0, row_id);
        }
    }

    fn contact(&mut self, top: f32, height: f32) {
        let viewport = self.layout.viewport();
        let section = self.layout.insert("contact", ElementBox::new(0.0, top, viewport.width, height), None);
        let (x0, w) = (self.left, self.width);

        self.add(
            "contact.black_hole",
            ElementBox::new(viewport.width / 2.0 - 300.0, top + height / 2.0 - 300.0, 600.0, 600.0),
            section,
        );
        self.add("contact.title", ElementBox::new(x0, top + 80.0, w, 200.0), section);
        self.add("contact.form", ElementBox::new(x0 + w / 2.0, top + 320.0, w / 2.0, 480.0), section);
    }
}

/// Lay out every section of the page
pub fn build_layout(config: &SiteConfig, content: &Content) -> Layout {
    let mut layout = Layout::new(config.viewport);
    let viewport = config.viewport;
    let heights = config.sections;
    let width = viewport.width.min(CONTENT_WIDTH);
    let total = heights.hero + heights.about + heights.projects + heights.tech + heights.contact + heights.footer;

    layout.insert(PAGE, ElementBox::new(0.0, 0.0, viewport.width, total), None);
    let nav = layout.insert(NAV, ElementBox::new(0.0, 0.0, viewport.width, NAV_HEIGHT), None);
    layout.insert("nav.progress", ElementBox::new(0.0, NAV_HEIGHT - 2.0, viewport.width, 2.0), Some(nav));

    let mut builder = Builder {
        layout: &mut layout,
        left: (viewport.width - width) / 2.0,
        width,
    };
    let mut top = 0.0;
    builder.hero(top, heights.hero, config, content);
    top += heights.hero;
    builder.about(top, heights.about, content);
    top += heights.about;
    builder.projects(top, heights.projects, content);
    top += heights.projects;
    builder.tech(top, heights.tech, content);
    top += heights.tech;
    builder.contact(top, heights.contact);
    top += heights.contact;
    layout.insert("footer", ElementBox::new(0.0, top, viewport.width, heights.footer), None);

    tracing::debug!(elements = layout.len(), height = total, "page laid out");
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_are_stacked() {
        let config = SiteConfig::default();
        let layout = build_layout(&config, &Content::default());
        let about = layout.lookup("about").and_then(|id| layout.rect(id)).unwrap();
        assert_eq!(about.top, config.sections.hero);
        let footer = layout.lookup("footer").and_then(|id| layout.rect(id)).unwrap();
        assert_eq!(footer.bottom(), layout.document_height());
    }

    #[test]
    fn test_generated_groups() {
        let config = SiteConfig {
            particles: 7,
            ..Default::default()
        };
        let content = Content::default();
        let layout = build_layout(&config, &content);
        assert!(layout.lookup("hero.particle.6").is_some());
        assert!(layout.lookup("hero.particle.7").is_none());
        assert!(layout.lookup("projects.card.5").is_some());
        assert!(layout.lookup("tech.marquee.1.item.31").is_some());
        assert!(layout.lookup(&item("about.skill", content.skills.len() - 1)).is_some());
    }

    #[test]
    fn test_detaching_section_detaches_children() {
        let mut layout = build_layout(&SiteConfig::default(), &Content::default());
        let about = layout.lookup("about").unwrap();
        let badge = layout.lookup("about.badge").unwrap();
        layout.detach(about);
        assert!(!layout.is_attached(badge));
        assert!(layout.lookup("page").is_some_and(|id| layout.is_attached(id)));
    }
}
