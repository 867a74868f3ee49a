// SPDX-License-Identifier: MIT OR Apache-2.0
//! Projects section: title reveal and staggered cards.

use super::{at, fade_up, MountContext, SectionController, SectionError, SectionKind};
use folio_motion::Timeline;

/// Projects controller
#[derive(Debug, Default)]
pub struct ProjectsController;

impl SectionController for ProjectsController {
    fn kind(&self) -> SectionKind {
        SectionKind::Projects
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<(), SectionError> {
        let section = self.kind().name();
        let projects = ctx.element("projects")?;
        let title = ctx.element("projects.title")?;
        ctx.reveal(
            Timeline::new("title", section).with_step(fade_up(vec![title], 50.0, 0.8)),
            projects,
            at("top 70%"),
        )?;

        // One card per project in the content
        let grid = ctx.element("projects.cards")?;
        let cards = ctx.elements("projects.card", ctx.content.projects.len())?;
        ctx.reveal(
            Timeline::new("cards", section)
                .with_step(fade_up(cards, 100.0, 0.8).with_stagger(0.15)),
            grid,
            at("top 80%"),
        )?;
        Ok(())
    }
}
