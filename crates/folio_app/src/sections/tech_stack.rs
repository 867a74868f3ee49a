// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tech stack section: title reveal and two endless marquee rows sliding in
//! opposite directions.

use super::{at, fade_up, MountContext, SectionController, SectionError, SectionKind};
use crate::blueprint::item;
use folio_motion::{Easing, Property, PropertySet, RepeatPolicy, Step, Timeline};

/// Seconds for one full marquee loop
const MARQUEE_LOOP: f32 = 30.0;

/// Tech stack controller
#[derive(Debug, Default)]
pub struct TechStackController;

impl SectionController for TechStackController {
    fn kind(&self) -> SectionKind {
        SectionKind::TechStack
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<(), SectionError> {
        let section = self.kind().name();
        let tech = ctx.element(section)?;
        let title = ctx.element("tech.title")?;
        ctx.reveal(
            Timeline::new("title", section).with_step(fade_up(vec![title], 50.0, 0.8)),
            tech,
            at("top 70%"),
        )?;

        let items = ctx.content.technologies.len() * 2;
        for (row, direction) in [(0, 1.0), (1, -1.0)] {
            let group = item("tech.marquee", row);
            let marquee = ctx.element(&group)?;
            let badges = ctx.elements(&format!("{group}.item"), items)?;

            ctx.reveal(
                Timeline::new(format!("marquee.{row}.pop"), section).with_step(
                    Step::from_to(
                        badges,
                        PropertySet::new()
                            .with(Property::Scale, 0.8)
                            .with(Property::Opacity, 0.0),
                        PropertySet::new()
                            .with(Property::Scale, 1.0)
                            .with(Property::Opacity, 1.0),
                        0.5,
                    )
                    .with_easing(Easing::BackOut(1.7))
                    .with_stagger(0.05),
                ),
                marquee,
                at("top 85%"),
            )?;

            ctx.play_timeline(
                Timeline::new(format!("marquee.{row}.slide"), section)
                    .with_repeat(RepeatPolicy::Infinite, false)
                    .with_step(
                        Step::to(
                            vec![marquee],
                            PropertySet::new().with(Property::XPercent, -50.0 * direction),
                            MARQUEE_LOOP,
                        )
                        .with_easing(Easing::Linear),
                    ),
            );
        }
        Ok(())
    }
}
