// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contact section: heading and form reveals plus the black-hole warp.

use super::{at, fade_up, MountContext, SectionController, SectionError, SectionKind};
use folio_motion::{Property, PropertySet, Step, Timeline};

/// Contact controller
#[derive(Debug, Default)]
pub struct ContactController;

impl SectionController for ContactController {
    fn kind(&self) -> SectionKind {
        SectionKind::Contact
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<(), SectionError> {
        let section = self.kind().name();
        let contact = ctx.element(section)?;

        let title = ctx.element("contact.title")?;
        ctx.reveal(
            Timeline::new("title", section).with_step(fade_up(vec![title], 50.0, 0.8)),
            contact,
            at("top 70%"),
        )?;

        let form = ctx.element("contact.form")?;
        ctx.reveal(
            Timeline::new("form", section)
                .with_step(fade_up(vec![form], 50.0, 0.8).with_delay(0.2)),
            contact,
            at("top 60%"),
        )?;

        let black_hole = ctx.element("contact.black_hole")?;
        ctx.scrub(
            Timeline::new("black_hole", section).with_step(Step::to(
                vec![black_hole],
                PropertySet::new()
                    .with(Property::Scale, 1.5)
                    .with(Property::Opacity, 0.3),
                1.0,
            )),
            contact,
            at("top bottom"),
            at("bottom top"),
            Some(1.0),
        )?;
        Ok(())
    }
}
