// SPDX-License-Identifier: MIT OR Apache-2.0
//! About section: staggered reveals, the floating badge and the image tilt.

use super::{at, fade_up, settled, MountContext, SectionController, SectionError, SectionKind};
use folio_motion::{Easing, Property, PropertySet, RepeatPolicy, Step, Timeline};
use folio_trigger::{ParallaxGains, ParallaxTarget};

/// About controller
#[derive(Debug, Default)]
pub struct AboutController;

impl SectionController for AboutController {
    fn kind(&self) -> SectionKind {
        SectionKind::About
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<(), SectionError> {
        let section = self.kind().name();
        let about = ctx.element("about")?;

        let label = ctx.element("about.label")?;
        ctx.reveal(
            Timeline::new("label", section).with_step(fade_up(vec![label], 30.0, 0.8)),
            about,
            at("top 75%"),
        )?;

        let image = ctx.element("about.image")?;
        ctx.reveal(
            Timeline::new("image", section).with_step(
                Step::from_to(
                    vec![image],
                    PropertySet::new()
                        .with(Property::ClipReveal, 0.0)
                        .with(Property::Opacity, 0.0),
                    PropertySet::new()
                        .with(Property::ClipReveal, 1.0)
                        .with(Property::Opacity, 1.0),
                    1.2,
                )
                .with_easing(Easing::PowerInOut(3)),
            ),
            about,
            at("top 65%"),
        )?;

        let badge = ctx.element("about.badge")?;
        ctx.reveal(
            Timeline::new("badge", section).with_step(
                Step::from_to(
                    vec![badge],
                    PropertySet::new()
                        .with(Property::Scale, 0.0)
                        .with(Property::Opacity, 0.0)
                        .with(Property::Rotation, -20.0),
                    PropertySet::new()
                        .with(Property::Scale, 1.0)
                        .with(Property::Opacity, 1.0)
                        .with(Property::Rotation, 0.0),
                    0.8,
                )
                .with_easing(Easing::BackOut(1.7)),
            ),
            about,
            at("top 60%"),
        )?;
        ctx.play_timeline(
            Timeline::new("badge_float", section)
                .with_repeat(RepeatPolicy::Infinite, true)
                .with_step(
                    Step::to(vec![badge], PropertySet::new().with(Property::Y, -10.0), 2.0)
                        .with_easing(Easing::SineInOut)
                        .with_delay(0.8),
                ),
        );

        let content = ctx.element("about.content")?;
        let paragraphs = ctx.elements("about.content", 3)?;
        ctx.reveal(
            Timeline::new("content", section)
                .with_step(fade_up(paragraphs, 40.0, 0.8).with_stagger(0.15)),
            content,
            at("top 70%"),
        )?;

        let skills = ctx.element("about.skills")?;
        let badges = ctx.elements("about.skill", ctx.content.skills.len())?;
        ctx.reveal(
            Timeline::new("skills", section).with_step(
                Step::from_to(
                    badges,
                    PropertySet::new()
                        .with(Property::Y, 40.0)
                        .with(Property::Opacity, 0.0)
                        .with(Property::Scale, 0.8),
                    settled().with(Property::Scale, 1.0),
                    0.5,
                )
                .with_easing(Easing::BackOut(1.7))
                .with_stagger(0.05),
            ),
            skills,
            at("top 80%"),
        )?;

        let services = ctx.element("about.services")?;
        let cards = ctx.elements("about.service", ctx.content.services.len())?;
        ctx.reveal(
            Timeline::new("services", section).with_step(
                Step::from_to(
                    cards,
                    PropertySet::new()
                        .with(Property::Y, 60.0)
                        .with(Property::Opacity, 0.0)
                        .with(Property::RotateX, 20.0),
                    settled().with(Property::RotateX, 0.0),
                    0.8,
                )
                .with_easing(Easing::PowerOut(3))
                .with_stagger(0.1),
            ),
            services,
            at("top 80%"),
        )?;

        let container = ctx.element("about.image_container")?;
        let settings = ctx.parallax_settings(0.3, 0.5);
        ctx.track_pointer(
            container,
            vec![ParallaxTarget {
                element: image,
                gains: ParallaxGains {
                    rotate_x: -10.0,
                    rotate_y: 15.0,
                    scale: 0.02,
                    ..Default::default()
                },
            }],
            settings,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::tests::Harness;
    use folio_motion::PlaybackState;

    #[test]
    fn test_reveals_wait_for_scroll() {
        let mut harness = Harness::new();
        let mut about = AboutController;
        let _teardown = harness.mount(&mut about).unwrap();

        let label = harness.registry.find("about", "label").unwrap();
        assert_eq!(label.state(), PlaybackState::Ready);
        let target = label.steps()[0].targets[0];
        assert_eq!(label.evaluate()[&target].get(Property::Opacity), Some(0.0));

        // Section top reaches 75% of the viewport
        let viewport = harness.config.viewport.height;
        let y = harness.config.sections.hero - 0.75 * viewport + 1.0;
        let sample = {
            let mut observer = harness.observer.write();
            observer.set_scroll(y);
            observer.sample()
        };
        harness.binder.dispatch(&sample.events, &mut harness.registry);

        let state = |name: &str| harness.registry.find("about", name).unwrap().state();
        assert_eq!(state("label"), PlaybackState::Playing);
        // `top 65%` is further down
        assert_eq!(state("image"), PlaybackState::Ready);
        assert_eq!(state("badge_float"), PlaybackState::Playing);
    }

    #[test]
    fn test_skill_stagger_covers_every_badge() {
        let mut harness = Harness::new();
        let mut about = AboutController;
        let _teardown = harness.mount(&mut about).unwrap();

        let skills = harness.registry.find("about", "skills").unwrap();
        let count = harness.content.skills.len() as f32;
        assert!((skills.duration() - (0.5 + 0.05 * (count - 1.0))).abs() < 1e-4);
    }
}
