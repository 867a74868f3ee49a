// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hero section: intro sequence, ambient motion, counters, scroll parallax
//! and pointer parallax on the two glass cards.

use super::{at, MountContext, SectionController, SectionError, SectionKind};
use folio_motion::{Easing, Property, PropertySet, RepeatPolicy, Step, Timeline};
use folio_trigger::{ParallaxGains, ParallaxTarget};

/// Hero controller
#[derive(Debug, Default)]
pub struct HeroController;

fn set(values: &[(Property, f32)]) -> PropertySet {
    values.iter().copied().collect()
}

impl HeroController {
    fn intro(&self, ctx: &MountContext<'_>) -> Result<Timeline, SectionError> {
        let section = self.kind().name();
        let intro_ease = Easing::PowerOut(4);
        let card_ease = Easing::BackOut(1.2);

        let titles = ctx.elements("hero.title", 2)?;
        let role = ctx.element("hero.role")?;
        let tagline = ctx.element("hero.tagline")?;
        let ctas = ctx.elements("hero.cta", 2)?;
        let floating = ctx.element("hero.floating_card")?;
        let stats = ctx.element("hero.stats_card")?;
        let indicator = ctx.element("hero.scroll_indicator")?;
        let socials = ctx.elements("hero.social", 3)?;

        let shown = |extra: &[(Property, f32)]| {
            let mut values = set(&[(Property::Y, 0.0), (Property::Opacity, 1.0)]);
            values.merge(&set(extra));
            values
        };

        let timeline = Timeline::new("intro", section)
            .with_step(
                Step::from_to(
                    titles,
                    set(&[(Property::Y, 120.0), (Property::Opacity, 0.0), (Property::RotateX, 90.0)]),
                    shown(&[(Property::RotateX, 0.0)]),
                    1.2,
                )
                .with_label("title")
                .with_easing(intro_ease)
                .with_stagger(0.1)
                .with_delay(0.2),
            )
            .with_step(
                Step::from_to(
                    vec![role],
                    set(&[(Property::Y, 40.0), (Property::Opacity, 0.0), (Property::Scale, 0.9)]),
                    shown(&[(Property::Scale, 1.0)]),
                    0.8,
                )
                .with_label("role")
                .with_easing(intro_ease)
                .with_delay(-0.6),
            )
            .with_step(
                Step::from_to(
                    vec![tagline],
                    set(&[(Property::Y, 30.0), (Property::Opacity, 0.0)]),
                    shown(&[]),
                    0.8,
                )
                .with_label("tagline")
                .with_easing(intro_ease)
                .with_delay(-0.4),
            )
            .with_step(
                Step::from_to(
                    ctas,
                    set(&[(Property::Y, 20.0), (Property::Opacity, 0.0), (Property::Scale, 0.95)]),
                    shown(&[(Property::Scale, 1.0)]),
                    0.6,
                )
                .with_label("cta")
                .with_easing(intro_ease)
                .with_stagger(0.1)
                .with_delay(-0.3),
            )
            .with_step(
                Step::from_to(
                    vec![floating],
                    set(&[
                        (Property::X, 100.0),
                        (Property::Opacity, 0.0),
                        (Property::Scale, 0.8),
                        (Property::RotateY, -15.0),
                    ]),
                    set(&[
                        (Property::X, 0.0),
                        (Property::Opacity, 1.0),
                        (Property::Scale, 1.0),
                        (Property::RotateY, 0.0),
                    ]),
                    1.0,
                )
                .with_label("floating card")
                .with_easing(card_ease)
                .with_delay(-0.8),
            )
            .with_step(
                Step::from_to(
                    vec![stats],
                    set(&[
                        (Property::X, -100.0),
                        (Property::Opacity, 0.0),
                        (Property::Scale, 0.8),
                        (Property::RotateY, 15.0),
                    ]),
                    set(&[
                        (Property::X, 0.0),
                        (Property::Opacity, 1.0),
                        (Property::Scale, 1.0),
                        (Property::RotateY, 0.0),
                    ]),
                    1.0,
                )
                .with_label("stats card")
                .with_easing(card_ease)
                .with_delay(-0.8),
            )
            .with_step(
                Step::from_to(
                    vec![indicator],
                    set(&[(Property::Y, 30.0), (Property::Opacity, 0.0)]),
                    shown(&[]),
                    0.6,
                )
                .with_label("scroll indicator")
                .with_easing(intro_ease)
                .with_delay(-0.4),
            )
            .with_step(
                Step::from_to(
                    socials,
                    set(&[(Property::Y, 20.0), (Property::Opacity, 0.0), (Property::Scale, 0.8)]),
                    shown(&[(Property::Scale, 1.0)]),
                    0.4,
                )
                .with_label("social")
                .with_easing(intro_ease)
                .with_stagger(0.1)
                .with_delay(-0.4),
            );
        Ok(timeline)
    }

    /// Counters run up together, each starting 0.2 s after the previous
    fn counters(&self, ctx: &MountContext<'_>) -> Result<Timeline, SectionError> {
        let stats = &ctx.content.stats;
        let targets = ctx.elements("hero.stat", stats.len())?;
        let mut timeline = Timeline::new("stats", self.kind().name());
        for (index, (stat, target)) in stats.iter().zip(targets).enumerate() {
            let start = 1.5 + 0.2 * index as f32;
            let previous_end = timeline.steps().last().map_or(0.0, Step::end);
            timeline.add_step(
                Step::from_to(
                    vec![target],
                    set(&[(Property::Value, 0.0)]),
                    set(&[(Property::Value, stat.value)]),
                    2.0,
                )
                .with_label(stat.label.clone())
                .with_easing(Easing::PowerOut(2))
                .with_delay(start - previous_end),
            );
        }
        Ok(timeline)
    }
}

impl SectionController for HeroController {
    fn kind(&self) -> SectionKind {
        SectionKind::Hero
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<(), SectionError> {
        let section = self.kind().name();
        let hero = ctx.element("hero")?;

        let intro = self.intro(ctx)?;
        ctx.play_timeline(intro);
        let counters = self.counters(ctx)?;
        ctx.play_timeline(counters);

        let particles = ctx.elements("hero.particle", ctx.config.particles)?;
        for (index, particle) in particles.into_iter().enumerate() {
            let drift = ((index * 53) % 100) as f32 - 50.0;
            let opacity = 0.2 + ((index * 29) % 50) as f32 / 100.0;
            let duration = 10.0 + ((index * 7) % 10) as f32;
            ctx.play_timeline(
                Timeline::new(format!("particle.{index}"), section)
                    .with_repeat(RepeatPolicy::Infinite, true)
                    .with_step(
                        Step::to(
                            vec![particle],
                            set(&[(Property::Y, -100.0), (Property::X, drift), (Property::Opacity, opacity)]),
                            duration,
                        )
                        .with_easing(Easing::SineInOut)
                        .with_delay(index as f32 * 0.2),
                    ),
            );
        }

        let circle = ctx.element("hero.scroll_circle")?;
        ctx.play_timeline(
            Timeline::new("scroll_circle", section)
                .with_repeat(RepeatPolicy::Infinite, false)
                .with_step(
                    Step::to(vec![circle], set(&[(Property::Rotation, 360.0)]), 20.0)
                        .with_easing(Easing::Linear),
                ),
        );

        let content = ctx.element("hero.content")?;
        let floating = ctx.element("hero.floating_card")?;
        let stats = ctx.element("hero.stats_card")?;
        let drifts = [
            ("content_drift", content, set(&[(Property::Y, -150.0), (Property::Opacity, 0.0)]), 1.5),
            (
                "floating_card_drift",
                floating,
                set(&[(Property::Y, -80.0), (Property::X, 50.0), (Property::Rotation, 5.0)]),
                2.0,
            ),
            (
                "stats_card_drift",
                stats,
                set(&[(Property::Y, -60.0), (Property::X, -40.0), (Property::Rotation, -3.0)]),
                2.0,
            ),
        ];
        for (name, target, to, lag) in drifts {
            ctx.scrub(
                Timeline::new(name, section).with_step(Step::to(vec![target], to, 1.0)),
                hero,
                at("top top"),
                at("bottom top"),
                Some(lag),
            )?;
        }

        let settings = ctx.parallax_settings(0.5, 0.5);
        ctx.track_pointer(
            hero,
            vec![
                ParallaxTarget {
                    element: floating,
                    gains: ParallaxGains {
                        x: 30.0,
                        y: 20.0,
                        rotate_x: -5.0,
                        rotate_y: 10.0,
                        scale: 0.0,
                    },
                },
                ParallaxTarget {
                    element: stats,
                    gains: ParallaxGains {
                        x: -20.0,
                        y: -15.0,
                        rotate_x: -4.0,
                        rotate_y: -8.0,
                        scale: 0.0,
                    },
                },
            ],
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
    fn test_intro_and_ambient_timelines() {
        let mut harness = Harness::new();
        let mut hero = HeroController;
        let _teardown = harness.mount(&mut hero).unwrap();

        let intro = harness.registry.find("hero", "intro").unwrap();
        assert_eq!(intro.state(), PlaybackState::Playing);
        assert_eq!(intro.steps().len(), 8);

        let particles = harness
            .registry
            .for_section("hero")
            .filter(|t| t.name.starts_with("particle."))
            .count();
        assert_eq!(particles, harness.config.particles);
        assert_eq!(harness.registry.find("hero", "scroll_circle").unwrap().total_duration(), None);
    }

    #[test]
    fn test_counters_start_staggered() {
        let mut harness = Harness::new();
        let mut hero = HeroController;
        let _teardown = harness.mount(&mut hero).unwrap();

        let counters = harness.registry.find("hero", "stats").unwrap();
        let starts: Vec<f32> = counters.steps().iter().map(Step::start).collect();
        assert_eq!(starts.len(), 3);
        for (index, start) in starts.iter().enumerate() {
            assert!((start - (1.5 + 0.2 * index as f32)).abs() < 1e-4);
        }

        let id = counters.id;
        harness.registry.tick(10.0);
        let counters = harness.registry.get(id).unwrap();
        let last = counters.steps()[2].targets[0];
        assert_eq!(
            counters.evaluate()[&last].get(Property::Value),
            Some(harness.content.stats[2].value)
        );
    }

    #[test]
    fn test_content_drift_scrubs_with_scroll() {
        let mut harness = Harness::new();
        let mut hero = HeroController;
        let _teardown = harness.mount(&mut hero).unwrap();

        harness.observer.write().set_scroll(harness.config.sections.hero / 2.0);
        harness
            .binder
            .update_scrubs(&harness.observer.read(), &mut harness.registry);
        for _ in 0..600 {
            harness.registry.tick(1.0 / 60.0);
        }
        let drift = harness.registry.find("hero", "content_drift").unwrap();
        assert!((drift.progress() - 0.5).abs() < 1e-3);
    }
}
