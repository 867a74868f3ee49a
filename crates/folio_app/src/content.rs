// SPDX-License-Identifier: MIT OR Apache-2.0
//! Static page content: projects, technologies, skills and the rest.
//!
//! The choreography only reads this: how many cards, badges and marquee
//! items exist, the hero roles and stat targets, and the navigation items.

use crate::config::{load_ron, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Content file name
pub const CONTENT_FILE_NAME: &str = "content.ron";

/// A showcased project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Image path
    pub image: String,
    /// Technologies used
    pub tech: Vec<String>,
    /// Live demo link
    pub live_url: String,
    /// Source link
    pub github_url: String,
}

/// A marquee technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    /// Name
    pub name: String,
    /// Short glyph shown in the badge
    pub icon: String,
}

/// An offered service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Title
    pub title: String,
    /// One-line description
    pub description: String,
}

/// A hero counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// Value the counter runs up to
    pub value: f32,
    /// Suffix shown after the number
    pub suffix: String,
    /// Label
    pub label: String,
}

/// A navigation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    /// Label
    pub label: String,
    /// Name of the section it scrolls to
    pub section: String,
}

/// Everything the page shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Project cards
    pub projects: Vec<Project>,
    /// Marquee technologies
    pub technologies: Vec<Technology>,
    /// About skill badges
    pub skills: Vec<String>,
    /// About service cards
    pub services: Vec<Service>,
    /// Roles cycled by the typewriter
    pub roles: Vec<String>,
    /// Hero counters
    pub stats: Vec<Stat>,
    /// Navigation entries
    pub nav_items: Vec<NavItem>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn project(title: &str, description: &str, image: usize, tech: &[&str]) -> Project {
    Project {
        title: title.to_string(),
        description: description.to_string(),
        image: format!("/placeholder-project-{image}.jpg"),
        tech: strings(tech),
        live_url: "#".to_string(),
        github_url: "#".to_string(),
    }
}

impl Default for Content {
    fn default() -> Self {
        let projects = vec![
            project(
                "Supermarket POS with AI",
                "A comprehensive point-of-sale system featuring AI-powered inventory predictions, real-time sales analytics, and seamless payment integration.",
                1,
                &["Next.js", "Laravel", "TensorFlow", "PostgreSQL"],
            ),
            project(
                "Student Management App",
                "A cross-platform Android application for educational institutions to manage student records, attendance, and academic performance.",
                2,
                &["React Native", "Node.js", "MongoDB", "Firebase"],
            ),
            project(
                "E-commerce Platform",
                "A scalable e-commerce solution with multi-vendor support, real-time inventory, and integrated payment gateways.",
                3,
                &["Next.js", "Stripe", "Prisma", "Tailwind"],
            ),
            project(
                "AI Content Generator",
                "An intelligent content creation tool that leverages GPT models to generate marketing copy, blog posts, and social media content.",
                4,
                &["React", "OpenAI", "Python", "FastAPI"],
            ),
            project(
                "Real-time Chat Application",
                "A modern messaging platform with real-time communication, file sharing, and end-to-end encryption.",
                5,
                &["Next.js", "Socket.io", "Redis", "AWS"],
            ),
            project(
                "Portfolio Dashboard",
                "A financial portfolio tracking dashboard with real-time stock data, performance analytics, and investment insights.",
                6,
                &["React", "D3.js", "Node.js", "GraphQL"],
            ),
        ];

        let technologies = [
            ("Next.js", "N"),
            ("React", "R"),
            ("TypeScript", "TS"),
            ("Tailwind", "TW"),
            ("GSAP", "GS"),
            ("Laravel", "La"),
            ("PHP", "P"),
            ("Java", "Ja"),
            ("MongoDB", "Mo"),
            ("PostgreSQL", "Pg"),
            ("Node.js", "No"),
            ("GraphQL", "GQ"),
            ("Docker", "Do"),
            ("AWS", "AW"),
            ("Git", "Gi"),
            ("Figma", "Fi"),
        ]
        .into_iter()
        .map(|(name, icon)| Technology {
            name: name.to_string(),
            icon: icon.to_string(),
        })
        .collect();

        let services = [
            ("Web Development", "Modern, scalable web apps"),
            ("Mobile Apps", "Cross-platform solutions"),
            ("UI/UX Design", "Beautiful interfaces"),
            ("AI Integration", "Smart, AI-powered features"),
        ]
        .into_iter()
        .map(|(title, description)| Service {
            title: title.to_string(),
            description: description.to_string(),
        })
        .collect();

        let stats = [(50.0, "+", "Projects"), (5.0, "+", "Years Exp"), (99.9, "%", "Satisfaction")]
            .into_iter()
            .map(|(value, suffix, label)| Stat {
                value,
                suffix: suffix.to_string(),
                label: label.to_string(),
            })
            .collect();

        let nav_items = [
            ("Home", "hero"),
            ("About", "about"),
            ("Projects", "projects"),
            ("Tech Stack", "tech"),
            ("Contact", "contact"),
        ]
        .into_iter()
        .map(|(label, section)| NavItem {
            label: label.to_string(),
            section: section.to_string(),
        })
        .collect();

        Self {
            projects,
            technologies,
            skills: strings(&[
                "Next.js",
                "React",
                "TypeScript",
                "Tailwind CSS",
                "GSAP",
                "Laravel",
                "PHP",
                "React Native",
                "Android",
                "MongoDB",
                "PostgreSQL",
                "AI/ML",
                "Node.js",
                "GraphQL",
            ]),
            services,
            roles: strings(&[
                "Full-Stack Developer",
                "Software Engineer",
                "UI/UX Designer",
                "Astronomy Enthusiast",
            ]),
            stats,
            nav_items,
        }
    }
}

impl Content {
    /// Load content, or the defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let content = load_ron(path)?;
                tracing::info!("Loaded content from {:?}", path);
                Ok(content)
            }
            None => Ok(Self::default()),
        }
    }
}
