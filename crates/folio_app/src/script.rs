// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted input for headless runs.
//!
//! A script is a list of user actions. Each step is applied and followed by
//! one frame; `Wait` runs frames until the requested time has passed.

use crate::config::{load_ron, save_ron, ConfigError};
use crate::contact_form::ContactFields;
use crate::page::Page;
use crate::sections::SectionKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Script file name
pub const SCRIPT_FILE_NAME: &str = "script.ron";

/// Longest single `Wait` a script may ask for, in seconds
pub const MAX_WAIT: f32 = 3600.0;

/// One user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptStep {
    /// Jump to a scroll position
    Scroll(f32),
    /// Scroll by a number of pixels
    ScrollBy(f32),
    /// Click a navigation link
    Navigate(String),
    /// Move the pointer to a viewport position
    Pointer {
        /// Horizontal position
        x: f32,
        /// Vertical position
        y: f32,
    },
    /// Pointer left the window
    PointerExit,
    /// Fill in and submit the contact form
    Submit {
        /// Sender name
        name: String,
        /// Reply address
        email: String,
        /// Message body
        message: String,
    },
    /// Let time pass
    Wait(f32),
    /// Tear a section down and mount it again
    Remount(String),
    /// Open or close the mobile menu
    ToggleMenu,
}

/// Script errors
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Script file could not be read
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `Remount` named a section that does not exist
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// `Wait` was not a finite duration between zero and [`MAX_WAIT`]
    #[error("Invalid wait of {0} seconds (expected 0 to 3600)")]
    InvalidWait(f32),
}

/// A list of steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Steps, in order
    pub steps: Vec<ScriptStep>,
}

impl Default for Script {
    /// Scroll down through the page, use the pointer and the form, then
    /// jump back up through the navigation
    fn default() -> Self {
        use ScriptStep::*;
        Self {
            steps: vec![
                Wait(3.0),
                Pointer { x: 1100.0, y: 300.0 },
                Wait(0.6),
                PointerExit,
                Wait(0.6),
                ScrollBy(450.0),
                Wait(0.5),
                ScrollBy(450.0),
                Wait(1.0),
                ScrollBy(800.0),
                Wait(1.0),
                ScrollBy(800.0),
                Wait(1.5),
                ScrollBy(1000.0),
                Wait(1.0),
                Navigate("contact".into()),
                Wait(1.5),
                Submit {
                    name: "Visitor".into(),
                    email: "visitor@example.com".into(),
                    message: "Hello from the script".into(),
                },
                Wait(1.2),
                ToggleMenu,
                Navigate("hero".into()),
                Wait(1.5),
            ],
        }
    }
}

impl Script {
    /// Load a script from a file
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        Ok(load_ron(path)?)
    }

    /// Load a script, or the default one when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ScriptError> {
        match path {
            Some(path) => {
                let script = Self::load(path)?;
                tracing::info!(steps = script.steps.len(), "Loaded script from {:?}", path);
                Ok(script)
            }
            None => Ok(Self::default()),
        }
    }

    /// Save the script to a file
    pub fn save(&self, path: &Path) -> Result<(), ScriptError> {
        Ok(save_ron(self, path)?)
    }

    /// Play every step against `page`; returns the number of frames run
    pub fn run(&self, page: &mut Page) -> Result<u64, ScriptError> {
        let dt = page.config().frame_time();
        let mut frames = 0;
        for step in &self.steps {
            frames += apply(page, step, dt)?;
        }
        tracing::info!(steps = self.steps.len(), frames, "script finished");
        Ok(frames)
    }
}

/// Apply one step and run its frames
fn apply(page: &mut Page, step: &ScriptStep, dt: f32) -> Result<u64, ScriptError> {
    tracing::debug!(?step, "script step");
    let mut frames = 1;
    match step {
        ScriptStep::Scroll(y) => {
            page.scroll_to(*y);
        }
        ScriptStep::ScrollBy(dy) => {
            page.scroll_by(*dy);
        }
        ScriptStep::Navigate(section) => {
            if !page.navigate(section) {
                tracing::warn!(section = %section, "navigation target not found");
            }
        }
        ScriptStep::Pointer { x, y } => page.pointer_move(*x, *y),
        ScriptStep::PointerExit => page.pointer_exit(),
        ScriptStep::Submit {
            name,
            email,
            message,
        } => {
            let fields = ContactFields {
                name: name.clone(),
                email: email.clone(),
                message: message.clone(),
            };
            if let Err(err) = page.submit_contact(fields) {
                tracing::warn!("contact form rejected: {err}");
            }
        }
        ScriptStep::Wait(seconds) => {
            if !seconds.is_finite() || !(0.0..=MAX_WAIT).contains(seconds) {
                return Err(ScriptError::InvalidWait(*seconds));
            }
            frames = (seconds / dt).ceil() as u64;
        }
        ScriptStep::Remount(name) => {
            let kind = SectionKind::from_name(name)
                .ok_or_else(|| ScriptError::UnknownSection(name.clone()))?;
            if let Err(err) = page.remount(kind) {
                tracing::warn!(section = %name, "remount failed: {err}");
            }
        }
        ScriptStep::ToggleMenu => {
            page.toggle_menu();
        }
    }
    for _ in 0..frames {
        page.frame(dt);
    }
    Ok(frames)
}
