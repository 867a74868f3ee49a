// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hero role typewriter, driven by frame time.

use crate::config::TypewriterTimings;
use serde::Serialize;

/// What the typewriter is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypewriterPhase {
    /// Adding characters
    Typing,
    /// Full role on screen
    Holding,
    /// Removing characters
    Deleting,
}

/// Cycles through roles one character at a time
#[derive(Debug, Clone)]
pub struct Typewriter {
    roles: Vec<Vec<char>>,
    timings: TypewriterTimings,
    role: usize,
    visible: usize,
    phase: TypewriterPhase,
    timer: f32,
}

impl Typewriter {
    /// Create a typewriter starting on the first role with nothing typed
    pub fn new(roles: &[String], timings: TypewriterTimings) -> Self {
        Self {
            roles: roles.iter().map(|role| role.chars().collect()).collect(),
            timings,
            role: 0,
            visible: 0,
            phase: TypewriterPhase::Typing,
            timer: 0.0,
        }
    }

    /// Text currently on screen
    pub fn text(&self) -> String {
        self.roles
            .get(self.role)
            .map(|chars| chars[..self.visible].iter().collect())
            .unwrap_or_default()
    }

    /// Current phase
    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    /// Index of the role being typed
    pub fn role_index(&self) -> usize {
        self.role
    }

    /// Advance by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if self.roles.is_empty() || dt <= 0.0 {
            return;
        }
        self.timer += dt;
        loop {
            let interval = match self.phase {
                TypewriterPhase::Typing => self.timings.type_interval,
                TypewriterPhase::Holding => self.timings.hold,
                TypewriterPhase::Deleting => self.timings.delete_interval,
            };
            // Zero intervals would spin forever
            let interval = interval.max(1e-3);
            if self.timer < interval {
                break;
            }
            self.timer -= interval;
            self.step();
        }
    }

    fn step(&mut self) {
        let length = self.roles[self.role].len();
        match self.phase {
            TypewriterPhase::Typing => {
                self.visible = (self.visible + 1).min(length);
                if self.visible == length {
                    self.phase = TypewriterPhase::Holding;
                }
            }
            TypewriterPhase::Holding => self.phase = TypewriterPhase::Deleting,
            TypewriterPhase::Deleting => {
                self.visible = self.visible.saturating_sub(1);
                if self.visible == 0 {
                    self.role = (self.role + 1) % self.roles.len();
                    self.phase = TypewriterPhase::Typing;
                    tracing::trace!(role = self.role, "typewriter moved to next role");
                }
            }
        }
    }
}
