// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contact form state machine.
//!
//! Submission is simulated locally: the form spends a fixed time
//! submitting, shows a confirmation, then returns to idle. Time only moves
//! through [`ContactForm::advance`].

use crate::config::ContactTimings;
use serde::{Deserialize, Serialize};

/// Presentational form state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormState {
    /// Waiting for input
    #[default]
    Idle,
    /// Submission in flight
    Submitting,
    /// Confirmation shown
    Submitted,
}

/// Form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormField {
    /// Sender name
    Name,
    /// Reply address
    Email,
    /// Message body
    Message,
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormField::Name => write!(f, "name"),
            FormField::Email => write!(f, "email"),
            FormField::Message => write!(f, "message"),
        }
    }
}

/// Values typed into the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    /// Sender name
    pub name: String,
    /// Reply address
    pub email: String,
    /// Message body
    pub message: String,
}

impl ContactFields {
    fn validate(&self) -> Result<(), ContactError> {
        let required = [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Message, &self.message),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ContactError::Validation {
                    field,
                    reason: "is required".to_string(),
                });
            }
        }

        let plausible = self
            .email
            .trim()
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !plausible {
            return Err(ContactError::Validation {
                field: FormField::Email,
                reason: format!("{:?} is not an email address", self.email),
            });
        }
        Ok(())
    }
}

/// Contact form errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContactError {
    /// A field failed validation; the form state is unchanged
    #[error("{field} {reason}")]
    Validation {
        /// Offending field
        field: FormField,
        /// What is wrong with it
        reason: String,
    },
}

/// One state change reported by [`ContactForm::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormTransition {
    /// State left
    pub from: FormState,
    /// State entered
    pub to: FormState,
}

/// Contact form
#[derive(Debug, Clone)]
pub struct ContactForm {
    fields: ContactFields,
    state: FormState,
    elapsed: f32,
    timings: ContactTimings,
}

impl ContactForm {
    /// Create an empty idle form
    pub fn new(timings: ContactTimings) -> Self {
        Self {
            fields: ContactFields::default(),
            state: FormState::Idle,
            elapsed: 0.0,
            timings,
        }
    }

    /// Current state
    pub fn state(&self) -> FormState {
        self.state
    }

    /// Current field values
    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    /// Type into a field
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.fields.name = value,
            FormField::Email => self.fields.email = value,
            FormField::Message => self.fields.message = value,
        }
    }

    /// Replace every field at once
    pub fn fill(&mut self, fields: ContactFields) {
        self.fields = fields;
    }

    /// Start submitting
    ///
    /// Returns `Ok(false)` when a submission is already in flight.
    pub fn submit(&mut self) -> Result<bool, ContactError> {
        if self.state == FormState::Submitting {
            tracing::debug!("submit ignored while submitting");
            return Ok(false);
        }
        self.fields.validate()?;
        self.enter(FormState::Submitting);
        Ok(true)
    }

    /// Advance the simulated submission by `dt` seconds
    ///
    /// Every transition passed is reported in order, so a single long step
    /// still goes through `Submitted`.
    pub fn advance(&mut self, dt: f32) -> Vec<FormTransition> {
        let mut transitions = Vec::new();
        if dt <= 0.0 {
            return transitions;
        }
        self.elapsed += dt;

        loop {
            let (hold, next) = match self.state {
                FormState::Idle => break,
                FormState::Submitting => (self.timings.submit_delay, FormState::Submitted),
                FormState::Submitted => (self.timings.submitted_hold, FormState::Idle),
            };
            if self.elapsed < hold {
                break;
            }
            let leftover = self.elapsed - hold;
            let from = self.state;
            if next == FormState::Submitted {
                self.fields = ContactFields::default();
            }
            self.enter(next);
            self.elapsed = if next == FormState::Idle { 0.0 } else { leftover };
            transitions.push(FormTransition { from, to: next });
        }
        transitions
    }

    fn enter(&mut self, state: FormState) {
        tracing::info!(from = ?self.state, to = ?state, "contact form state changed");
        self.state = state;
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        let mut form = ContactForm::new(ContactTimings::default());
        form.set_field(FormField::Name, "Ada");
        form.set_field(FormField::Email, "ada@example.com");
        form.set_field(FormField::Message, "Hello");
        form
    }

    #[test]
    fn test_full_submission_cycle() {
        let mut form = filled();
        assert_eq!(form.submit(), Ok(true));
        assert_eq!(form.state(), FormState::Submitting);

        assert!(form.advance(0.5).is_empty());
        let transitions = form.advance(0.6);
        assert_eq!(
            transitions,
            vec![FormTransition {
                from: FormState::Submitting,
                to: FormState::Submitted
            }]
        );
        assert_eq!(form.fields(), &ContactFields::default());

        assert!(form.advance(2.0).is_empty());
        let transitions = form.advance(1.0);
        assert_eq!(transitions[0].to, FormState::Idle);
        assert_eq!(form.state(), FormState::Idle);
    }

    #[test]
    fn test_submit_ignored_while_submitting() {
        let mut form = filled();
        assert_eq!(form.submit(), Ok(true));
        form.advance(0.5);
        assert_eq!(form.submit(), Ok(false));
        // The ignored submit did not restart the delay
        assert_eq!(form.advance(0.5).len(), 1);
    }

    #[test]
    fn test_long_step_reports_every_transition() {
        let mut form = filled();
        form.submit().unwrap();
        let transitions = form.advance(10.0);
        assert_eq!(
            transitions,
            vec![
                FormTransition {
                    from: FormState::Submitting,
                    to: FormState::Submitted
                },
                FormTransition {
                    from: FormState::Submitted,
                    to: FormState::Idle
                },
            ]
        );
    }

    #[test]
    fn test_validation_leaves_state_alone() {
        let mut form = ContactForm::new(ContactTimings::default());
        form.set_field(FormField::Name, "Ada");
        form.set_field(FormField::Email, "not-an-address");
        form.set_field(FormField::Message, "Hi");
        let err = form.submit().unwrap_err();
        assert!(matches!(
            err,
            ContactError::Validation {
                field: FormField::Email,
                ..
            }
        ));
        assert_eq!(form.state(), FormState::Idle);

        form.set_field(FormField::Message, "  ");
        let err = form.submit().unwrap_err();
        assert_eq!(err.to_string(), "message is required");
    }

    #[test]
    fn test_resubmit_from_submitted() {
        let mut form = filled();
        form.submit().unwrap();
        form.advance(1.0);
        assert_eq!(form.state(), FormState::Submitted);
        form.fill(ContactFields {
            name: "Grace".into(),
            email: "grace@example.org".into(),
            message: "Again".into(),
        });
        assert_eq!(form.submit(), Ok(true));
        assert_eq!(form.state(), FormState::Submitting);
    }
}
