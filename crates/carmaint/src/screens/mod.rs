//! Screens: one user action each.
//!
//! A screen validates the form it is given, turns it into a record, hands a
//! single write to its view model and reports the result as an [`Outcome`].
//! Screens wait for their view model to settle before returning so queued
//! writes are not lost when the process exits.

mod notes;
mod reminders;
mod services;
mod vehicles;

use std::fmt;

use crate::validation::FieldErrors;

pub use notes::NoteScreens;
pub use reminders::ReminderScreens;
pub use services::ServiceScreens;
pub use vehicles::VehicleScreens;

/// The result of a screen action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The write was queued; the message is shown as a toast.
    Done(String),
    /// The form has inline errors and nothing was written.
    Invalid(FieldErrors),
    /// The write was not accepted.
    Failed(String),
    /// A destructive action needs the user to confirm with this prompt.
    ConfirmationRequired(String),
}

impl Outcome {
    pub(crate) fn done(message: &str) -> Self {
        Self::Done(message.to_string())
    }

    pub(crate) fn confirm(prompt: &str) -> Self {
        Self::ConfirmationRequired(prompt.to_string())
    }

    /// Whether the action went through.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(message) | Self::Failed(message) | Self::ConfirmationRequired(message) => {
                f.write_str(message)
            }
            Self::Invalid(errors) => write!(f, "{errors}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldError, BLANK_FIELD};

    #[test]
    fn test_display() {
        assert_eq!(Outcome::done("Vehicle saved successfully").to_string(), "Vehicle saved successfully");

        let mut errors = FieldErrors::default();
        errors.push(FieldError::new("title", BLANK_FIELD));
        assert_eq!(
            Outcome::Invalid(errors).to_string(),
            "title: Fill in this field."
        );
    }

    #[test]
    fn test_is_done() {
        assert!(Outcome::done("ok").is_done());
        assert!(!Outcome::confirm("sure?").is_done());
        assert!(!Outcome::Failed("no".to_string()).is_done());
    }
}
