//! Form input validation.
//!
//! Forms hold exactly what the user typed. Validating a form either builds the
//! record it describes or returns one inline error per offending field.

mod forms;

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};

use crate::config::Config;
use crate::storage::DATE_FORMAT;

pub use forms::{NoteForm, ReminderForm, ServiceForm, VehicleForm};

/// Message for a required field left blank.
pub const BLANK_FIELD: &str = "Fill in this field.";

/// Message for a numeric field that is not a whole number.
pub const NOT_A_NUMBER: &str = "Enter a whole number.";

/// Message for a numeric field below zero.
pub const NEGATIVE_NUMBER: &str = "Enter zero or more.";

/// Message for a reminder dated before today.
pub const PAST_DATE: &str = "Pick today or a later date.";

/// Whether a required text value has been filled in.
///
/// Empty and whitespace-only values are blank.
#[must_use]
pub fn is_entry_valid(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Parse a whole, non-negative number.
///
/// # Errors
///
/// Returns a [`FieldError`] for `field` if the value is blank, not a whole
/// number, or negative.
pub fn parse_integer<T>(field: &'static str, value: &str) -> Result<T, FieldError>
where
    T: FromStr + PartialOrd + Default,
{
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::new(field, BLANK_FIELD));
    }
    let parsed: T = value
        .parse()
        .map_err(|_| FieldError::new(field, NOT_A_NUMBER))?;
    if parsed < T::default() {
        return Err(FieldError::new(field, NEGATIVE_NUMBER));
    }
    Ok(parsed)
}

/// Parse a date written as `YYYY-MM-DD` or in `display_format`.
///
/// # Errors
///
/// Returns a [`FieldError`] for `field` if the value is blank or matches
/// neither format.
pub fn parse_date(
    field: &'static str,
    value: &str,
    display_format: &str,
) -> Result<NaiveDate, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::new(field, BLANK_FIELD));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, display_format))
        .map_err(|_| {
            let example = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap_or_default();
            FieldError::new(
                field,
                format!(
                    "Enter a date like {} or {}.",
                    example.format(DATE_FORMAT),
                    example.format(display_format)
                ),
            )
        })
}

/// Settings that affect how form fields are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRules {
    /// Display format accepted in addition to ISO dates.
    pub date_format: String,
    /// The date treated as "today".
    pub today: NaiveDate,
    /// Accept reminder dates earlier than `today`.
    pub allow_past_reminders: bool,
}

impl FormRules {
    /// Rules from configuration, with today's local date.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            date_format: config.display.date_format.clone(),
            today: Local::now().date_naive(),
            allow_past_reminders: config.reminders.allow_past_dates,
        }
    }

    /// Same rules with a fixed "today".
    #[must_use]
    pub fn on(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

impl Default for FormRules {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// An inline error attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The field name as shown to the user.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    /// Create an error for `field`.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every inline error found on a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Record an error.
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The message for `field`, if it has one.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Collects field errors while a form is read.
///
/// Each reader returns a placeholder on failure so that every field is
/// checked in one pass.
#[derive(Debug)]
pub(crate) struct Checker<'a> {
    rules: &'a FormRules,
    errors: FieldErrors,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(rules: &'a FormRules) -> Self {
        Self {
            rules,
            errors: FieldErrors::default(),
        }
    }

    pub(crate) fn rules(&self) -> &FormRules {
        self.rules
    }

    pub(crate) fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// A required text field, trimmed.
    pub(crate) fn text(&mut self, field: &'static str, value: &str) -> String {
        if is_entry_valid(value) {
            value.trim().to_string()
        } else {
            self.fail(field, BLANK_FIELD);
            String::new()
        }
    }

    pub(crate) fn integer<T>(&mut self, field: &'static str, value: &str) -> T
    where
        T: FromStr + PartialOrd + Default,
    {
        parse_integer(field, value).unwrap_or_else(|e| {
            self.errors.push(e);
            T::default()
        })
    }

    pub(crate) fn date(&mut self, field: &'static str, value: &str) -> NaiveDate {
        parse_date(field, value, &self.rules.date_format).unwrap_or_else(|e| {
            self.errors.push(e);
            self.rules.today
        })
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        self.errors.into_result(value)
    }
}

/// An optional text field: blank means absent.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    is_entry_valid(value).then(|| value.trim().to_string())
}
