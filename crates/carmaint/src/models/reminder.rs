use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated reminder, e.g. "Renew insurance".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Identifier assigned by storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// What to be reminded of.
    pub reminder_text: String,
    /// When the reminder falls due.
    pub reminder_date: NaiveDate,
    /// Extra details, possibly empty.
    pub additional_text: String,
}
