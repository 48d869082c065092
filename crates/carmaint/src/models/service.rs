use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One visit to the garage for a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Identifier assigned by storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// The vehicle this service belongs to.
    pub vehicle_id: i64,
    /// Work carried out, one entry per item.
    pub services_done: Vec<String>,
    /// Date of the service.
    pub service_date: NaiveDate,
    /// Odometer reading at the time of service.
    pub current_mileage: i32,
    /// Mileage at which the next service is due.
    pub next_service_mileage: i32,
    /// Date by which the next service is due.
    pub next_service_date: NaiveDate,
    /// Total cost in the configured currency.
    pub total_cost: i64,
    /// Free-form notes.
    pub notes: String,
    /// Location of a photo of the receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_image_uri: Option<String>,
}

impl Service {
    /// Whether the next service is due on `today` for a vehicle at `mileage`.
    #[must_use]
    pub fn is_due(&self, today: NaiveDate, mileage: i32) -> bool {
        self.next_service_date <= today || mileage >= self.next_service_mileage
    }
}
