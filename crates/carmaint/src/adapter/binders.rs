use crate::config::DisplayConfig;
use crate::models::{Note, Reminder, Service, Vehicle};

use super::RowBinder;

/// Group digits in threes, e.g. `120000` becomes `120,000`.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// A mileage value with its unit, e.g. `120,000 km`.
#[must_use]
pub fn format_distance(value: i32, unit: &str) -> String {
    format!("{} {unit}", group_thousands(i64::from(value)))
}

/// A service cost with its currency, e.g. `KES 8,500`.
#[must_use]
pub fn format_cost(amount: i64, currency: &str) -> String {
    format!("{currency} {}", group_thousands(amount))
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

/// Rows of the vehicle list.
#[derive(Debug, Clone)]
pub struct VehicleBinder {
    display: DisplayConfig,
}

impl VehicleBinder {
    /// Format cells with `display` settings.
    #[must_use]
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }
}

impl RowBinder<Vehicle> for VehicleBinder {
    fn headers(&self) -> &'static [&'static str] {
        &["ID", "TYPE", "VEHICLE", "YEAR", "PLATE", "FUEL", "MILEAGE"]
    }

    fn bind(&self, vehicle: &Vehicle) -> Vec<String> {
        vec![
            id_cell(vehicle.id),
            vehicle.vehicle_type.clone(),
            vehicle.display_name(),
            vehicle.model_year.to_string(),
            vehicle.license_plate.clone(),
            vehicle.fuel_type.clone(),
            format_distance(vehicle.mileage, &self.display.distance_unit),
        ]
    }
}

/// Rows of a vehicle's service history.
#[derive(Debug, Clone)]
pub struct ServiceBinder {
    display: DisplayConfig,
}

impl ServiceBinder {
    /// Format cells with `display` settings.
    #[must_use]
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }
}

impl RowBinder<Service> for ServiceBinder {
    fn headers(&self) -> &'static [&'static str] {
        &[
            "ID",
            "SERVICES",
            "DATE",
            "MILEAGE",
            "NEXT MILEAGE",
            "NEXT DATE",
            "COST",
            "NOTES",
        ]
    }

    fn bind(&self, service: &Service) -> Vec<String> {
        let unit = &self.display.distance_unit;
        let dates = &self.display.date_format;
        vec![
            id_cell(service.id),
            service.services_done.join(", "),
            service.service_date.format(dates).to_string(),
            format_distance(service.current_mileage, unit),
            format_distance(service.next_service_mileage, unit),
            service.next_service_date.format(dates).to_string(),
            format_cost(service.total_cost, &self.display.currency),
            service.notes.clone(),
        ]
    }
}

/// Rows of the reminder list.
#[derive(Debug, Clone)]
pub struct ReminderBinder {
    date_format: String,
}

impl ReminderBinder {
    /// Format cells with `display` settings.
    #[must_use]
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            date_format: display.date_format.clone(),
        }
    }
}

impl RowBinder<Reminder> for ReminderBinder {
    fn headers(&self) -> &'static [&'static str] {
        &["ID", "DATE", "REMINDER", "DETAILS"]
    }

    fn bind(&self, reminder: &Reminder) -> Vec<String> {
        vec![
            id_cell(reminder.id),
            reminder.reminder_date.format(&self.date_format).to_string(),
            reminder.reminder_text.clone(),
            reminder.additional_text.clone(),
        ]
    }
}

/// Rows of the note list. Bodies are cut to their first line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteBinder;

impl RowBinder<Note> for NoteBinder {
    fn headers(&self) -> &'static [&'static str] {
        &["ID", "TITLE", "NOTE"]
    }

    fn bind(&self, note: &Note) -> Vec<String> {
        vec![
            id_cell(note.id),
            note.title.clone(),
            note.body.lines().next().unwrap_or_default().to_string(),
        ]
    }
}
