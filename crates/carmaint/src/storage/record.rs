//! Mapping between record types and their tables.

use std::fmt;

use chrono::NaiveDate;
use rusqlite::types::{Type, Value};
use rusqlite::Row;

use crate::error::Result;
use crate::models::{Note, Reminder, Service, Vehicle};

/// Storage format for date columns.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A table holding one kind of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Registered vehicles.
    Vehicles,
    /// Service history, keyed by vehicle.
    Services,
    /// Dated reminders.
    Reminders,
    /// Free-form notes.
    Notes,
}

impl Table {
    /// The SQL table name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Services => "services",
            Self::Reminders => "reminders",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type persisted as one row of a [`Table`].
///
/// Rows are read as `id` followed by [`Record::COLUMNS`] in order, and written
/// from [`Record::to_values`] in the same order.
pub trait Record: Clone + PartialEq + Send + Sync + 'static {
    /// The table this record lives in.
    const TABLE: Table;
    /// Singular name used in messages, e.g. "vehicle".
    const KIND: &'static str;
    /// Columns other than `id`.
    const COLUMNS: &'static [&'static str];
    /// `ORDER BY` clause for listing all records.
    const ORDER_BY: &'static str;
    /// Tables whose rows are removed along with a record of this type.
    const CASCADES_TO: &'static [Table] = &[];

    /// The storage-assigned identifier, if persisted.
    fn id(&self) -> Option<i64>;

    /// Column values in [`Record::COLUMNS`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be encoded.
    fn to_values(&self) -> Result<Vec<Value>>;

    /// Build a record from a row of `id` followed by [`Record::COLUMNS`].
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or malformed.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Comma-separated column list including `id`, for `SELECT`.
    #[must_use]
    fn select_list() -> String {
        let mut list = String::from("id");
        for column in Self::COLUMNS {
            list.push_str(", ");
            list.push_str(column);
        }
        list
    }
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format(DATE_FORMAT).to_string())
}

impl Record for Vehicle {
    const TABLE: Table = Table::Vehicles;
    const KIND: &'static str = "vehicle";
    const COLUMNS: &'static [&'static str] = &[
        "vehicle_type",
        "manufacturer",
        "model",
        "model_year",
        "license_plate",
        "fuel_type",
        "mileage",
        "image_uri",
    ];
    const ORDER_BY: &'static str = "id ASC";
    const CASCADES_TO: &'static [Table] = &[Table::Services];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_values(&self) -> Result<Vec<Value>> {
        Ok(vec![
            Value::from(self.vehicle_type.clone()),
            Value::from(self.manufacturer.clone()),
            Value::from(self.model.clone()),
            Value::from(self.model_year),
            Value::from(self.license_plate.clone()),
            Value::from(self.fuel_type.clone()),
            Value::from(self.mileage),
            Value::from(self.image_uri.clone()),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            vehicle_type: row.get(1)?,
            manufacturer: row.get(2)?,
            model: row.get(3)?,
            model_year: row.get(4)?,
            license_plate: row.get(5)?,
            fuel_type: row.get(6)?,
            mileage: row.get(7)?,
            image_uri: row.get(8)?,
        })
    }
}

impl Record for Service {
    const TABLE: Table = Table::Services;
    const KIND: &'static str = "service";
    const COLUMNS: &'static [&'static str] = &[
        "vehicle_id",
        "services_done",
        "service_date",
        "current_mileage",
        "next_service_mileage",
        "next_service_date",
        "total_cost",
        "notes",
        "receipt_image_uri",
    ];
    const ORDER_BY: &'static str = "service_date DESC, id DESC";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_values(&self) -> Result<Vec<Value>> {
        Ok(vec![
            Value::from(self.vehicle_id),
            Value::from(serde_json::to_string(&self.services_done)?),
            date_value(self.service_date),
            Value::from(self.current_mileage),
            Value::from(self.next_service_mileage),
            date_value(self.next_service_date),
            Value::from(self.total_cost),
            Value::from(self.notes.clone()),
            Value::from(self.receipt_image_uri.clone()),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let services_json: String = row.get(2)?;
        let services_done = serde_json::from_str(&services_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

        Ok(Self {
            id: Some(row.get(0)?),
            vehicle_id: row.get(1)?,
            services_done,
            service_date: date_column(row, 3)?,
            current_mileage: row.get(4)?,
            next_service_mileage: row.get(5)?,
            next_service_date: date_column(row, 6)?,
            total_cost: row.get(7)?,
            notes: row.get(8)?,
            receipt_image_uri: row.get(9)?,
        })
    }
}

impl Record for Reminder {
    const TABLE: Table = Table::Reminders;
    const KIND: &'static str = "reminder";
    const COLUMNS: &'static [&'static str] = &["reminder_text", "reminder_date", "additional_text"];
    const ORDER_BY: &'static str = "reminder_date ASC, id ASC";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_values(&self) -> Result<Vec<Value>> {
        Ok(vec![
            Value::from(self.reminder_text.clone()),
            date_value(self.reminder_date),
            Value::from(self.additional_text.clone()),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            reminder_text: row.get(1)?,
            reminder_date: date_column(row, 2)?,
            additional_text: row.get(3)?,
        })
    }
}

impl Record for Note {
    const TABLE: Table = Table::Notes;
    const KIND: &'static str = "note";
    const COLUMNS: &'static [&'static str] = &["title", "body"];
    const ORDER_BY: &'static str = "id DESC";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn to_values(&self) -> Result<Vec<Value>> {
        Ok(vec![
            Value::from(self.title.clone()),
            Value::from(self.body.clone()),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            body: row.get(2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Vehicles.to_string(), "vehicles");
        assert_eq!(Table::Services.name(), "services");
        assert_eq!(Table::Reminders.name(), "reminders");
        assert_eq!(Table::Notes.name(), "notes");
    }

    #[test]
    fn test_select_list() {
        assert_eq!(Note::select_list(), "id, title, body");
    }

    #[test]
    fn test_values_match_columns() {
        let note = Note {
            id: None,
            title: "Tyres".to_string(),
            body: "Rotate every 10,000 km".to_string(),
        };
        assert_eq!(note.to_values().unwrap().len(), Note::COLUMNS.len());

        let reminder = Reminder {
            id: None,
            reminder_text: "Insurance".to_string(),
            reminder_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            additional_text: String::new(),
        };
        let values = reminder.to_values().unwrap();
        assert_eq!(values.len(), Reminder::COLUMNS.len());
        assert_eq!(values[1], Value::Text("2030-01-01".to_string()));
    }

    #[test]
    fn test_vehicle_cascades_to_services() {
        assert_eq!(Vehicle::CASCADES_TO, &[Table::Services]);
        assert!(Note::CASCADES_TO.is_empty());
    }
}
