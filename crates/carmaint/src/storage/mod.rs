//! Storage layer for carmaint.
//!
//! This module provides `SQLite`-based persistent storage for vehicles, their
//! service history, reminders and notes.

pub mod migrations;
mod record;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Reminder, Service, Vehicle};

pub(crate) use record::DATE_FORMAT;
pub use record::{Record, Table};

/// Storage engine for maintenance records.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Generic insert, update, delete and lookup for every [`Record`] type
/// - Service history per vehicle and services coming due
/// - Upcoming reminders
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a record and return its assigned ID.
    ///
    /// Any `id` already set on the record is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including a foreign
    /// key violation for a service whose vehicle does not exist.
    pub fn insert<R: Record>(&self, record: &R) -> Result<i64> {
        let placeholders = (1..=R::COLUMNS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            R::TABLE,
            R::COLUMNS.join(", "),
        );

        self.conn
            .execute(&sql, params_from_iter(record.to_values()?))?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted {} with id {}", R::KIND, id);
        Ok(id)
    }

    /// Overwrite the stored row with the record's values, matched by ID.
    ///
    /// Returns `true` if a row was updated, `false` if none has that ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the record has no ID or the database operation fails.
    pub fn update<R: Record>(&self, record: &R) -> Result<bool> {
        let id = record
            .id()
            .ok_or_else(|| Error::internal(format!("cannot update {} without an id", R::KIND)))?;

        let assignments = R::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{}",
            R::TABLE,
            R::COLUMNS.len() + 1
        );

        let mut values = record.to_values()?;
        values.push(id.into());
        let affected = self.conn.execute(&sql, params_from_iter(values))?;

        debug!("Updated {} {} ({} rows)", R::KIND, id, affected);
        Ok(affected > 0)
    }

    /// Delete a record by ID.
    ///
    /// Returns `true` if a record was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete<R: Record>(&self, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        let affected = self.conn.execute(&sql, [id])?;
        if affected > 0 {
            info!("Deleted {} {}", R::KIND, id);
        }
        Ok(affected > 0)
    }

    /// Get a record by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get<R: Record>(&self, id: i64) -> Result<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            R::select_list(),
            R::TABLE
        );
        let record = self.conn.query_row(&sql, [id], R::from_row).optional()?;
        Ok(record)
    }

    /// Get every record of a type in its natural order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all<R: Record>(&self) -> Result<Vec<R>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            R::select_list(),
            R::TABLE,
            R::ORDER_BY
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], R::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Count the rows in a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self, table: Table) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
        Ok(count)
    }

    /// Get the service history of a vehicle, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn services_for_vehicle(&self, vehicle_id: i64) -> Result<Vec<Service>> {
        let sql = format!(
            "SELECT {} FROM services WHERE vehicle_id = ?1 ORDER BY {}",
            Service::select_list(),
            Service::ORDER_BY
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let services = stmt
            .query_map([vehicle_id], Service::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(services)
    }

    /// Get each vehicle whose next service is due on the given date.
    ///
    /// Only the latest service of each vehicle is considered. It is due when
    /// its next-service date is on or before `on`, or when the vehicle's
    /// recorded mileage has reached the next-service mileage. Results are
    /// ordered by next-service date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn services_due(&self, on: NaiveDate) -> Result<Vec<(Vehicle, Service)>> {
        let sql = format!(
            r"
            SELECT {}
            FROM services s JOIN vehicles v ON v.id = s.vehicle_id
            WHERE s.id = (
                SELECT t.id FROM services t WHERE t.vehicle_id = s.vehicle_id
                ORDER BY t.service_date DESC, t.id DESC LIMIT 1
            )
            ORDER BY s.next_service_date ASC, v.id ASC
            ",
            prefixed_select_list::<Service>("s")
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let latest = stmt
            .query_map([], Service::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut due = Vec::new();
        for service in latest {
            let vehicle = self
                .get::<Vehicle>(service.vehicle_id)?
                .ok_or_else(|| Error::not_found(Vehicle::KIND, service.vehicle_id))?;
            if service.is_due(on, vehicle.mileage) {
                due.push((vehicle, service));
            }
        }
        Ok(due)
    }

    /// Get reminders dated on or after `from`, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn upcoming_reminders(&self, from: NaiveDate) -> Result<Vec<Reminder>> {
        let sql = format!(
            "SELECT {} FROM reminders WHERE reminder_date >= ?1 ORDER BY {}",
            Reminder::select_list(),
            Reminder::ORDER_BY
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let reminders = stmt
            .query_map(
                params![from.format(DATE_FORMAT).to_string()],
                Reminder::from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    /// The connection's `PRAGMA data_version`.
    ///
    /// The value changes whenever another connection commits to the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn data_version(&self) -> Result<i64> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA data_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            vehicles: self.count(Table::Vehicles)?,
            services: self.count(Table::Services)?,
            reminders: self.count(Table::Reminders)?,
            notes: self.count(Table::Notes)?,
            db_size_bytes,
        })
    }
}

/// `SELECT` list for a record with every column qualified by `alias`.
fn prefixed_select_list<R: Record>(alias: &str) -> String {
    std::iter::once("id")
        .chain(R::COLUMNS.iter().copied())
        .map(|column| format!("{alias}.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of registered vehicles.
    pub vehicles: i64,
    /// Number of service records.
    pub services: i64,
    /// Number of reminders.
    pub reminders: i64,
    /// Number of notes.
    pub notes: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
