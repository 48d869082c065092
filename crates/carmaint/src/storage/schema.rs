//! `SQLite` schema definitions for carmaint.
//!
//! Dates are stored as ISO-8601 `TEXT` (`YYYY-MM-DD`) so they sort correctly.

/// SQL statement to create the vehicles table.
pub const CREATE_VEHICLES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_type TEXT NOT NULL,
    manufacturer TEXT NOT NULL,
    model TEXT NOT NULL,
    model_year INTEGER NOT NULL,
    license_plate TEXT NOT NULL,
    fuel_type TEXT NOT NULL,
    mileage INTEGER NOT NULL,
    image_uri TEXT
)
";

/// SQL statement to create the services table.
///
/// `services_done` holds a JSON array of strings.
pub const CREATE_SERVICES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS services (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_id INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
    services_done TEXT NOT NULL,
    service_date TEXT NOT NULL,
    current_mileage INTEGER NOT NULL,
    next_service_mileage INTEGER NOT NULL,
    next_service_date TEXT NOT NULL,
    total_cost INTEGER NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    receipt_image_uri TEXT
)
";

/// SQL statement to create the reminders table.
pub const CREATE_REMINDERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS reminders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    reminder_text TEXT NOT NULL,
    reminder_date TEXT NOT NULL,
    additional_text TEXT NOT NULL DEFAULT ''
)
";

/// SQL statement to create the notes table.
pub const CREATE_NOTES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    body TEXT NOT NULL
)
";

/// Index for listing a vehicle's service history.
pub const CREATE_SERVICES_VEHICLE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_services_vehicle ON services(vehicle_id, service_date DESC)
";

/// Index for upcoming reminder queries.
pub const CREATE_REMINDERS_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_reminders_date ON reminders(reminder_date)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_VEHICLES_TABLE,
    CREATE_SERVICES_TABLE,
    CREATE_REMINDERS_TABLE,
    CREATE_NOTES_TABLE,
    CREATE_SERVICES_VEHICLE_INDEX,
    CREATE_REMINDERS_DATE_INDEX,
    CREATE_METADATA_TABLE,
];
