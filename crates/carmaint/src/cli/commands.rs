//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::validation::{NoteForm, ReminderForm, ServiceForm, VehicleForm};

/// Vehicle commands.
#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// Register a vehicle
    Add(VehicleFields),

    /// Change fields of a registered vehicle
    Edit {
        /// Vehicle ID
        id: i64,
        #[command(flatten)]
        fields: VehicleFields,
    },

    /// List registered vehicles
    List(ListArgs),

    /// Show one vehicle and its service history
    Show {
        /// Vehicle ID
        id: i64,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Delete a vehicle and its service history
    Delete {
        /// Vehicle ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Follow the vehicle list as it changes, until interrupted
    Watch,
}

/// Service record commands.
#[derive(Debug, Subcommand)]
pub enum ServiceCommand {
    /// Record a service for a vehicle
    Add {
        /// Vehicle ID
        vehicle_id: i64,
        #[command(flatten)]
        fields: ServiceFields,
    },

    /// Change fields of a service record
    Edit {
        /// Vehicle ID
        vehicle_id: i64,
        /// Service ID
        service_id: i64,
        #[command(flatten)]
        fields: ServiceFields,
    },

    /// List the service history of a vehicle
    List {
        /// Vehicle ID
        vehicle_id: i64,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Delete a service record
    Delete {
        /// Service ID
        service_id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List vehicles whose next service has come due
    Due {
        /// Also include services due within this many days
        #[arg(short, long, value_name = "DAYS", default_value = "0")]
        within: u32,
        #[command(flatten)]
        list: ListArgs,
    },
}

/// Reminder commands.
#[derive(Debug, Subcommand)]
pub enum ReminderCommand {
    /// Add a reminder
    Add(ReminderFields),

    /// Change fields of a reminder
    Edit {
        /// Reminder ID
        id: i64,
        #[command(flatten)]
        fields: ReminderFields,
    },

    /// List reminders
    List {
        /// Only reminders dated today or later
        #[arg(short, long)]
        upcoming: bool,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Delete a reminder
    Delete {
        /// Reminder ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Note commands.
#[derive(Debug, Subcommand)]
pub enum NoteCommand {
    /// Add a note
    Add(NoteFields),

    /// Change fields of a note
    Edit {
        /// Note ID
        id: i64,
        #[command(flatten)]
        fields: NoteFields,
    },

    /// List notes
    List(ListArgs),

    /// Delete a note
    Delete {
        /// Note ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Vehicle form fields. Fields left out keep their current value.
#[derive(Debug, Clone, Default, Args)]
pub struct VehicleFields {
    /// Body type, e.g. Sedan
    #[arg(long = "type", value_name = "TYPE")]
    pub vehicle_type: Option<String>,
    /// Manufacturer, e.g. Toyota
    #[arg(long = "make", value_name = "MAKE")]
    pub manufacturer: Option<String>,
    /// Model, e.g. Corolla
    #[arg(long)]
    pub model: Option<String>,
    /// Model year
    #[arg(long = "year", value_name = "YEAR")]
    pub model_year: Option<String>,
    /// License plate
    #[arg(long = "plate", value_name = "PLATE")]
    pub license_plate: Option<String>,
    /// Fuel type, e.g. Petrol
    #[arg(long = "fuel", value_name = "FUEL")]
    pub fuel_type: Option<String>,
    /// Odometer reading
    #[arg(long)]
    pub mileage: Option<String>,
    /// Path or URI of a photo
    #[arg(long = "image", value_name = "URI")]
    pub image_uri: Option<String>,
}

/// Service form fields. Fields left out keep their current value.
#[derive(Debug, Clone, Default, Args)]
pub struct ServiceFields {
    /// Work carried out; repeat for each item
    #[arg(long = "done", value_name = "ITEM")]
    pub services_done: Vec<String>,
    /// Date of the service
    #[arg(long = "date", value_name = "DATE")]
    pub service_date: Option<String>,
    /// Odometer reading at the service
    #[arg(long = "mileage", value_name = "MILEAGE")]
    pub current_mileage: Option<String>,
    /// Mileage at which the next service is due
    #[arg(long = "next-mileage", value_name = "MILEAGE")]
    pub next_service_mileage: Option<String>,
    /// Date by which the next service is due
    #[arg(long = "next-date", value_name = "DATE")]
    pub next_service_date: Option<String>,
    /// Total cost
    #[arg(long = "cost", value_name = "AMOUNT")]
    pub total_cost: Option<String>,
    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Path or URI of a photo of the receipt
    #[arg(long = "receipt", value_name = "URI")]
    pub receipt_image_uri: Option<String>,
}

/// Reminder form fields. Fields left out keep their current value.
#[derive(Debug, Clone, Default, Args)]
pub struct ReminderFields {
    /// What to be reminded of
    #[arg(long = "text", value_name = "TEXT")]
    pub reminder_text: Option<String>,
    /// When; today if left blank
    #[arg(long = "date", value_name = "DATE")]
    pub reminder_date: Option<String>,
    /// Extra details
    #[arg(long = "details", value_name = "TEXT")]
    pub additional_text: Option<String>,
}

/// Note form fields. Fields left out keep their current value.
#[derive(Debug, Clone, Default, Args)]
pub struct NoteFields {
    /// Title
    #[arg(long)]
    pub title: Option<String>,
    /// Body text
    #[arg(long)]
    pub body: Option<String>,
}

fn overlay(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl VehicleFields {
    /// Write the supplied fields into `form`.
    pub fn apply_to(self, form: &mut VehicleForm) {
        overlay(&mut form.vehicle_type, self.vehicle_type);
        overlay(&mut form.manufacturer, self.manufacturer);
        overlay(&mut form.model, self.model);
        overlay(&mut form.model_year, self.model_year);
        overlay(&mut form.license_plate, self.license_plate);
        overlay(&mut form.fuel_type, self.fuel_type);
        overlay(&mut form.mileage, self.mileage);
        overlay(&mut form.image_uri, self.image_uri);
    }
}

impl ServiceFields {
    /// Write the supplied fields into `form`. Listed work replaces the
    /// existing list.
    pub fn apply_to(self, form: &mut ServiceForm) {
        if !self.services_done.is_empty() {
            form.services_done = self.services_done;
        }
        overlay(&mut form.service_date, self.service_date);
        overlay(&mut form.current_mileage, self.current_mileage);
        overlay(&mut form.next_service_mileage, self.next_service_mileage);
        overlay(&mut form.next_service_date, self.next_service_date);
        overlay(&mut form.total_cost, self.total_cost);
        overlay(&mut form.notes, self.notes);
        overlay(&mut form.receipt_image_uri, self.receipt_image_uri);
    }
}

impl ReminderFields {
    /// Write the supplied fields into `form`.
    pub fn apply_to(self, form: &mut ReminderForm) {
        overlay(&mut form.reminder_text, self.reminder_text);
        overlay(&mut form.reminder_date, self.reminder_date);
        overlay(&mut form.additional_text, self.additional_text);
    }
}

impl NoteFields {
    /// Write the supplied fields into `form`.
    pub fn apply_to(self, form: &mut NoteForm) {
        overlay(&mut form.title, self.title);
        overlay(&mut form.body, self.body);
    }
}

/// Arguments shared by list commands.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
