//! `carmaint` - CLI for vehicle maintenance records
//!
//! This binary provides the command-line interface over the carmaint library.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::future::Future;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use chrono::{Days, Local};
use clap::Parser;
use serde::Serialize;
use tracing::debug;

use carmaint::adapter::{
    format_distance, render_table, ListAdapter, ListChange, NoteBinder, ReminderBinder, RowBinder,
    ServiceBinder, VehicleBinder,
};
use carmaint::cli::{
    Cli, Command, ConfigCommand, NoteCommand, OutputFormat, ReminderCommand, ServiceCommand,
    VehicleCommand,
};
use carmaint::screens::{NoteScreens, ReminderScreens, ServiceScreens, VehicleScreens};
use carmaint::storage::Record;
use carmaint::validation::{FormRules, NoteForm, ReminderForm, ServiceForm, VehicleForm};
use carmaint::viewmodels::{NotesViewModel, RemindersViewModel, ServicesViewModel, VehiclesViewModel};
use carmaint::{init_logging, Config, Database, Outcome, Vehicle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd),
        Command::Status(cmd) => handle_status(&config, &open_database(&config)?, cmd.json).await,
        Command::Vehicle(cmd) => handle_vehicle(&config, open_database(&config)?, cmd).await,
        Command::Service(cmd) => handle_service(&config, open_database(&config)?, cmd).await,
        Command::Reminder(cmd) => handle_reminder(&config, open_database(&config)?, cmd).await,
        Command::Note(cmd) => handle_note(open_database(&config)?, cmd).await,
    }
}

fn open_database(config: &Config) -> anyhow::Result<Database> {
    let path = config.database_path();
    let db = Database::open(&path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;
    Ok(db.with_poll_interval(config.poll_interval()))
}

/// Print a finished action, or turn a rejected one into an error.
fn report(outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Done(message) => {
            println!("{message}");
            Ok(())
        }
        Outcome::Invalid(errors) => Err(anyhow::Error::new(errors).context("the form has errors")),
        Outcome::Failed(message) | Outcome::ConfirmationRequired(message) => bail!(message),
    }
}

fn ask(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

/// Run a delete, asking the user first unless `yes` was given.
async fn delete_with_confirmation<F, Fut>(yes: bool, delete: F) -> anyhow::Result<()>
where
    F: Fn(bool) -> Fut,
    Fut: Future<Output = carmaint::Result<Outcome>>,
{
    match delete(yes).await? {
        Outcome::ConfirmationRequired(prompt) => {
            if ask(&prompt)? {
                report(delete(true).await?)
            } else {
                println!("Cancelled.");
                Ok(())
            }
        }
        outcome => report(outcome),
    }
}

fn print_list<T, B>(items: Vec<T>, binder: B, format: OutputFormat) -> anyhow::Result<()>
where
    T: Record + Serialize,
    B: RowBinder<T>,
{
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("No {}s found.", T::KIND);
        return Ok(());
    }

    let mut adapter = ListAdapter::new(binder);
    adapter.submit_list(items);
    match format {
        OutputFormat::Table => println!("{}", render_table(adapter.headers(), &adapter.rows())),
        _ => {
            for row in adapter.rows() {
                println!("{}", row.join("\t"));
            }
        }
    }
    Ok(())
}

async fn handle_vehicle(config: &Config, db: Database, cmd: VehicleCommand) -> anyhow::Result<()> {
    let screens = VehicleScreens::new(db.clone());
    match cmd {
        VehicleCommand::Add(fields) => {
            let mut form = VehicleForm::default();
            fields.apply_to(&mut form);
            report(screens.register(&form).await)
        }
        VehicleCommand::Edit { id, fields } => {
            report(screens.edit(id, |form| fields.apply_to(form)).await?)
        }
        VehicleCommand::List(list) => {
            let vehicles = screens.view_model().all_vehicles().await?.get();
            print_list(vehicles, VehicleBinder::new(config.display.clone()), list.format)
        }
        VehicleCommand::Show { id, json } => show_vehicle(config, &db, id, json).await,
        VehicleCommand::Delete { id, yes } => {
            delete_with_confirmation(yes, |confirmed| screens.delete(id, confirmed)).await
        }
        VehicleCommand::Watch => watch_vehicles(config, screens.view_model()).await,
    }
}

async fn show_vehicle(config: &Config, db: &Database, id: i64, json: bool) -> anyhow::Result<()> {
    let vehicle: Vehicle = db.require(id).await?;
    let history = ServicesViewModel::new(db.clone())
        .services_for_vehicle(id)
        .await?
        .get();

    if json {
        let value = serde_json::json!({ "vehicle": vehicle, "services": history });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} ({})", vehicle.display_name(), vehicle.license_plate);
    println!("----------------------------------------");
    println!("Type:       {}", vehicle.vehicle_type);
    println!("Year:       {}", vehicle.model_year);
    println!("Fuel:       {}", vehicle.fuel_type);
    println!(
        "Mileage:    {}",
        format_distance(vehicle.mileage, &config.display.distance_unit)
    );
    if let Some(image) = &vehicle.image_uri {
        println!("Image:      {image}");
    }
    println!();
    print_list(
        history,
        ServiceBinder::new(config.display.clone()),
        OutputFormat::Table,
    )
}

async fn watch_vehicles(config: &Config, vm: &VehiclesViewModel) -> anyhow::Result<()> {
    let mut live = vm.all_vehicles().await?;
    let binder = VehicleBinder::new(config.display.clone());
    let mut adapter = ListAdapter::new(binder.clone());

    adapter.submit_list(live.get());
    println!("{}", render_table(adapter.headers(), &adapter.rows()));
    println!();
    println!("Watching for changes (Ctrl-C to stop)...");

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                debug!("watch interrupted");
                return Ok(());
            }
            next = live.changed() => {
                let previous = adapter.items().to_vec();
                for change in adapter.submit_list(next?) {
                    let (mark, cells) = match change {
                        ListChange::Removed { position } => ("-", binder.bind(&previous[position])),
                        ListChange::Inserted { position } => ("+", bind_at(&adapter, position)),
                        ListChange::Changed { position } => ("~", bind_at(&adapter, position)),
                        ListChange::Moved { to, .. } => (">", bind_at(&adapter, to)),
                    };
                    println!("{mark} {}", cells.join("  "));
                }
            }
        }
    }
}

fn bind_at(adapter: &ListAdapter<Vehicle, VehicleBinder>, position: usize) -> Vec<String> {
    adapter.row(position).unwrap_or_default()
}

async fn handle_service(config: &Config, db: Database, cmd: ServiceCommand) -> anyhow::Result<()> {
    let screens = ServiceScreens::new(db, FormRules::from_config(config));
    match cmd {
        ServiceCommand::Add { vehicle_id, fields } => {
            let mut form = ServiceForm::default();
            fields.apply_to(&mut form);
            report(screens.add(vehicle_id, &form).await?)
        }
        ServiceCommand::Edit {
            vehicle_id,
            service_id,
            fields,
        } => report(
            screens
                .edit(vehicle_id, service_id, |form| fields.apply_to(form))
                .await?,
        ),
        ServiceCommand::List { vehicle_id, list } => {
            let history = screens
                .view_model()
                .services_for_vehicle(vehicle_id)
                .await?
                .get();
            print_list(history, ServiceBinder::new(config.display.clone()), list.format)
        }
        ServiceCommand::Delete { service_id, yes } => {
            delete_with_confirmation(yes, |confirmed| screens.delete(service_id, confirmed)).await
        }
        ServiceCommand::Due { within, list } => {
            let on = Local::now()
                .date_naive()
                .checked_add_days(Days::new(u64::from(within)))
                .context("date out of range")?;
            print_due(config, screens.view_model(), on, list.format).await
        }
    }
}

async fn print_due(
    config: &Config,
    vm: &ServicesViewModel,
    on: chrono::NaiveDate,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let due = vm.services_due(on).await?;

    if format == OutputFormat::Json {
        let value: Vec<_> = due
            .iter()
            .map(|(vehicle, service)| serde_json::json!({ "vehicle": vehicle, "service": service }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    if due.is_empty() {
        println!("No services due.");
        return Ok(());
    }

    let unit = &config.display.distance_unit;
    let rows: Vec<Vec<String>> = due
        .iter()
        .map(|(vehicle, service)| {
            vec![
                vehicle.id.map(|id| id.to_string()).unwrap_or_default(),
                vehicle.display_name(),
                vehicle.license_plate.clone(),
                format_distance(vehicle.mileage, unit),
                format_distance(service.next_service_mileage, unit),
                service
                    .next_service_date
                    .format(&config.display.date_format)
                    .to_string(),
            ]
        })
        .collect();

    if format == OutputFormat::Table {
        let headers = ["ID", "VEHICLE", "PLATE", "MILEAGE", "DUE AT", "DUE BY"];
        println!("{}", render_table(&headers, &rows));
    } else {
        for row in rows {
            println!("{}", row.join("\t"));
        }
    }
    Ok(())
}

async fn handle_reminder(
    config: &Config,
    db: Database,
    cmd: ReminderCommand,
) -> anyhow::Result<()> {
    let screens = ReminderScreens::new(db, FormRules::from_config(config));
    match cmd {
        ReminderCommand::Add(fields) => {
            let mut form = ReminderForm::default();
            fields.apply_to(&mut form);
            report(screens.add(&form).await)
        }
        ReminderCommand::Edit { id, fields } => {
            report(screens.edit(id, |form| fields.apply_to(form)).await?)
        }
        ReminderCommand::List { upcoming, list } => {
            let vm: &RemindersViewModel = screens.view_model();
            let reminders = if upcoming {
                vm.upcoming_reminders(Local::now().date_naive()).await?
            } else {
                vm.all_reminders().await?.get()
            };
            print_list(reminders, ReminderBinder::new(&config.display), list.format)
        }
        ReminderCommand::Delete { id, yes } => {
            delete_with_confirmation(yes, |confirmed| screens.delete(id, confirmed)).await
        }
    }
}

async fn handle_note(db: Database, cmd: NoteCommand) -> anyhow::Result<()> {
    let screens = NoteScreens::new(db);
    match cmd {
        NoteCommand::Add(fields) => {
            let mut form = NoteForm::default();
            fields.apply_to(&mut form);
            report(screens.add(&form).await)
        }
        NoteCommand::Edit { id, fields } => {
            report(screens.edit(id, |form| fields.apply_to(form)).await?)
        }
        NoteCommand::List(list) => {
            let vm: &NotesViewModel = screens.view_model();
            print_list(vm.all_notes().await?.get(), NoteBinder, list.format)
        }
        NoteCommand::Delete { id, yes } => {
            delete_with_confirmation(yes, |confirmed| screens.delete(id, confirmed)).await
        }
    }
}

async fn handle_status(config: &Config, db: &Database, json: bool) -> anyhow::Result<()> {
    let stats = db.stats().await?;
    let today = Local::now().date_naive();
    let due = db.services_due(today).await?.len();
    let upcoming = db.upcoming_reminders(today).await?.len();

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "database_size_bytes": stats.db_size_bytes,
            "vehicles": stats.vehicles,
            "services": stats.services,
            "services_due": due,
            "reminders": stats.reminders,
            "upcoming_reminders": upcoming,
            "notes": stats.notes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("carmaint status");
        println!("---------------");
        println!("Database:      {}", config.database_path().display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Vehicles:      {}", stats.vehicles);
        println!("Services:      {} ({due} due)", stats.services);
        println!("Reminders:     {} ({upcoming} upcoming)", stats.reminders);
        println!("Notes:         {}", stats.notes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Display]");
                println!("  Date format:        {}", config.display.date_format);
                println!("  Distance unit:      {}", config.display.distance_unit);
                println!("  Currency:           {}", config.display.currency);
                println!();
                println!("[Observe]");
                println!("  Poll interval (ms): {}", config.observe.poll_interval_ms);
                println!();
                println!("[Reminders]");
                println!(
                    "  Allow past dates:   {}",
                    config.reminders.allow_past_dates
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
