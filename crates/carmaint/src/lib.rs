//! `carmaint` - Vehicle maintenance records
//!
//! This library keeps a local record of vehicles, their service history,
//! reminders and notes. Screens validate user input and queue writes on
//! view models; reads are live queries that refresh when the data changes.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod observe;
pub mod scope;
pub mod screens;
pub mod storage;
pub mod validation;
pub mod viewmodels;

pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use models::{Note, Reminder, Service, Vehicle};
pub use observe::LiveQuery;
pub use screens::Outcome;
pub use storage::{Storage, StorageStats};
