//! Record types for vehicles, service history, reminders and notes.
//!
//! Every record carries an `id` that is `None` until the storage layer
//! assigns one on insert.

mod note;
mod reminder;
mod service;
mod vehicle;

pub use note::Note;
pub use reminder::Reminder;
pub use service::Service;
pub use vehicle::Vehicle;
