//! View models: the layer between screens and the database.
//!
//! Each view model owns a [`TaskScope`](crate::scope::TaskScope). Writes are
//! launched on it and not awaited; reads are exposed as live queries.

mod notes;
mod reminders;
mod services;
mod vehicles;

pub use notes::NotesViewModel;
pub use reminders::RemindersViewModel;
pub use services::ServicesViewModel;
pub use vehicles::VehiclesViewModel;
