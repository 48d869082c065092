use chrono::NaiveDate;

use crate::db::Database;
use crate::error::Result;
use crate::models::Reminder;
use crate::observe::LiveQuery;
use crate::scope::TaskScope;

/// View model for the reminders screens.
#[derive(Debug)]
pub struct RemindersViewModel {
    db: Database,
    scope: TaskScope,
}

impl RemindersViewModel {
    /// Create a view model with its own task scope.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            db,
            scope: TaskScope::new("reminders"),
        }
    }

    /// Every reminder, soonest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn all_reminders(&self) -> Result<LiveQuery<Vec<Reminder>>> {
        self.db.observe_all().await
    }

    /// Reminders dated on or after `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn upcoming_reminders(&self, from: NaiveDate) -> Result<Vec<Reminder>> {
        self.db.upcoming_reminders(from).await
    }

    /// One reminder by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn retrieve_reminder(&self, id: i64) -> Result<LiveQuery<Option<Reminder>>> {
        self.db.observe(id).await
    }

    /// Save a new reminder in the background.
    ///
    /// Returns whether the write was accepted.
    pub fn add_new_reminder(&self, reminder: Reminder) -> bool {
        let db = self.db.clone();
        self.scope.launch(async move { db.insert(reminder).await })
    }

    /// Overwrite reminder `id` in the background.
    ///
    /// Returns whether the write was accepted.
    pub fn update_reminder(&self, id: i64, mut reminder: Reminder) -> bool {
        reminder.id = Some(id);
        let db = self.db.clone();
        self.scope.launch(async move { db.update(reminder).await })
    }

    /// Delete a reminder in the background.
    pub fn delete_reminder(&self, reminder: &Reminder) {
        let Some(id) = reminder.id else {
            return;
        };
        let db = self.db.clone();
        self.scope
            .launch(async move { db.delete::<Reminder>(id).await });
    }

    /// Wait for launched writes to finish.
    pub async fn settle(&self) {
        self.scope.settle().await;
    }
}
