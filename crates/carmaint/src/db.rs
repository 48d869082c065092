//! Async handle over [`Storage`].
//!
//! Storage calls run on the blocking thread pool. Every successful write
//! publishes the tables it touched so live queries can refresh.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::broadcast;
use tracing::trace;

use crate::error::{Error, Result};
use crate::models::{Reminder, Service, Vehicle};
use crate::observe::LiveQuery;
use crate::storage::{Record, Storage, StorageStats, Table};

/// Capacity of the change notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Default interval for live queries to look for writes by other processes.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A cloneable, thread-safe database handle.
#[derive(Debug, Clone)]
pub struct Database {
    storage: Arc<Mutex<Storage>>,
    changes: broadcast::Sender<Table>,
    poll_interval: Duration,
}

impl Database {
    /// Wrap an opened storage.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            storage: Arc::new(Mutex::new(storage)),
            changes,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Open or create the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Storage::open(path).map(Self::new)
    }

    /// Open a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Storage::open_in_memory().map(Self::new)
    }

    /// Set how often live queries poll for writes made by other processes.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The live query poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Subscribe to table change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.changes.subscribe()
    }

    /// Run `f` against the storage on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or an internal error if the storage lock
    /// is poisoned or the blocking task panics.
    pub async fn with_storage<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Storage) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let guard = storage
                .lock()
                .map_err(|_| Error::internal("storage lock poisoned"))?;
            f(&guard)
        })
        .await
        .map_err(|e| Error::internal(format!("storage task failed: {e}")))?
    }

    fn notify(&self, tables: impl IntoIterator<Item = Table>) {
        for table in tables {
            trace!(%table, "table changed");
            // No receivers just means nobody is observing.
            let _ = self.changes.send(table);
        }
    }

    /// Insert a record and return its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn insert<R: Record>(&self, record: R) -> Result<i64> {
        let id = self.with_storage(move |s| s.insert(&record)).await?;
        self.notify([R::TABLE]);
        Ok(id)
    }

    /// Update a record by its ID. Returns whether a row changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the record has no ID or the update fails.
    pub async fn update<R: Record>(&self, record: R) -> Result<bool> {
        let updated = self.with_storage(move |s| s.update(&record)).await?;
        if updated {
            self.notify([R::TABLE]);
        }
        Ok(updated)
    }

    /// Delete a record by ID. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete<R: Record>(&self, id: i64) -> Result<bool> {
        let deleted = self.with_storage(move |s| s.delete::<R>(id)).await?;
        if deleted {
            self.notify(std::iter::once(R::TABLE).chain(R::CASCADES_TO.iter().copied()));
        }
        Ok(deleted)
    }

    /// Get a record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get<R: Record>(&self, id: i64) -> Result<Option<R>> {
        self.with_storage(move |s| s.get::<R>(id)).await
    }

    /// Get a record by ID, failing with [`Error::NotFound`] if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or no record has that ID.
    pub async fn require<R: Record>(&self, id: i64) -> Result<R> {
        self.get::<R>(id)
            .await?
            .ok_or_else(|| Error::not_found(R::KIND, id))
    }

    /// Storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn stats(&self) -> Result<StorageStats> {
        self.with_storage(Storage::stats).await
    }

    /// Vehicles whose latest service has come due on `on`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn services_due(&self, on: NaiveDate) -> Result<Vec<(Vehicle, Service)>> {
        self.with_storage(move |s| s.services_due(on)).await
    }

    /// Reminders dated on or after `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn upcoming_reminders(&self, from: NaiveDate) -> Result<Vec<Reminder>> {
        self.with_storage(move |s| s.upcoming_reminders(from)).await
    }

    /// Observe every record of a type.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_all<R: Record>(&self) -> Result<LiveQuery<Vec<R>>> {
        LiveQuery::spawn(self.clone(), &[R::TABLE], |s: &Storage| s.all::<R>()).await
    }

    /// Observe a single record. The value is `None` once the record is gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe<R: Record>(&self, id: i64) -> Result<LiveQuery<Option<R>>> {
        LiveQuery::spawn(self.clone(), &[R::TABLE], move |s: &Storage| s.get::<R>(id)).await
    }

    /// Observe the service history of a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_services_for_vehicle(
        &self,
        vehicle_id: i64,
    ) -> Result<LiveQuery<Vec<Service>>> {
        LiveQuery::spawn(self.clone(), &[Table::Services], move |s: &Storage| {
            s.services_for_vehicle(vehicle_id)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Note;
    use crate::storage::tests::{date, sample_service, sample_vehicle};

    fn note(title: &str) -> Note {
        Note {
            id: None,
            title: title.to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_publishes_change() {
        let db = Database::open_in_memory().unwrap();
        let mut changes = db.subscribe();

        db.insert(note("Wipers")).await.unwrap();

        assert_eq!(changes.recv().await.unwrap(), Table::Notes);
    }

    #[tokio::test]
    async fn test_update_missing_row_publishes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let mut changes = db.subscribe();

        let mut missing = note("Ghost");
        missing.id = Some(5);
        assert!(!db.update(missing).await.unwrap());

        assert!(matches!(
            changes.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_delete_vehicle_publishes_cascade() {
        let db = Database::open_in_memory().unwrap();
        let vehicle_id = db.insert(sample_vehicle("KCA 001A")).await.unwrap();
        db.insert(sample_service(vehicle_id, date(2024, 1, 1)))
            .await
            .unwrap();

        let mut changes = db.subscribe();
        assert!(db.delete::<Vehicle>(vehicle_id).await.unwrap());

        assert_eq!(changes.recv().await.unwrap(), Table::Vehicles);
        assert_eq!(changes.recv().await.unwrap(), Table::Services);
        assert_eq!(db.stats().await.unwrap().services, 0);
    }

    #[tokio::test]
    async fn test_require_missing_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db.require::<Vehicle>(3).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "vehicle 3 not found");
    }

    #[tokio::test]
    async fn test_get_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert(note("Battery")).await.unwrap();

        let stored: Note = db.get(id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Battery");
        assert_eq!(stored.id, Some(id));
    }

    #[test]
    fn test_poll_interval_builder() {
        let db = Database::open_in_memory()
            .unwrap()
            .with_poll_interval(Duration::from_millis(20));
        assert_eq!(db.poll_interval(), Duration::from_millis(20));
    }
}
