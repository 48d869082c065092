//! Observable queries.
//!
//! A [`LiveQuery`] keeps the latest result of a storage query and re-runs it
//! when the tables it reads change. Changes made through the same
//! [`Database`] arrive as notifications; changes made by other processes are
//! picked up by polling `PRAGMA data_version`.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::storage::{Storage, Table};

/// The latest value of a query, kept current by a background task.
///
/// Dropping the `LiveQuery` stops the background task.
#[derive(Debug)]
pub struct LiveQuery<T> {
    rx: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> LiveQuery<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Run `query` once and keep re-running it when any of `tables` changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn spawn<F>(db: Database, tables: &[Table], query: F) -> Result<Self>
    where
        F: Fn(&Storage) -> Result<T> + Send + Sync + 'static,
    {
        let query = Arc::new(query);
        let tables = tables.to_vec();

        // Subscribe before the first read so no write slips between them.
        let changes = db.subscribe();
        let initial = run(&db, &query).await?;
        let version = db.with_storage(Storage::data_version).await?;

        let (tx, rx) = watch::channel(initial);
        let task = tokio::spawn(refresh(db, tables, query, tx, changes, version));

        Ok(Self { rx, task })
    }

    /// The current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next value that differs from the last one seen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObserverClosed`] if the background task has stopped.
    pub async fn changed(&mut self) -> Result<T> {
        self.rx
            .changed()
            .await
            .map_err(|_| Error::ObserverClosed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T, F>(db: &Database, query: &Arc<F>) -> Result<T>
where
    T: Send + 'static,
    F: Fn(&Storage) -> Result<T> + Send + Sync + 'static,
{
    let query = Arc::clone(query);
    db.with_storage(move |s| query(s)).await
}

async fn refresh<T, F>(
    db: Database,
    tables: Vec<Table>,
    query: Arc<F>,
    tx: watch::Sender<T>,
    mut changes: broadcast::Receiver<Table>,
    mut version: i64,
) where
    T: PartialEq + Send + Sync + 'static,
    F: Fn(&Storage) -> Result<T> + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(db.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        let stale = tokio::select! {
            change = changes.recv() => match change {
                Ok(table) => tables.contains(&table),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "change notifications lagged");
                    true
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = ticker.tick() => match db.with_storage(Storage::data_version).await {
                Ok(current) if current != version => {
                    version = current;
                    true
                }
                Ok(_) => false,
                Err(e) => {
                    warn!(error = %e, "failed to read data version");
                    false
                }
            },
            () = tx.closed() => break,
        };

        if !stale {
            continue;
        }

        match run(&db, &query).await {
            Ok(value) => {
                tx.send_if_modified(|current| {
                    if *current == value {
                        false
                    } else {
                        *current = value;
                        true
                    }
                });
            }
            Err(e) => warn!(error = %e, "live query refresh failed"),
        }
    }
}
