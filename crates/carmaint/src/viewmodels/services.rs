use chrono::NaiveDate;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Service, Vehicle};
use crate::observe::LiveQuery;
use crate::scope::TaskScope;

/// View model for a vehicle's service history and the add-service screen.
#[derive(Debug)]
pub struct ServicesViewModel {
    db: Database,
    scope: TaskScope,
}

impl ServicesViewModel {
    /// Create a view model with its own task scope.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            db,
            scope: TaskScope::new("services"),
        }
    }

    /// Service history of one vehicle, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn services_for_vehicle(&self, vehicle_id: i64) -> Result<LiveQuery<Vec<Service>>> {
        self.db.observe_services_for_vehicle(vehicle_id).await
    }

    /// One service record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn retrieve_service(&self, id: i64) -> Result<LiveQuery<Option<Service>>> {
        self.db.observe(id).await
    }

    /// Vehicles whose latest service has come due on `on`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn services_due(&self, on: NaiveDate) -> Result<Vec<(Vehicle, Service)>> {
        self.db.services_due(on).await
    }

    /// Save a new service record in the background.
    pub fn add_new_service(&self, service: Service) {
        let db = self.db.clone();
        self.scope.launch(async move { db.insert(service).await });
    }

    /// Overwrite service `id` in the background.
    ///
    /// Returns whether the write was accepted.
    pub fn update_service(&self, id: i64, mut service: Service) -> bool {
        service.id = Some(id);
        let db = self.db.clone();
        self.scope.launch(async move { db.update(service).await })
    }

    /// Delete a service record in the background.
    pub fn delete_service(&self, service: &Service) {
        let Some(id) = service.id else {
            return;
        };
        let db = self.db.clone();
        self.scope
            .launch(async move { db.delete::<Service>(id).await });
    }

    /// Wait for launched writes to finish.
    pub async fn settle(&self) {
        self.scope.settle().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::{date, sample_service, sample_vehicle};

    #[tokio::test]
    async fn test_history_follows_writes() {
        let db = Database::open_in_memory().unwrap();
        let vehicle_id = db.insert(sample_vehicle("KCA 001A")).await.unwrap();
        let vm = ServicesViewModel::new(db);

        vm.add_new_service(sample_service(vehicle_id, date(2024, 1, 1)));
        vm.add_new_service(sample_service(vehicle_id, date(2024, 4, 1)));
        vm.settle().await;

        let history = vm.services_for_vehicle(vehicle_id).await.unwrap().get();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].service_date, date(2024, 4, 1));

        vm.delete_service(&history[0]);
        vm.settle().await;
        let history = vm.services_for_vehicle(vehicle_id).await.unwrap().get();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_insert_is_swallowed() {
        let db = Database::open_in_memory().unwrap();
        let vm = ServicesViewModel::new(db.clone());

        // No such vehicle: the write fails in the background.
        vm.add_new_service(sample_service(99, date(2024, 1, 1)));
        vm.settle().await;

        assert_eq!(db.stats().await.unwrap().services, 0);
    }

    #[tokio::test]
    async fn test_update_service() {
        let db = Database::open_in_memory().unwrap();
        let vehicle_id = db.insert(sample_vehicle("KCA 001A")).await.unwrap();
        let id = db
            .insert(sample_service(vehicle_id, date(2024, 1, 1)))
            .await
            .unwrap();
        let vm = ServicesViewModel::new(db);

        let mut service = sample_service(vehicle_id, date(2024, 1, 1));
        service.total_cost = 12_000;
        assert!(vm.update_service(id, service));
        vm.settle().await;

        let stored = vm.retrieve_service(id).await.unwrap().get().unwrap();
        assert_eq!(stored.total_cost, 12_000);
    }
}
