use crate::db::Database;
use crate::error::Result;
use crate::models::Vehicle;
use crate::observe::LiveQuery;
use crate::scope::TaskScope;

/// View model for the vehicle list, details and registration screens.
#[derive(Debug)]
pub struct VehiclesViewModel {
    db: Database,
    scope: TaskScope,
}

impl VehiclesViewModel {
    /// Create a view model with its own task scope.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            db,
            scope: TaskScope::new("vehicles"),
        }
    }

    /// Every registered vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn all_vehicles(&self) -> Result<LiveQuery<Vec<Vehicle>>> {
        self.db.observe_all().await
    }

    /// One vehicle by ID; the value becomes `None` if it is deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn retrieve_vehicle(&self, id: i64) -> Result<LiveQuery<Option<Vehicle>>> {
        self.db.observe(id).await
    }

    /// Save a new vehicle in the background.
    pub fn add_new_vehicle(&self, vehicle: Vehicle) {
        let db = self.db.clone();
        self.scope.launch(async move { db.insert(vehicle).await });
    }

    /// Overwrite vehicle `id` in the background.
    ///
    /// Returns whether the write was accepted.
    pub fn update_vehicle(&self, id: i64, mut vehicle: Vehicle) -> bool {
        vehicle.id = Some(id);
        let db = self.db.clone();
        self.scope.launch(async move { db.update(vehicle).await })
    }

    /// Delete a vehicle and its service history in the background.
    pub fn delete_vehicle(&self, vehicle: &Vehicle) {
        let Some(id) = vehicle.id else {
            return;
        };
        let db = self.db.clone();
        self.scope
            .launch(async move { db.delete::<Vehicle>(id).await });
    }

    /// Wait for launched writes to finish.
    pub async fn settle(&self) {
        self.scope.settle().await;
    }
}
