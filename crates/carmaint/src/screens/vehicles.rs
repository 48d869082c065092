use crate::db::Database;
use crate::error::Result;
use crate::models::Vehicle;
use crate::validation::VehicleForm;
use crate::viewmodels::VehiclesViewModel;

use super::Outcome;

const SAVED: &str = "Vehicle saved successfully";
const UPDATED: &str = "Vehicle updated successfully";
const DELETED: &str = "Vehicle deleted";
const UPDATE_FAILED: &str = "Vehicle could not be updated";
const CONFIRM_DELETE: &str = "Are you sure you want to delete the vehicle and its service history?";

/// Register, edit and delete vehicles.
#[derive(Debug)]
pub struct VehicleScreens {
    db: Database,
    vm: VehiclesViewModel,
}

impl VehicleScreens {
    /// Screens writing to `db`.
    #[must_use]
    pub fn new(db: Database) -> Self {
        let vm = VehiclesViewModel::new(db.clone());
        Self { db, vm }
    }

    /// The view model behind these screens.
    #[must_use]
    pub fn view_model(&self) -> &VehiclesViewModel {
        &self.vm
    }

    /// Register a new vehicle.
    pub async fn register(&self, form: &VehicleForm) -> Outcome {
        let vehicle = match form.validate() {
            Ok(vehicle) => vehicle,
            Err(errors) => return Outcome::Invalid(errors),
        };
        self.vm.add_new_vehicle(vehicle);
        self.vm.settle().await;
        Outcome::done(SAVED)
    }

    /// Edit vehicle `id`: the stored values are bound to a form, `edit`
    /// overwrites the fields the user changed, and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the vehicle does
    /// not exist.
    pub async fn edit<F>(&self, id: i64, edit: F) -> Result<Outcome>
    where
        F: FnOnce(&mut VehicleForm),
    {
        let current: Vehicle = self.db.require(id).await?;
        let mut form = VehicleForm::from(&current);
        edit(&mut form);

        let vehicle = match form.validate() {
            Ok(vehicle) => vehicle,
            Err(errors) => return Ok(Outcome::Invalid(errors)),
        };
        let accepted = self.vm.update_vehicle(id, vehicle);
        self.vm.settle().await;
        Ok(if accepted {
            Outcome::done(UPDATED)
        } else {
            Outcome::Failed(UPDATE_FAILED.to_string())
        })
    }

    /// Delete vehicle `id` once `confirmed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the vehicle does
    /// not exist.
    pub async fn delete(&self, id: i64, confirmed: bool) -> Result<Outcome> {
        let vehicle: Vehicle = self.db.require(id).await?;
        if !confirmed {
            return Ok(Outcome::confirm(CONFIRM_DELETE));
        }
        self.vm.delete_vehicle(&vehicle);
        self.vm.settle().await;
        Ok(Outcome::done(DELETED))
    }
}
