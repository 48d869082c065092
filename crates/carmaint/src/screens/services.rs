use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Service, Vehicle};
use crate::storage::Record;
use crate::validation::{FormRules, ServiceForm};
use crate::viewmodels::ServicesViewModel;

use super::Outcome;

const SAVED: &str = "Service saved successfully";
const UPDATED: &str = "Service updated successfully";
const DELETED: &str = "Service deleted";
const UPDATE_FAILED: &str = "Service could not be updated";
const CONFIRM_DELETE: &str = "Are you sure you want to delete the service record?";

/// Record, edit and delete services for a vehicle.
#[derive(Debug)]
pub struct ServiceScreens {
    db: Database,
    vm: ServicesViewModel,
    rules: FormRules,
}

impl ServiceScreens {
    /// Screens writing to `db`, reading dates by `rules`.
    #[must_use]
    pub fn new(db: Database, rules: FormRules) -> Self {
        let vm = ServicesViewModel::new(db.clone());
        Self { db, vm, rules }
    }

    /// The view model behind these screens.
    #[must_use]
    pub fn view_model(&self) -> &ServicesViewModel {
        &self.vm
    }

    /// Record a service for `vehicle_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the vehicle does not exist.
    pub async fn add(&self, vehicle_id: i64, form: &ServiceForm) -> Result<Outcome> {
        self.db.require::<Vehicle>(vehicle_id).await?;
        let service = match form.validate(vehicle_id, &self.rules) {
            Ok(service) => service,
            Err(errors) => return Ok(Outcome::Invalid(errors)),
        };
        self.vm.add_new_service(service);
        self.vm.settle().await;
        Ok(Outcome::done(SAVED))
    }

    /// Edit service `id` of `vehicle_id`, overlaying the changed fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the service does not exist or belongs to
    /// another vehicle.
    pub async fn edit<F>(&self, vehicle_id: i64, id: i64, edit: F) -> Result<Outcome>
    where
        F: FnOnce(&mut ServiceForm),
    {
        let current: Service = self.db.require(id).await?;
        if current.vehicle_id != vehicle_id {
            return Err(Error::not_found(Service::KIND, id));
        }
        let mut form = ServiceForm::from(&current);
        edit(&mut form);

        let service = match form.validate(vehicle_id, &self.rules) {
            Ok(service) => service,
            Err(errors) => return Ok(Outcome::Invalid(errors)),
        };
        let accepted = self.vm.update_service(id, service);
        self.vm.settle().await;
        Ok(if accepted {
            Outcome::done(UPDATED)
        } else {
            Outcome::Failed(UPDATE_FAILED.to_string())
        })
    }

    /// Delete service `id` once `confirmed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the service does not exist.
    pub async fn delete(&self, id: i64, confirmed: bool) -> Result<Outcome> {
        let service: Service = self.db.require(id).await?;
        if !confirmed {
            return Ok(Outcome::confirm(CONFIRM_DELETE));
        }
        self.vm.delete_service(&service);
        self.vm.settle().await;
        Ok(Outcome::done(DELETED))
    }
}
