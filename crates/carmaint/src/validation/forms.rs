use chrono::NaiveDate;

use crate::models::{Note, Reminder, Service, Vehicle};
use crate::storage::DATE_FORMAT;

use super::{optional_text, Checker, FieldErrors, FormRules, BLANK_FIELD, PAST_DATE};

/// Vehicle registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleForm {
    /// Body type.
    pub vehicle_type: String,
    /// Manufacturer.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// Model year, as typed.
    pub model_year: String,
    /// License plate.
    pub license_plate: String,
    /// Fuel type.
    pub fuel_type: String,
    /// Odometer reading, as typed.
    pub mileage: String,
    /// Optional.
    pub image_uri: String,
}

impl VehicleForm {
    /// Build the vehicle, or report every invalid field.
    ///
    /// # Errors
    ///
    /// Returns the inline errors if any required field is blank or a numeric
    /// field is not a whole number.
    pub fn validate(&self) -> Result<Vehicle, FieldErrors> {
        let rules = FormRules::default();
        let mut check = Checker::new(&rules);

        let vehicle = Vehicle {
            id: None,
            vehicle_type: check.text("vehicle_type", &self.vehicle_type),
            manufacturer: check.text("manufacturer", &self.manufacturer),
            model: check.text("model", &self.model),
            model_year: check.integer("model_year", &self.model_year),
            license_plate: check.text("license_plate", &self.license_plate),
            fuel_type: check.text("fuel_type", &self.fuel_type),
            mileage: check.integer("mileage", &self.mileage),
            image_uri: optional_text(&self.image_uri),
        };
        check.finish(vehicle)
    }
}

impl From<&Vehicle> for VehicleForm {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_type: vehicle.vehicle_type.clone(),
            manufacturer: vehicle.manufacturer.clone(),
            model: vehicle.model.clone(),
            model_year: vehicle.model_year.to_string(),
            license_plate: vehicle.license_plate.clone(),
            fuel_type: vehicle.fuel_type.clone(),
            mileage: vehicle.mileage.to_string(),
            image_uri: vehicle.image_uri.clone().unwrap_or_default(),
        }
    }
}

/// Service record form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceForm {
    /// One entry per item of work; blank entries are ignored.
    pub services_done: Vec<String>,
    /// Date of the service.
    pub service_date: String,
    /// Odometer reading at the service.
    pub current_mileage: String,
    /// Mileage at which the next service is due.
    pub next_service_mileage: String,
    /// Date by which the next service is due.
    pub next_service_date: String,
    /// Total cost, as typed.
    pub total_cost: String,
    /// Optional.
    pub notes: String,
    /// Optional.
    pub receipt_image_uri: String,
}

impl ServiceForm {
    /// Build the service record for `vehicle_id`, or report every invalid field.
    ///
    /// # Errors
    ///
    /// Returns the inline errors if no work is listed, a required field is
    /// blank, a numeric field is not a whole number, or a date is unreadable.
    pub fn validate(&self, vehicle_id: i64, rules: &FormRules) -> Result<Service, FieldErrors> {
        let mut check = Checker::new(rules);

        let services_done: Vec<String> = self
            .services_done
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if services_done.is_empty() {
            check.fail("services_done", BLANK_FIELD);
        }

        let service = Service {
            id: None,
            vehicle_id,
            services_done,
            service_date: check.date("service_date", &self.service_date),
            current_mileage: check.integer("current_mileage", &self.current_mileage),
            next_service_mileage: check.integer("next_service_mileage", &self.next_service_mileage),
            next_service_date: check.date("next_service_date", &self.next_service_date),
            total_cost: check.integer("total_cost", &self.total_cost),
            notes: self.notes.trim().to_string(),
            receipt_image_uri: optional_text(&self.receipt_image_uri),
        };
        check.finish(service)
    }
}

impl From<&Service> for ServiceForm {
    fn from(service: &Service) -> Self {
        Self {
            services_done: service.services_done.clone(),
            service_date: service.service_date.format(DATE_FORMAT).to_string(),
            current_mileage: service.current_mileage.to_string(),
            next_service_mileage: service.next_service_mileage.to_string(),
            next_service_date: service.next_service_date.format(DATE_FORMAT).to_string(),
            total_cost: service.total_cost.to_string(),
            notes: service.notes.clone(),
            receipt_image_uri: service.receipt_image_uri.clone().unwrap_or_default(),
        }
    }
}

/// Reminder form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderForm {
    /// What to be reminded of.
    pub reminder_text: String,
    /// Blank means today.
    pub reminder_date: String,
    /// Optional.
    pub additional_text: String,
}

impl ReminderForm {
    /// Build the reminder, or report every invalid field.
    ///
    /// # Errors
    ///
    /// Returns the inline errors if the text is blank, the date is unreadable,
    /// or the date is in the past and past dates are not allowed.
    pub fn validate(&self, rules: &FormRules) -> Result<Reminder, FieldErrors> {
        self.check(rules, None)
    }

    /// Like [`validate`](Self::validate) for an edit of a reminder dated
    /// `stored_date`. Keeping that date is allowed even once it has passed.
    ///
    /// # Errors
    ///
    /// Returns the inline errors if the text is blank, the date is unreadable,
    /// or a newly picked date is in the past and past dates are not allowed.
    pub fn validate_update(
        &self,
        rules: &FormRules,
        stored_date: NaiveDate,
    ) -> Result<Reminder, FieldErrors> {
        self.check(rules, Some(stored_date))
    }

    fn check(
        &self,
        rules: &FormRules,
        stored_date: Option<NaiveDate>,
    ) -> Result<Reminder, FieldErrors> {
        let mut check = Checker::new(rules);

        let reminder_text = check.text("reminder_text", &self.reminder_text);
        let reminder_date = if self.reminder_date.trim().is_empty() {
            check.rules().today
        } else {
            check.date("reminder_date", &self.reminder_date)
        };
        let kept = stored_date == Some(reminder_date);
        let past = reminder_date < check.rules().today;
        if past && !kept && !check.rules().allow_past_reminders {
            check.fail("reminder_date", PAST_DATE);
        }

        check.finish(Reminder {
            id: None,
            reminder_text,
            reminder_date,
            additional_text: self.additional_text.trim().to_string(),
        })
    }
}

impl From<&Reminder> for ReminderForm {
    fn from(reminder: &Reminder) -> Self {
        Self {
            reminder_text: reminder.reminder_text.clone(),
            reminder_date: reminder.reminder_date.format(DATE_FORMAT).to_string(),
            additional_text: reminder.additional_text.clone(),
        }
    }
}

/// Note form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    /// Title.
    pub title: String,
    /// Body text.
    pub body: String,
}

impl NoteForm {
    /// Build the note, or report every invalid field.
    ///
    /// # Errors
    ///
    /// Returns the inline errors if the title or body is blank.
    pub fn validate(&self) -> Result<Note, FieldErrors> {
        let rules = FormRules::default();
        let mut check = Checker::new(&rules);

        let note = Note {
            id: None,
            title: check.text("title", &self.title),
            body: check.text("body", &self.body),
        };
        check.finish(note)
    }
}

impl From<&Note> for NoteForm {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            body: note.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::NOT_A_NUMBER;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rules() -> FormRules {
        FormRules::default().on(date(2024, 6, 1))
    }

    fn vehicle_form() -> VehicleForm {
        VehicleForm {
            vehicle_type: "Sedan".to_string(),
            manufacturer: " Toyota ".to_string(),
            model: "Corolla".to_string(),
            model_year: "2015".to_string(),
            license_plate: "KCA 123A".to_string(),
            fuel_type: "Petrol".to_string(),
            mileage: "120000".to_string(),
            image_uri: String::new(),
        }
    }

    fn service_form() -> ServiceForm {
        ServiceForm {
            services_done: vec!["Oil change".to_string(), "  ".to_string()],
            service_date: "2024-05-20".to_string(),
            current_mileage: "50000".to_string(),
            next_service_mileage: "55000".to_string(),
            next_service_date: "20 Nov 2024".to_string(),
            total_cost: "8500".to_string(),
            notes: String::new(),
            receipt_image_uri: "/receipts/may.jpg".to_string(),
        }
    }

    #[test]
    fn test_vehicle_form_valid() {
        let vehicle = vehicle_form().validate().unwrap();
        assert_eq!(vehicle.manufacturer, "Toyota");
        assert_eq!(vehicle.model_year, 2015);
        assert_eq!(vehicle.mileage, 120_000);
        assert_eq!(vehicle.image_uri, None);
        assert_eq!(vehicle.id, None);
    }

    #[test]
    fn test_vehicle_form_reports_every_invalid_field() {
        let form = VehicleForm {
            manufacturer: "  ".to_string(),
            fuel_type: String::new(),
            mileage: "12k".to_string(),
            ..vehicle_form()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("manufacturer"), Some(BLANK_FIELD));
        assert_eq!(errors.get("fuel_type"), Some(BLANK_FIELD));
        assert_eq!(errors.get("mileage"), Some(NOT_A_NUMBER));
    }

    #[test]
    fn test_vehicle_form_binds_existing_vehicle() {
        let mut vehicle = vehicle_form().validate().unwrap();
        vehicle.image_uri = Some("/photos/car.jpg".to_string());

        let form = VehicleForm::from(&vehicle);
        assert_eq!(form.mileage, "120000");
        assert_eq!(form.image_uri, "/photos/car.jpg");
        assert_eq!(form.validate().unwrap(), vehicle);
    }

    #[test]
    fn test_service_form_valid() {
        let service = service_form().validate(7, &rules()).unwrap();
        assert_eq!(service.vehicle_id, 7);
        assert_eq!(service.services_done, vec!["Oil change".to_string()]);
        assert_eq!(service.service_date, date(2024, 5, 20));
        assert_eq!(service.next_service_date, date(2024, 11, 20));
        assert_eq!(service.total_cost, 8_500);
        assert_eq!(
            service.receipt_image_uri.as_deref(),
            Some("/receipts/may.jpg")
        );
    }

    #[test]
    fn test_service_form_requires_work_done() {
        let form = ServiceForm {
            services_done: vec![" ".to_string()],
            ..service_form()
        };
        let errors = form.validate(1, &rules()).unwrap_err();
        assert_eq!(errors.get("services_done"), Some(BLANK_FIELD));
    }

    #[test]
    fn test_service_form_bad_numbers_and_dates() {
        let form = ServiceForm {
            total_cost: "85.50".to_string(),
            next_service_date: "soon".to_string(),
            ..service_form()
        };
        let errors = form.validate(1, &rules()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("total_cost"), Some(NOT_A_NUMBER));
        assert!(errors.get("next_service_date").is_some());
    }

    #[test]
    fn test_service_form_binding_round_trip() {
        let service = service_form().validate(3, &rules()).unwrap();
        let form = ServiceForm::from(&service);
        assert_eq!(form.validate(3, &rules()).unwrap(), service);
    }

    #[test]
    fn test_reminder_defaults_to_today() {
        let form = ReminderForm {
            reminder_text: "Renew insurance".to_string(),
            ..ReminderForm::default()
        };
        let reminder = form.validate(&rules()).unwrap();
        assert_eq!(reminder.reminder_date, date(2024, 6, 1));
    }

    #[test]
    fn test_reminder_rejects_past_date() {
        let form = ReminderForm {
            reminder_text: "Renew insurance".to_string(),
            reminder_date: "2024-05-31".to_string(),
            additional_text: String::new(),
        };
        let errors = form.validate(&rules()).unwrap_err();
        assert_eq!(errors.get("reminder_date"), Some(PAST_DATE));

        let lenient = FormRules {
            allow_past_reminders: true,
            ..rules()
        };
        assert!(form.validate(&lenient).is_ok());
    }

    #[test]
    fn test_reminder_update_keeps_passed_date() {
        let form = ReminderForm {
            reminder_text: "Insurance renewed".to_string(),
            reminder_date: "2024-05-31".to_string(),
            additional_text: String::new(),
        };
        let reminder = form
            .validate_update(&rules(), date(2024, 5, 31))
            .unwrap();
        assert_eq!(reminder.reminder_date, date(2024, 5, 31));

        // Moving it to another past date is still rejected.
        let errors = form
            .validate_update(&rules(), date(2024, 5, 1))
            .unwrap_err();
        assert_eq!(errors.get("reminder_date"), Some(PAST_DATE));
    }

    #[test]
    fn test_reminder_requires_text() {
        let form = ReminderForm {
            reminder_text: "\t".to_string(),
            reminder_date: "2024-07-01".to_string(),
            additional_text: "bring logbook".to_string(),
        };
        let errors = form.validate(&rules()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("reminder_text"), Some(BLANK_FIELD));
    }

    #[test]
    fn test_note_form() {
        let note = NoteForm {
            title: "Tyres".to_string(),
            body: "Rotate every 10,000 km".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(note.title, "Tyres");

        let errors = NoteForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
