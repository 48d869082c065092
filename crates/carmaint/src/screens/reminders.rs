use crate::db::Database;
use crate::error::Result;
use crate::models::Reminder;
use crate::validation::{FormRules, ReminderForm};
use crate::viewmodels::RemindersViewModel;

use super::Outcome;

const SAVED: &str = "Reminder saved successfully";
const UPDATED: &str = "Reminder updated successfully";
const DELETED: &str = "Reminder deleted";
const SAVE_FAILED: &str = "Reminder could not be saved";
const UPDATE_FAILED: &str = "Reminder could not be updated";
const CONFIRM_DELETE: &str = "Are you sure you want to delete the reminder?";

/// Add, edit and delete reminders.
#[derive(Debug)]
pub struct ReminderScreens {
    db: Database,
    vm: RemindersViewModel,
    rules: FormRules,
}

impl ReminderScreens {
    /// Screens writing to `db`, reading dates by `rules`.
    #[must_use]
    pub fn new(db: Database, rules: FormRules) -> Self {
        let vm = RemindersViewModel::new(db.clone());
        Self { db, vm, rules }
    }

    /// The view model behind these screens.
    #[must_use]
    pub fn view_model(&self) -> &RemindersViewModel {
        &self.vm
    }

    /// Add a reminder.
    pub async fn add(&self, form: &ReminderForm) -> Outcome {
        let reminder = match form.validate(&self.rules) {
            Ok(reminder) => reminder,
            Err(errors) => return Outcome::Invalid(errors),
        };
        let accepted = self.vm.add_new_reminder(reminder);
        self.vm.settle().await;
        if accepted {
            Outcome::done(SAVED)
        } else {
            Outcome::Failed(SAVE_FAILED.to_string())
        }
    }

    /// Edit reminder `id`, overlaying the changed fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the reminder
    /// does not exist.
    pub async fn edit<F>(&self, id: i64, edit: F) -> Result<Outcome>
    where
        F: FnOnce(&mut ReminderForm),
    {
        let current: Reminder = self.db.require(id).await?;
        let mut form = ReminderForm::from(&current);
        edit(&mut form);

        let reminder = match form.validate_update(&self.rules, current.reminder_date) {
            Ok(reminder) => reminder,
            Err(errors) => return Ok(Outcome::Invalid(errors)),
        };
        let accepted = self.vm.update_reminder(id, reminder);
        self.vm.settle().await;
        Ok(if accepted {
            Outcome::done(UPDATED)
        } else {
            Outcome::Failed(UPDATE_FAILED.to_string())
        })
    }

    /// Delete reminder `id` once `confirmed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the reminder
    /// does not exist.
    pub async fn delete(&self, id: i64, confirmed: bool) -> Result<Outcome> {
        let reminder: Reminder = self.db.require(id).await?;
        if !confirmed {
            return Ok(Outcome::confirm(CONFIRM_DELETE));
        }
        self.vm.delete_reminder(&reminder);
        self.vm.settle().await;
        Ok(Outcome::done(DELETED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::date;
    use crate::validation::PAST_DATE;

    fn rules() -> FormRules {
        FormRules::default().on(date(2024, 3, 1))
    }

    fn form(on: &str) -> ReminderForm {
        ReminderForm {
            reminder_text: "Renew insurance".to_string(),
            reminder_date: on.to_string(),
            additional_text: String::new(),
        }
    }

    #[tokio::test]
    async fn test_add_reminder() {
        let db = Database::open_in_memory().unwrap();
        let screens = ReminderScreens::new(db.clone(), rules());

        assert_eq!(screens.add(&form("2024-04-01")).await, Outcome::done(SAVED));
        assert_eq!(db.stats().await.unwrap().reminders, 1);
    }

    #[tokio::test]
    async fn test_past_date_rejected() {
        let db = Database::open_in_memory().unwrap();
        let screens = ReminderScreens::new(db.clone(), rules());

        let Outcome::Invalid(errors) = screens.add(&form("2024-02-01")).await else {
            panic!("expected inline errors");
        };
        assert_eq!(errors.get("reminder_date"), Some(PAST_DATE));
        assert_eq!(db.stats().await.unwrap().reminders, 0);
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let screens = ReminderScreens::new(db.clone(), rules());
        screens.add(&form("2024-04-01")).await;
        let id = screens.view_model().all_reminders().await.unwrap().get()[0]
            .id
            .unwrap();

        let outcome = screens
            .edit(id, |form| form.additional_text = "Call the broker".to_string())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::done(UPDATED));
        let stored: Reminder = db.get(id).await.unwrap().unwrap();
        assert_eq!(stored.additional_text, "Call the broker");
        assert_eq!(stored.reminder_date, date(2024, 4, 1));

        assert_eq!(
            screens.delete(id, false).await.unwrap(),
            Outcome::confirm(CONFIRM_DELETE)
        );
        assert_eq!(screens.delete(id, true).await.unwrap(), Outcome::done(DELETED));
        assert_eq!(db.stats().await.unwrap().reminders, 0);
    }

    #[tokio::test]
    async fn test_edit_text_of_passed_reminder() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .insert(Reminder {
                id: None,
                reminder_text: "Renew insurance".to_string(),
                reminder_date: date(2024, 2, 1),
                additional_text: String::new(),
            })
            .await
            .unwrap();
        let screens = ReminderScreens::new(db.clone(), rules());

        let outcome = screens
            .edit(id, |form| form.reminder_text = "Insurance renewed".to_string())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::done(UPDATED));
        let stored: Reminder = db.get(id).await.unwrap().unwrap();
        assert_eq!(stored.reminder_text, "Insurance renewed");
        assert_eq!(stored.reminder_date, date(2024, 2, 1));

        let outcome = screens
            .edit(id, |form| form.reminder_date = "2024-02-15".to_string())
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Invalid(_)));
    }

    #[tokio::test]
    async fn test_edit_missing() {
        let db = Database::open_in_memory().unwrap();
        let screens = ReminderScreens::new(db, rules());
        assert!(screens.edit(1, |_| {}).await.unwrap_err().is_not_found());
    }
}
