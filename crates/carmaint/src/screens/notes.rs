use crate::db::Database;
use crate::error::Result;
use crate::models::Note;
use crate::validation::NoteForm;
use crate::viewmodels::NotesViewModel;

use super::Outcome;

const SAVED: &str = "Note saved successfully";
const UPDATED: &str = "Note updated successfully";
const DELETED: &str = "Note deleted";
const UPDATE_FAILED: &str = "Note could not be updated";
const CONFIRM_DELETE: &str = "Are you sure you want to delete the note?";

/// Add, edit and delete notes.
#[derive(Debug)]
pub struct NoteScreens {
    db: Database,
    vm: NotesViewModel,
}

impl NoteScreens {
    /// Screens writing to `db`.
    #[must_use]
    pub fn new(db: Database) -> Self {
        let vm = NotesViewModel::new(db.clone());
        Self { db, vm }
    }

    /// The view model behind these screens.
    #[must_use]
    pub fn view_model(&self) -> &NotesViewModel {
        &self.vm
    }

    /// Add a note.
    pub async fn add(&self, form: &NoteForm) -> Outcome {
        match form.validate() {
            Ok(note) => {
                self.vm.add_new_note(note);
                self.vm.settle().await;
                Outcome::done(SAVED)
            }
            Err(errors) => Outcome::Invalid(errors),
        }
    }

    /// Edit note `id`, overlaying the changed fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the note does
    /// not exist.
    pub async fn edit<F>(&self, id: i64, edit: F) -> Result<Outcome>
    where
        F: FnOnce(&mut NoteForm),
    {
        let current: Note = self.db.require(id).await?;
        let mut form = NoteForm::from(&current);
        edit(&mut form);

        let note = match form.validate() {
            Ok(note) => note,
            Err(errors) => return Ok(Outcome::Invalid(errors)),
        };
        let accepted = self.vm.update_note(id, note);
        self.vm.settle().await;
        Ok(if accepted {
            Outcome::done(UPDATED)
        } else {
            Outcome::Failed(UPDATE_FAILED.to_string())
        })
    }

    /// Delete note `id` once `confirmed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the note does
    /// not exist.
    pub async fn delete(&self, id: i64, confirmed: bool) -> Result<Outcome> {
        let note: Note = self.db.require(id).await?;
        if !confirmed {
            return Ok(Outcome::confirm(CONFIRM_DELETE));
        }
        self.vm.delete_note(&note);
        self.vm.settle().await;
        Ok(Outcome::done(DELETED))
    }
}
