use crate::db::Database;
use crate::error::Result;
use crate::models::Note;
use crate::observe::LiveQuery;
use crate::scope::TaskScope;

/// View model for the notes screens.
#[derive(Debug)]
pub struct NotesViewModel {
    db: Database,
    scope: TaskScope,
}

impl NotesViewModel {
    /// Create a view model with its own task scope.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            db,
            scope: TaskScope::new("notes"),
        }
    }

    /// Every note, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn all_notes(&self) -> Result<LiveQuery<Vec<Note>>> {
        self.db.observe_all().await
    }

    /// One note by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn retrieve_note(&self, id: i64) -> Result<LiveQuery<Option<Note>>> {
        self.db.observe(id).await
    }

    /// Save a new note in the background.
    pub fn add_new_note(&self, note: Note) {
        let db = self.db.clone();
        self.scope.launch(async move { db.insert(note).await });
    }

    /// Overwrite note `id` in the background.
    ///
    /// Returns whether the write was accepted.
    pub fn update_note(&self, id: i64, mut note: Note) -> bool {
        note.id = Some(id);
        let db = self.db.clone();
        self.scope.launch(async move { db.update(note).await })
    }

    /// Delete a note in the background.
    pub fn delete_note(&self, note: &Note) {
        let Some(id) = note.id else {
            return;
        };
        let db = self.db.clone();
        self.scope.launch(async move { db.delete::<Note>(id).await });
    }

    /// Wait for launched writes to finish.
    pub async fn settle(&self) {
        self.scope.settle().await;
    }
}
