//! List adapters.
//!
//! A [`ListAdapter`] holds the list currently on screen. Submitting a new list
//! computes the minimal set of row changes between the two, so a display can
//! update only the rows that moved or changed.

mod binders;
mod diff;

pub use binders::{
    format_cost, format_distance, NoteBinder, ReminderBinder, ServiceBinder, VehicleBinder,
};
pub use diff::{diff, ListChange};

use crate::storage::Record;

/// Maps a list item to the cells of one display row.
pub trait RowBinder<T> {
    /// Column titles, one per cell.
    fn headers(&self) -> &'static [&'static str];

    /// The cells for `item`, in header order.
    fn bind(&self, item: &T) -> Vec<String>;
}

/// The list currently displayed, and how to render each row.
#[derive(Debug)]
pub struct ListAdapter<T, B> {
    items: Vec<T>,
    binder: B,
}

impl<T, B> ListAdapter<T, B>
where
    T: Record,
    B: RowBinder<T>,
{
    /// An empty adapter.
    #[must_use]
    pub fn new(binder: B) -> Self {
        Self {
            items: Vec::new(),
            binder,
        }
    }

    /// Replace the current list, returning what changed.
    pub fn submit_list(&mut self, items: Vec<T>) -> Vec<ListChange> {
        let changes = diff(&self.items, &items);
        self.items = items;
        changes
    }

    /// The current list.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Column titles.
    #[must_use]
    pub fn headers(&self) -> &'static [&'static str] {
        self.binder.headers()
    }

    /// The cells of the row at `position`.
    #[must_use]
    pub fn row(&self, position: usize) -> Option<Vec<String>> {
        self.items.get(position).map(|item| self.binder.bind(item))
    }

    /// Every row, in list order.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.items.iter().map(|item| self.binder.bind(item)).collect()
    }
}

/// Lay out `rows` under `headers` in aligned columns.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pad_row(headers.iter().copied(), &widths));
    lines.push(pad_row(rule.iter().map(String::as_str), &widths));
    for row in rows {
        lines.push(pad_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Note;

    fn note(id: i64, title: &str) -> Note {
        Note {
            id: Some(id),
            title: title.to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn test_first_submit_inserts_everything() {
        let mut adapter = ListAdapter::new(NoteBinder);
        let changes = adapter.submit_list(vec![note(1, "a"), note(2, "b")]);

        assert_eq!(
            changes,
            vec![
                ListChange::Inserted { position: 0 },
                ListChange::Inserted { position: 1 }
            ]
        );
        assert_eq!(adapter.len(), 2);
    }

    #[test]
    fn test_resubmit_same_list_is_quiet() {
        let mut adapter = ListAdapter::new(NoteBinder);
        adapter.submit_list(vec![note(1, "a")]);
        assert!(adapter.submit_list(vec![note(1, "a")]).is_empty());
    }

    #[test]
    fn test_rows_follow_binder() {
        let mut adapter = ListAdapter::new(NoteBinder);
        adapter.submit_list(vec![note(7, "Tyres")]);

        assert_eq!(adapter.headers(), &["ID", "TITLE", "NOTE"]);
        assert_eq!(adapter.row(0).unwrap()[..2], ["7".to_string(), "Tyres".to_string()]);
        assert!(adapter.row(1).is_none());
        assert_eq!(adapter.rows().len(), 1);
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            vec!["1".to_string(), "Toyota".to_string()],
            vec!["12".to_string(), "VW".to_string()],
        ];
        let table = render_table(&["ID", "MAKE"], &rows);
        assert_eq!(table, "ID  MAKE\n--  ------\n1   Toyota\n12  VW");
    }
}
