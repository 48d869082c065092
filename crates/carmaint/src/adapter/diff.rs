use std::collections::HashMap;

use crate::storage::Record;

/// One row-level difference between two lists.
///
/// `Removed` positions refer to the old list. `Inserted` and `Changed`
/// positions refer to the new list. `Moved` carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// An item of the old list is gone.
    Removed {
        /// Position in the old list.
        position: usize,
    },
    /// A new item appears.
    Inserted {
        /// Position in the new list.
        position: usize,
    },
    /// The same item sits at a different relative position.
    Moved {
        /// Position in the old list.
        from: usize,
        /// Position in the new list.
        to: usize,
    },
    /// The same item now has different contents.
    Changed {
        /// Position in the new list.
        position: usize,
    },
}

/// Compute the changes that turn `old` into `new`.
///
/// Items are the same when their IDs match, and unchanged when they compare
/// equal. Only items that break the longest run of retained items kept in
/// order are reported as moved. Items without an ID never match.
#[must_use]
pub fn diff<T: Record>(old: &[T], new: &[T]) -> Vec<ListChange> {
    let mut new_positions: HashMap<i64, usize> = HashMap::with_capacity(new.len());
    for (position, item) in new.iter().enumerate() {
        if let Some(id) = item.id() {
            new_positions.entry(id).or_insert(position);
        }
    }

    let mut claimed = vec![false; new.len()];
    let mut retained: Vec<(usize, usize)> = Vec::new();
    let mut changes = Vec::new();

    for (from, item) in old.iter().enumerate() {
        let target = item
            .id()
            .and_then(|id| new_positions.get(&id).copied())
            .filter(|&to| !claimed[to]);
        match target {
            Some(to) => {
                claimed[to] = true;
                retained.push((from, to));
            }
            None => changes.push(ListChange::Removed { position: from }),
        }
    }

    let targets: Vec<usize> = retained.iter().map(|&(_, to)| to).collect();
    let mut in_order = vec![false; retained.len()];
    for index in longest_increasing_subsequence(&targets) {
        in_order[index] = true;
    }
    for (&(from, to), stays) in retained.iter().zip(&in_order) {
        if !stays {
            changes.push(ListChange::Moved { from, to });
        }
    }

    for (position, taken) in claimed.iter().enumerate() {
        if !taken {
            changes.push(ListChange::Inserted { position });
        }
    }

    let mut updated: Vec<usize> = retained
        .iter()
        .filter(|&&(from, to)| old[from] != new[to])
        .map(|&(_, to)| to)
        .collect();
    updated.sort_unstable();
    changes.extend(
        updated
            .into_iter()
            .map(|position| ListChange::Changed { position }),
    );

    changes
}

/// Indices into `values` of one longest strictly increasing subsequence.
fn longest_increasing_subsequence(values: &[usize]) -> Vec<usize> {
    // tails[k] is the index of the smallest tail of any run of length k + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; values.len()];

    for (i, &value) in values.iter().enumerate() {
        let slot = tails.partition_point(|&t| values[t] < value);
        if slot > 0 {
            previous[i] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(i);
        } else {
            tails[slot] = i;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        run.push(i);
        cursor = previous[i];
    }
    run.reverse();
    run
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

    fn notes(ids: &[i64]) -> Vec<Note> {
        ids.iter().map(|&id| note(id, "n")).collect()
    }

    #[test]
    fn test_lis() {
        assert_eq!(longest_increasing_subsequence(&[]), Vec::<usize>::new());
        assert_eq!(longest_increasing_subsequence(&[0, 1, 2]), vec![0, 1, 2]);
        assert_eq!(longest_increasing_subsequence(&[2, 0, 1]), vec![1, 2]);
        assert_eq!(longest_increasing_subsequence(&[3, 1, 2, 0]).len(), 2);
    }

    #[test]
    fn test_remove_and_insert() {
        let changes = diff(&notes(&[1, 2, 3]), &notes(&[1, 3, 4]));
        assert_eq!(
            changes,
            vec![
                ListChange::Removed { position: 1 },
                ListChange::Inserted { position: 2 }
            ]
        );
    }

    #[test]
    fn test_single_move() {
        // Moving the last item to the front is one move, not two.
        let changes = diff(&notes(&[1, 2, 3]), &notes(&[3, 1, 2]));
        assert_eq!(changes, vec![ListChange::Moved { from: 2, to: 0 }]);
    }

    #[test]
    fn test_reverse_moves_all_but_one() {
        let changes = diff(&notes(&[1, 2, 3, 4]), &notes(&[4, 3, 2, 1]));
        let moves = changes
            .iter()
            .filter(|c| matches!(c, ListChange::Moved { .. }))
            .count();
        assert_eq!(moves, 3);
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn test_changed_contents() {
        let old = vec![note(1, "Oil"), note(2, "Tyres")];
        let new = vec![note(1, "Oil"), note(2, "Tyres and wipers")];
        assert_eq!(diff(&old, &new), vec![ListChange::Changed { position: 1 }]);
    }

    #[test]
    fn test_moved_and_changed() {
        let old = vec![note(1, "a"), note(2, "b")];
        let new = vec![note(2, "b2"), note(1, "a")];
        let changes = diff(&old, &new);

        assert!(changes.contains(&ListChange::Changed { position: 0 }));
        assert_eq!(
            changes
                .iter()
                .filter(|c| matches!(c, ListChange::Moved { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_items_without_id_never_match() {
        let mut unsaved = note(0, "draft");
        unsaved.id = None;
        let changes = diff(&[unsaved.clone()], &[unsaved]);
        assert_eq!(
            changes,
            vec![
                ListChange::Removed { position: 0 },
                ListChange::Inserted { position: 0 }
            ]
        );
    }

    #[test]
    fn test_empty_lists() {
        assert!(diff::<Note>(&[], &[]).is_empty());
        assert_eq!(
            diff(&notes(&[5]), &[]),
            vec![ListChange::Removed { position: 0 }]
        );
    }
}
