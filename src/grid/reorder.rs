//! Drag reordering of the base collection.
//!
//! Reordering is keyed entirely by stable record ids: the grabbed row and
//! the row it is dropped over are both looked up in the full collection's
//! current order, and the element is moved (not swapped) so everything
//! between the two positions shifts by one. A stale id makes the whole
//! operation a no-op.

use super::schema::GridRecord;

/// Move the record with `active_id` to the position of `over_id`.
///
/// Returns `true` when the collection changed. Identical ids and ids not
/// present in the collection leave it untouched.
pub fn move_by_id<R: GridRecord>(records: &mut Vec<R>, active_id: &str, over_id: &str) -> bool {
    if active_id == over_id {
        return false;
    }
    let Some(old_index) = records.iter().position(|r| r.id() == active_id) else {
        return false;
    };
    let Some(new_index) = records.iter().position(|r| r.id() == over_id) else {
        return false;
    };

    let moved = records.remove(old_index);
    records.insert(new_index, moved);
    true
}

/// Id of the row adjacent to `id` in the base collection, used by the
/// keyboard grab mode to step one position at a time.
pub fn neighbor_id<R: GridRecord>(records: &[R], id: &str, forward: bool) -> Option<String> {
    let index = records.iter().position(|r| r.id() == id)?;
    let target = if forward {
        index.checked_add(1).filter(|&i| i < records.len())?
    } else {
        index.checked_sub(1)?
    };
    Some(records[target].id().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::schema::GridRecord;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item(String);

    impl GridRecord for Item {
        fn id(&self) -> &str {
            &self.0
        }

        fn search_text(&self) -> String {
            self.0.clone()
        }
    }

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|s| Item(s.to_string())).collect()
    }

    fn ids(records: &[Item]) -> Vec<&str> {
        records.iter().map(|r| r.0.as_str()).collect()
    }

    #[test]
    fn test_move_forward_shifts_between() {
        let mut records = items(&["a", "b", "c", "d", "e"]);
        assert!(move_by_id(&mut records, "b", "d"));
        assert_eq!(ids(&records), vec!["a", "c", "d", "b", "e"]);
    }

    #[test]
    fn test_move_backward_shifts_between() {
        let mut records = items(&["a", "b", "c", "d", "e"]);
        assert!(move_by_id(&mut records, "d", "b"));
        assert_eq!(ids(&records), vec!["a", "d", "b", "c", "e"]);
    }

    #[test]
    fn test_move_to_ends() {
        let mut records = items(&["a", "b", "c"]);
        assert!(move_by_id(&mut records, "a", "c"));
        assert_eq!(ids(&records), vec!["b", "c", "a"]);

        let mut records = items(&["a", "b", "c"]);
        assert!(move_by_id(&mut records, "c", "a"));
        assert_eq!(ids(&records), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_move_preserves_id_multiset() {
        let mut records = items(&["a", "b", "c", "d", "e", "f"]);
        move_by_id(&mut records, "e", "b");
        let mut sorted = ids(&records);
        sorted.sort_unstable();
        assert_eq!(sorted, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(records.len(), 6);
    }

    #[test]
    fn test_same_id_is_noop() {
        let mut records = items(&["a", "b", "c"]);
        assert!(!move_by_id(&mut records, "b", "b"));
        assert_eq!(ids(&records), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_stale_ids_are_noop() {
        let mut records = items(&["a", "b", "c"]);
        assert!(!move_by_id(&mut records, "a", "ghost"));
        assert!(!move_by_id(&mut records, "ghost", "a"));
        assert_eq!(ids(&records), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_neighbor_id() {
        let records = items(&["a", "b", "c"]);
        assert_eq!(neighbor_id(&records, "b", true).as_deref(), Some("c"));
        assert_eq!(neighbor_id(&records, "b", false).as_deref(), Some("a"));
        assert_eq!(neighbor_id(&records, "c", true), None);
        assert_eq!(neighbor_id(&records, "a", false), None);
        assert_eq!(neighbor_id(&records, "ghost", true), None);
    }
}
