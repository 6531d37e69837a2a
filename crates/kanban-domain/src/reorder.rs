use kanban_core::{KanbanError, KanbanResult};

/// Drag-and-drop splice: remove the item at `from`, insert it at `to`.
///
/// `to` is an index into the list after removal, so both indices must be
/// inside the current list.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> KanbanResult<()> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(KanbanError::Validation(format!(
            "cannot move item {} to {} in a list of {}",
            from, to, len
        )));
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_down() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        move_item(&mut items, 0, 2).unwrap();
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
    }

    #[test]
    fn test_move_up() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        move_item(&mut items, 3, 0).unwrap();
        assert_eq!(items, vec!['d', 'a', 'b', 'c']);
    }

    #[test]
    fn test_same_index_is_noop() {
        let mut items = vec![1, 2, 3];
        move_item(&mut items, 1, 1).unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_out_of_range() {
        let mut items = vec![1, 2, 3];
        assert!(matches!(
            move_item(&mut items, 3, 0),
            Err(KanbanError::Validation(_))
        ));
        assert!(move_item(&mut items, 0, 3).is_err());
        assert_eq!(items, vec![1, 2, 3]);
    }
}
