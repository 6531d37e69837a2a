use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::{move_item, Board, BoardId, BoardPatch};
use std::sync::Arc;
use tokio::sync::watch;

/// Immutable view of both board collections.
#[derive(Debug, Clone, Default)]
pub struct BoardLists {
    pub boards: Arc<Vec<Board>>,
    pub favourites: Arc<Vec<Board>>,
}

impl BoardLists {
    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == board_id)
    }

    pub fn favourite(&self, board_id: &str) -> Option<&Board> {
        self.favourites.iter().find(|b| b.id == board_id)
    }

    pub fn board_ids(&self) -> Vec<BoardId> {
        self.boards.iter().map(|b| b.id.clone()).collect()
    }

    pub fn favourite_ids(&self) -> Vec<BoardId> {
        self.favourites.iter().map(|b| b.id.clone()).collect()
    }

    /// Every favourite is flagged as such and shows the same title and icon
    /// as its entry in the full list.
    pub fn is_consistent(&self) -> bool {
        self.favourites.iter().all(|fav| {
            fav.favourite
                && self
                    .board(&fav.id)
                    .is_some_and(|b| b.title == fav.title && b.icon == fav.icon)
        })
    }
}

/// Owner of the "all boards" and "favourite boards" collections.
///
/// Every mutation replaces the affected list with a new one, so a
/// [`BoardLists`] snapshot taken earlier never changes under its holder.
/// Subscribers are notified after each change that touched something.
#[derive(Debug)]
pub struct BoardStore {
    lists: watch::Sender<BoardLists>,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `patch` to the entry with `board_id`, if there is one.
fn patch_entry(list: &mut Arc<Vec<Board>>, board_id: &str, patch: &BoardPatch) -> bool {
    let Some(pos) = list.iter().position(|b| b.id == board_id) else {
        return false;
    };
    Arc::make_mut(list)[pos].apply_patch(patch);
    true
}

fn reorder_list(list: &mut Arc<Vec<Board>>, from: usize, to: usize) -> KanbanResult<Vec<BoardId>> {
    let mut boards = Vec::clone(&**list);
    move_item(&mut boards, from, to)?;
    let ids = boards.iter().map(|b| b.id.clone()).collect();
    *list = Arc::new(boards);
    Ok(ids)
}

impl BoardStore {
    pub fn new() -> Self {
        let (lists, _) = watch::channel(BoardLists::default());
        Self { lists }
    }

    pub fn snapshot(&self) -> BoardLists {
        self.lists.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardLists> {
        self.lists.subscribe()
    }

    pub fn set_boards(&self, boards: Vec<Board>) {
        self.lists.send_modify(|lists| lists.boards = Arc::new(boards));
    }

    pub fn set_favourites(&self, favourites: Vec<Board>) {
        self.lists
            .send_modify(|lists| lists.favourites = Arc::new(favourites));
    }

    /// Apply a board's changed fields to both collections.
    ///
    /// The favourites entry is only touched when the board is in favourites.
    /// Ids missing from a collection leave it alone. The favourite flag is
    /// ignored here; membership changes go through [`Self::set_favourite`].
    /// Returns whether anything changed.
    pub fn apply_board_patch(&self, board_id: &str, patch: &BoardPatch) -> bool {
        let patch = patch.display_fields();
        if patch.is_empty() {
            return false;
        }
        self.lists.send_if_modified(|lists| {
            let in_boards = patch_entry(&mut lists.boards, board_id, &patch);
            let in_favourites = patch_entry(&mut lists.favourites, board_id, &patch);
            in_boards || in_favourites
        })
    }

    /// Move a board within the full list. Favourites keep their own order.
    /// Returns the resulting board id order.
    pub fn reorder(&self, from: usize, to: usize) -> KanbanResult<Vec<BoardId>> {
        let mut outcome = Err(KanbanError::Internal("reorder not applied".into()));
        self.lists.send_if_modified(|lists| {
            outcome = reorder_list(&mut lists.boards, from, to);
            outcome.is_ok()
        });
        outcome
    }

    pub fn move_board(&self, board_id: &str, new_index: usize) -> KanbanResult<Vec<BoardId>> {
        let from = self
            .snapshot()
            .boards
            .iter()
            .position(|b| b.id == board_id)
            .ok_or_else(|| KanbanError::NotFound(format!("board {}", board_id)))?;
        self.reorder(from, new_index)
    }

    pub fn reorder_favourites(&self, from: usize, to: usize) -> KanbanResult<Vec<BoardId>> {
        let mut outcome = Err(KanbanError::Internal("reorder not applied".into()));
        self.lists.send_if_modified(|lists| {
            outcome = reorder_list(&mut lists.favourites, from, to);
            outcome.is_ok()
        });
        outcome
    }

    /// Bring favourite membership in line with `persisted`, the server's copy
    /// returned by the favourite update. Returns the resulting state.
    ///
    /// Becoming a favourite puts `persisted` at the top of favourites, keeping
    /// the title and icon shown in the full list so an edit still waiting on
    /// its debounce is not undone. A board already listed stays where it is.
    /// Leaving removes only the entry with the same id.
    pub fn set_favourite(&self, persisted: Board) -> bool {
        let favourite = persisted.favourite;
        let board_id = persisted.id.clone();
        self.lists.send_modify(|lists| {
            let listed = lists.favourites.iter().any(|b| b.id == board_id);
            if favourite && !listed {
                let mut entry = Board {
                    sections: Vec::new(),
                    ..persisted
                };
                if let Some(local) = lists.boards.iter().find(|b| b.id == board_id) {
                    entry.title = local.title.clone();
                    entry.icon = local.icon.clone();
                }
                let mut favourites = Vec::clone(&lists.favourites);
                favourites.insert(0, entry);
                lists.favourites = Arc::new(favourites);
            } else if !favourite && listed {
                let favourites = lists
                    .favourites
                    .iter()
                    .filter(|b| b.id != board_id)
                    .cloned()
                    .collect();
                lists.favourites = Arc::new(favourites);
            }

            if let Some(pos) = lists.boards.iter().position(|b| b.id == board_id) {
                if lists.boards[pos].favourite != favourite {
                    Arc::make_mut(&mut lists.boards)[pos].favourite = favourite;
                }
            }
        });
        favourite
    }

    /// New boards go to the top of the full list.
    pub fn insert_board_front(&self, board: Board) {
        self.lists.send_modify(|lists| {
            let mut boards = Vec::clone(&lists.boards);
            boards.insert(0, board);
            lists.boards = Arc::new(boards);
        });
    }

    /// Drop a board from both collections and return the resulting lists.
    pub fn remove_board(&self, board_id: &str) -> BoardLists {
        self.lists.send_if_modified(|lists| {
            let before = (lists.boards.len(), lists.favourites.len());
            if lists.boards.iter().any(|b| b.id == board_id) {
                lists.boards = Arc::new(
                    lists.boards.iter().filter(|b| b.id != board_id).cloned().collect(),
                );
            }
            if lists.favourites.iter().any(|b| b.id == board_id) {
                lists.favourites = Arc::new(
                    lists
                        .favourites
                        .iter()
                        .filter(|b| b.id != board_id)
                        .cloned()
                        .collect(),
                );
            }
            before != (lists.boards.len(), lists.favourites.len())
        });
        self.snapshot()
    }
}
