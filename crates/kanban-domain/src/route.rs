use serde::Serialize;

use crate::board::{Board, BoardId};

/// What the client should display next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "board_id", rename_all = "snake_case")]
pub enum Route {
    Boards,
    Board(BoardId),
}

impl Route {
    /// First remaining board, or the board list when nothing is left.
    pub fn first_of(boards: &[Board]) -> Self {
        boards
            .first()
            .map(|b| Route::Board(b.id.clone()))
            .unwrap_or(Route::Boards)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Boards => "/boards".to_string(),
            Route::Board(id) => format!("/boards/{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_of() {
        assert_eq!(Route::first_of(&[]), Route::Boards);
        let boards = vec![Board::new("a", "A"), Board::new("b", "B")];
        assert_eq!(Route::first_of(&boards), Route::Board("a".into()));
        assert_eq!(Route::first_of(&boards).path(), "/boards/a");
    }
}
