use crate::context::SyncContext;
use crate::failure::Operation;
use kanban_core::KanbanResult;
use kanban_domain::{Board, Route};
use std::sync::Arc;

/// Board navigation: the full list and the favourites list.
pub struct Sidebar {
    ctx: SyncContext,
}

impl Sidebar {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    /// Fetch both lists from the server into the store.
    pub async fn load(&self) -> KanbanResult<()> {
        let boards = self.ctx.check(
            Operation::LoadBoards,
            "boards",
            self.ctx.gateway.get_all_boards().await,
        )?;
        self.ctx.store.set_boards(boards);

        let favourites = self.ctx.check(
            Operation::LoadBoards,
            "favourites",
            self.ctx.gateway.get_favourites().await,
        )?;
        self.ctx.store.set_favourites(favourites);
        Ok(())
    }

    pub fn boards(&self) -> Arc<Vec<Board>> {
        self.ctx.store.snapshot().boards
    }

    pub fn favourites(&self) -> Arc<Vec<Board>> {
        self.ctx.store.snapshot().favourites
    }

    /// With no board selected, jump to the first one.
    pub fn landing_route(&self, current: Option<&str>) -> Option<Route> {
        if current.is_some() {
            return None;
        }
        self.boards().first().map(|b| Route::Board(b.id.clone()))
    }

    pub fn active_index(&self, current: Option<&str>) -> Option<usize> {
        let current = current?;
        self.boards().iter().position(|b| b.id == current)
    }

    /// Create a board and put it at the top of the list.
    pub async fn add_board(&self) -> KanbanResult<Board> {
        let board = self.ctx.check(
            Operation::CreateBoard,
            "boards",
            self.ctx.gateway.create_board().await,
        )?;
        self.ctx.store.insert_board_front(board.clone());
        tracing::debug!(board = %board.id, "added board");
        Ok(board)
    }

    /// Drop handler for the board list. The new order is visible before the
    /// request goes out; the full order is sent, not the single move.
    pub async fn reorder(&self, from: usize, to: usize) -> KanbanResult<()> {
        let ids = self.ctx.store.reorder(from, to)?;
        let result = self.ctx.gateway.update_board_order(&ids).await;
        self.ctx.check(Operation::ReorderBoards, "boards", result)
    }

    /// Same as [`Self::reorder`], addressing the board by id.
    pub async fn move_board(&self, board_id: &str, to: usize) -> KanbanResult<()> {
        let ids = self.ctx.store.move_board(board_id, to)?;
        let result = self.ctx.gateway.update_board_order(&ids).await;
        self.ctx.check(Operation::ReorderBoards, "boards", result)
    }

    pub async fn reorder_favourites(&self, from: usize, to: usize) -> KanbanResult<()> {
        let ids = self.ctx.store.reorder_favourites(from, to)?;
        let result = self.ctx.gateway.update_favourite_order(&ids).await;
        self.ctx
            .check(Operation::ReorderFavourites, "favourites", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::{KanbanError, SyncConfig};
    use kanban_gateway::{GatewayCall, MemoryGateway};

    fn setup() -> (Arc<MemoryGateway>, Sidebar) {
        let gateway = Arc::new(MemoryGateway::with_boards(vec![
            Board::new("a", "Alpha").with_favourite(true),
            Board::new("b", "Beta"),
            Board::new("c", "Gamma").with_favourite(true),
        ]));
        let ctx = SyncContext::new(gateway.clone(), &SyncConfig::default());
        (gateway, Sidebar::new(ctx))
    }

    #[tokio::test]
    async fn test_load_and_landing_route() {
        let (_, sidebar) = setup();
        assert_eq!(sidebar.landing_route(None), None);

        sidebar.load().await.unwrap();

        assert_eq!(sidebar.boards().len(), 3);
        assert_eq!(sidebar.favourites().len(), 2);
        assert_eq!(sidebar.landing_route(None), Some(Route::Board("a".into())));
        assert_eq!(sidebar.landing_route(Some("b")), None);
        assert_eq!(sidebar.active_index(Some("c")), Some(2));
        assert_eq!(sidebar.active_index(Some("zzz")), None);
    }

    #[tokio::test]
    async fn test_add_board_goes_first() {
        let (_, sidebar) = setup();
        sidebar.load().await.unwrap();

        let board = sidebar.add_board().await.unwrap();

        assert_eq!(sidebar.boards()[0].id, board.id);
        assert_eq!(sidebar.active_index(Some("a")), Some(1));
    }

    #[tokio::test]
    async fn test_reorder_sends_full_order_once() {
        let (gateway, sidebar) = setup();
        sidebar.load().await.unwrap();
        gateway.clear_calls();

        sidebar.reorder(2, 0).await.unwrap();

        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::UpdateBoardOrder(vec![
                "c".into(),
                "a".into(),
                "b".into()
            ])]
        );
        let ids: Vec<_> = sidebar.favourites().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_failed_reorder_keeps_local_order() {
        let (gateway, sidebar) = setup();
        sidebar.load().await.unwrap();
        let mut failures = sidebar.ctx.failures.subscribe();
        gateway.set_offline(true);

        let result = sidebar.reorder(0, 1).await;

        assert!(matches!(result, Err(KanbanError::Network(_))));
        let ids: Vec<_> = sidebar.boards().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(
            failures.recv().await.unwrap().operation,
            Operation::ReorderBoards
        );
    }

    #[tokio::test]
    async fn test_invalid_drop_sends_nothing() {
        let (gateway, sidebar) = setup();
        sidebar.load().await.unwrap();
        gateway.clear_calls();

        assert!(sidebar.reorder(0, 9).await.is_err());
        assert!(gateway.writes().is_empty());
    }

    #[tokio::test]
    async fn test_move_board_by_id() {
        let (gateway, sidebar) = setup();
        sidebar.load().await.unwrap();

        sidebar.move_board("a", 2).await.unwrap();

        assert_eq!(gateway.stored_order(), vec!["b", "c", "a"]);
        assert!(matches!(
            sidebar.move_board("zzz", 0).await,
            Err(KanbanError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reorder_favourites() {
        let (gateway, sidebar) = setup();
        sidebar.load().await.unwrap();
        gateway.clear_calls();

        sidebar.reorder_favourites(1, 0).await.unwrap();

        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::UpdateFavouriteOrder(vec!["c".into(), "a".into()])]
        );
        let ids: Vec<_> = sidebar.boards().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
