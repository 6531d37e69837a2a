use async_trait::async_trait;
use kanban_core::KanbanResult;
use kanban_domain::{
    Board, BoardId, BoardPatch, ResolvedTaskMove, Section, SectionPatch, Task, TaskPatch,
};

/// Remote persistence for boards, sections, and tasks.
///
/// The server is the source of truth: writes that return an entity return
/// the canonical persisted version, which callers should prefer over their
/// local copy.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait BoardGateway: Send + Sync {
    /// Every board of the session user, in sidebar order. Sections are not included.
    async fn get_all_boards(&self) -> KanbanResult<Vec<Board>>;

    /// Favourite boards, in favourites order.
    async fn get_favourites(&self) -> KanbanResult<Vec<Board>>;

    /// A single board including its sections and tasks.
    async fn get_board(&self, board_id: &str) -> KanbanResult<Board>;

    /// Create a board with server-assigned defaults.
    async fn create_board(&self) -> KanbanResult<Board>;

    async fn update_board(&self, board_id: &str, patch: &BoardPatch) -> KanbanResult<Board>;

    async fn delete_board(&self, board_id: &str) -> KanbanResult<()>;

    /// Replace the stored board order with `ids`.
    async fn update_board_order(&self, ids: &[BoardId]) -> KanbanResult<()>;

    /// Replace the stored favourites order with `ids`.
    async fn update_favourite_order(&self, ids: &[BoardId]) -> KanbanResult<()>;

    async fn create_section(&self, board_id: &str) -> KanbanResult<Section>;

    async fn update_section(
        &self,
        board_id: &str,
        section_id: &str,
        patch: &SectionPatch,
    ) -> KanbanResult<()>;

    async fn delete_section(&self, board_id: &str, section_id: &str) -> KanbanResult<()>;

    async fn create_task(&self, board_id: &str, section_id: &str) -> KanbanResult<Task>;

    async fn update_task(&self, board_id: &str, task_id: &str, patch: &TaskPatch)
        -> KanbanResult<()>;

    async fn delete_task(&self, board_id: &str, task_id: &str) -> KanbanResult<()>;

    /// Persist the task orders of the sections touched by a drag.
    async fn update_task_position(
        &self,
        board_id: &str,
        resolved: &ResolvedTaskMove,
    ) -> KanbanResult<()>;
}
