use crate::traits::BoardGateway;
use async_trait::async_trait;
use chrono::Utc;
use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::{
    Board, BoardId, BoardPatch, ResolvedTaskMove, Section, SectionPatch, Task, TaskPatch,
};
use parking_lot::Mutex;
use uuid::Uuid;

pub const DEFAULT_BOARD_TITLE: &str = "Untitled";
pub const DEFAULT_BOARD_ICON: &str = "📃";

/// Calls kept by [`MemoryGateway::calls`]; older ones are dropped first.
pub const MAX_RECORDED_CALLS: usize = 1024;

/// One request received by a [`MemoryGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    GetAllBoards,
    GetFavourites,
    GetBoard(BoardId),
    CreateBoard,
    UpdateBoard(BoardId, BoardPatch),
    DeleteBoard(BoardId),
    UpdateBoardOrder(Vec<BoardId>),
    UpdateFavouriteOrder(Vec<BoardId>),
    CreateSection(BoardId),
    UpdateSection(BoardId, String, SectionPatch),
    DeleteSection(BoardId, String),
    CreateTask(BoardId, String),
    UpdateTask(BoardId, String, TaskPatch),
    DeleteTask(BoardId, String),
    UpdateTaskPosition(BoardId, ResolvedTaskMove),
}

impl GatewayCall {
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            GatewayCall::GetAllBoards | GatewayCall::GetFavourites | GatewayCall::GetBoard(_)
        )
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    boards: Vec<Board>,
    favourite_order: Vec<BoardId>,
    calls: Vec<GatewayCall>,
    offline: bool,
}

/// In-process board service.
///
/// Behaves like the remote server (canonical entities on writes, server-side
/// defaults for new boards) and records the calls it receives, keeping the
/// most recent [`MAX_RECORDED_CALLS`].
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with boards in sidebar order. Favourites keep the same relative order.
    pub fn with_boards(boards: Vec<Board>) -> Self {
        let favourite_order = boards
            .iter()
            .filter(|b| b.favourite)
            .map(|b| b.id.clone())
            .collect();
        Self {
            state: Mutex::new(MemoryState {
                boards,
                favourite_order,
                ..Default::default()
            }),
        }
    }

    /// While offline every call is recorded and then fails with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().calls.clone()
    }

    pub fn writes(&self) -> Vec<GatewayCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Server-side copy of a board, for assertions.
    pub fn stored_board(&self, board_id: &str) -> Option<Board> {
        self.state
            .lock()
            .boards
            .iter()
            .find(|b| b.id == board_id)
            .cloned()
    }

    pub fn stored_order(&self) -> Vec<BoardId> {
        self.state.lock().boards.iter().map(|b| b.id.clone()).collect()
    }

    fn record(&self, call: GatewayCall) -> KanbanResult<parking_lot::MutexGuard<'_, MemoryState>> {
        let mut state = self.state.lock();
        if state.calls.len() >= MAX_RECORDED_CALLS {
            let excess = state.calls.len() + 1 - MAX_RECORDED_CALLS;
            state.calls.drain(..excess);
        }
        state.calls.push(call);
        if state.offline {
            return Err(KanbanError::Network("connection refused".to_string()));
        }
        Ok(state)
    }
}

impl MemoryState {
    fn board_mut(&mut self, board_id: &str) -> KanbanResult<&mut Board> {
        self.boards
            .iter_mut()
            .find(|b| b.id == board_id)
            .ok_or_else(|| KanbanError::NotFound(format!("board {}", board_id)))
    }

    fn section_mut(&mut self, board_id: &str, section_id: &str) -> KanbanResult<&mut Section> {
        self.board_mut(board_id)?
            .section_mut(section_id)
            .ok_or_else(|| KanbanError::NotFound(format!("section {}", section_id)))
    }

    fn task_mut(&mut self, board_id: &str, task_id: &str) -> KanbanResult<&mut Task> {
        self.board_mut(board_id)?
            .sections
            .iter_mut()
            .flat_map(|s| s.tasks.iter_mut())
            .find(|t| t.id == task_id)
            .ok_or_else(|| KanbanError::NotFound(format!("task {}", task_id)))
    }

    fn summary(board: &Board) -> Board {
        Board {
            sections: Vec::new(),
            ..board.clone()
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Rebuild `tasks` following `order`, pulling tasks from `pool`.
fn take_in_order(pool: &mut Vec<Task>, order: &[String]) -> Vec<Task> {
    order
        .iter()
        .filter_map(|id| {
            pool.iter()
                .position(|t| &t.id == id)
                .map(|pos| pool.remove(pos))
        })
        .collect()
}

#[async_trait]
impl BoardGateway for MemoryGateway {
    async fn get_all_boards(&self) -> KanbanResult<Vec<Board>> {
        let state = self.record(GatewayCall::GetAllBoards)?;
        Ok(state.boards.iter().map(MemoryState::summary).collect())
    }

    async fn get_favourites(&self) -> KanbanResult<Vec<Board>> {
        let state = self.record(GatewayCall::GetFavourites)?;
        Ok(state
            .favourite_order
            .iter()
            .filter_map(|id| state.boards.iter().find(|b| &b.id == id))
            .map(MemoryState::summary)
            .collect())
    }

    async fn get_board(&self, board_id: &str) -> KanbanResult<Board> {
        let mut state = self.record(GatewayCall::GetBoard(board_id.to_string()))?;
        Ok(state.board_mut(board_id)?.clone())
    }

    async fn create_board(&self) -> KanbanResult<Board> {
        let mut state = self.record(GatewayCall::CreateBoard)?;
        let board = Board::new(new_id(), DEFAULT_BOARD_TITLE).with_icon(DEFAULT_BOARD_ICON);
        state.boards.insert(0, board.clone());
        Ok(board)
    }

    async fn update_board(&self, board_id: &str, patch: &BoardPatch) -> KanbanResult<Board> {
        let mut state =
            self.record(GatewayCall::UpdateBoard(board_id.to_string(), patch.clone()))?;
        let board = state.board_mut(board_id)?;
        let was_favourite = board.favourite;
        board.apply_patch(patch);
        let updated = MemoryState::summary(board);

        match (was_favourite, updated.favourite) {
            (false, true) => state.favourite_order.insert(0, updated.id.clone()),
            (true, false) => state.favourite_order.retain(|id| id != board_id),
            _ => {}
        }
        Ok(updated)
    }

    async fn delete_board(&self, board_id: &str) -> KanbanResult<()> {
        let mut state = self.record(GatewayCall::DeleteBoard(board_id.to_string()))?;
        state.board_mut(board_id)?;
        state.boards.retain(|b| b.id != board_id);
        state.favourite_order.retain(|id| id != board_id);
        Ok(())
    }

    async fn update_board_order(&self, ids: &[BoardId]) -> KanbanResult<()> {
        let mut state = self.record(GatewayCall::UpdateBoardOrder(ids.to_vec()))?;
        let mut ordered = Vec::with_capacity(state.boards.len());
        for id in ids {
            if let Some(pos) = state.boards.iter().position(|b| &b.id == id) {
                ordered.push(state.boards.remove(pos));
            }
        }
        // Boards missing from the order keep their place at the end.
        ordered.append(&mut state.boards);
        state.boards = ordered;
        Ok(())
    }

    async fn update_favourite_order(&self, ids: &[BoardId]) -> KanbanResult<()> {
        let mut state = self.record(GatewayCall::UpdateFavouriteOrder(ids.to_vec()))?;
        state.favourite_order = ids.to_vec();
        Ok(())
    }

    async fn create_section(&self, board_id: &str) -> KanbanResult<Section> {
        let mut state = self.record(GatewayCall::CreateSection(board_id.to_string()))?;
        let section = Section::new(new_id(), "");
        state.board_mut(board_id)?.sections.push(section.clone());
        Ok(section)
    }

    async fn update_section(
        &self,
        board_id: &str,
        section_id: &str,
        patch: &SectionPatch,
    ) -> KanbanResult<()> {
        let mut state = self.record(GatewayCall::UpdateSection(
            board_id.to_string(),
            section_id.to_string(),
            patch.clone(),
        ))?;
        let section = state.section_mut(board_id, section_id)?;
        if let Some(ref title) = patch.title {
            section.title = title.clone();
        }
        Ok(())
    }

    async fn delete_section(&self, board_id: &str, section_id: &str) -> KanbanResult<()> {
        let mut state = self.record(GatewayCall::DeleteSection(
            board_id.to_string(),
            section_id.to_string(),
        ))?;
        state.section_mut(board_id, section_id)?;
        state
            .board_mut(board_id)?
            .sections
            .retain(|s| s.id != section_id);
        Ok(())
    }

    async fn create_task(&self, board_id: &str, section_id: &str) -> KanbanResult<Task> {
        let mut state = self.record(GatewayCall::CreateTask(
            board_id.to_string(),
            section_id.to_string(),
        ))?;
        let mut task = Task::new(new_id(), section_id);
        task.created_at = Utc::now();
        state
            .section_mut(board_id, section_id)?
            .tasks
            .insert(0, task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        board_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> KanbanResult<()> {
        let mut state = self.record(GatewayCall::UpdateTask(
            board_id.to_string(),
            task_id.to_string(),
            patch.clone(),
        ))?;
        state.task_mut(board_id, task_id)?.apply_patch(patch);
        Ok(())
    }

    async fn delete_task(&self, board_id: &str, task_id: &str) -> KanbanResult<()> {
        let mut state = self.record(GatewayCall::DeleteTask(
            board_id.to_string(),
            task_id.to_string(),
        ))?;
        state.task_mut(board_id, task_id)?;
        for section in state.board_mut(board_id)?.sections.iter_mut() {
            section.tasks.retain(|t| t.id != task_id);
        }
        Ok(())
    }

    async fn update_task_position(
        &self,
        board_id: &str,
        resolved: &ResolvedTaskMove,
    ) -> KanbanResult<()> {
        let mut state = self.record(GatewayCall::UpdateTaskPosition(
            board_id.to_string(),
            resolved.clone(),
        ))?;
        let board = state.board_mut(board_id)?;

        let mut pool: Vec<Task> = Vec::new();
        for section in board.sections.iter_mut() {
            if section.id == resolved.source_section || section.id == resolved.destination_section
            {
                pool.append(&mut section.tasks);
            }
        }
        for section in board.sections.iter_mut() {
            if section.id == resolved.destination_section {
                section.tasks = take_in_order(&mut pool, &resolved.destination_tasks);
                for task in section.tasks.iter_mut() {
                    task.section = Some(section.id.clone());
                }
            } else if section.id == resolved.source_section {
                section.tasks = take_in_order(&mut pool, &resolved.source_tasks);
            }
        }
        Ok(())
    }
}
