use crate::context::SyncContext;
use crate::failure::Operation;
use crate::keys;
use crate::task_editor::TaskEditor;
use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::{Board, BoardPatch, Route, Section, SectionPatch, Task, TaskMove};

/// The board currently on screen, with its sections and tasks.
///
/// Text edits land locally right away and reach the server after the
/// debounce delay. Everything else is written immediately.
pub struct BoardPage {
    ctx: SyncContext,
    board: Board,
}

impl BoardPage {
    pub async fn open(ctx: SyncContext, board_id: &str) -> KanbanResult<Self> {
        let result = ctx.gateway.get_board(board_id).await;
        let board = ctx.check(Operation::LoadBoard, board_id, result)?;
        tracing::debug!(board = %board.id, sections = board.sections.len(), "opened board");
        Ok(Self { ctx, board })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn id(&self) -> &str {
        &self.board.id
    }

    pub fn sections(&self) -> &[Section] {
        &self.board.sections
    }

    fn persist_board(&self, key: String, patch: BoardPatch) {
        let board_id = self.board.id.clone();
        self.ctx
            .persist_debounced(key, Operation::UpdateBoard, move |gateway| async move {
                gateway.update_board(&board_id, &patch).await.map(|_| ())
            });
    }

    /// The sidebar shows the new title before the write is even scheduled.
    pub fn update_title(&mut self, title: impl Into<String>) {
        let patch = BoardPatch::title(title);
        self.board.apply_patch(&patch);
        self.ctx.store.apply_board_patch(&self.board.id, &patch);
        self.persist_board(keys::board_title(&self.board.id), patch);
    }

    pub fn update_description(&mut self, description: impl Into<String>) {
        let patch = BoardPatch::description(description);
        self.board.apply_patch(&patch);
        self.ctx.store.apply_board_patch(&self.board.id, &patch);
        self.persist_board(keys::board_description(&self.board.id), patch);
    }

    pub async fn change_icon(&mut self, icon: impl Into<String>) -> KanbanResult<()> {
        let patch = BoardPatch::icon(icon);
        self.board.apply_patch(&patch);
        self.ctx.store.apply_board_patch(&self.board.id, &patch);

        let result = self.ctx.gateway.update_board(&self.board.id, &patch).await;
        self.ctx
            .check(Operation::UpdateBoard, &self.board.id, result)
            .map(|_| ())
    }

    /// Flip favourite on the server, then move the board in or out of the
    /// favourites list using the copy the server sent back.
    pub async fn toggle_favourite(&mut self) -> KanbanResult<bool> {
        let patch = BoardPatch::favourite(!self.board.favourite);
        let result = self.ctx.gateway.update_board(&self.board.id, &patch).await;
        let persisted = self
            .ctx
            .check(Operation::ToggleFavourite, &self.board.id, result)?;

        let favourite = self.ctx.store.set_favourite(persisted);
        self.board.favourite = favourite;
        tracing::debug!(board = %self.board.id, favourite, "toggled favourite");
        Ok(favourite)
    }

    /// Delete the board and return where to navigate next.
    pub async fn delete(&mut self) -> KanbanResult<Route> {
        let result = self.ctx.gateway.delete_board(&self.board.id).await;
        self.ctx.check(Operation::DeleteBoard, &self.board.id, result)?;

        let lists = self.ctx.store.remove_board(&self.board.id);
        let route = Route::first_of(&lists.boards);
        tracing::debug!(board = %self.board.id, next = %route.path(), "deleted board");
        Ok(route)
    }

    pub async fn add_section(&mut self) -> KanbanResult<Section> {
        let result = self.ctx.gateway.create_section(&self.board.id).await;
        let section = self
            .ctx
            .check(Operation::CreateSection, &self.board.id, result)?;
        self.board.sections.push(section.clone());
        Ok(section)
    }

    pub fn update_section_title(
        &mut self,
        section_id: &str,
        title: impl Into<String>,
    ) -> KanbanResult<()> {
        let section = self
            .board
            .section_mut(section_id)
            .ok_or_else(|| KanbanError::NotFound(format!("section {}", section_id)))?;
        let title = title.into();
        section.title = title.clone();
        let patch = SectionPatch::title(title);

        let board_id = self.board.id.clone();
        let section_id = section_id.to_string();
        self.ctx.persist_debounced(
            keys::section_title(&section_id),
            Operation::UpdateSection,
            move |gateway| async move {
                gateway
                    .update_section(&board_id, &section_id, &patch)
                    .await
            },
        );
        Ok(())
    }

    pub async fn delete_section(&mut self, section_id: &str) -> KanbanResult<()> {
        let result = self
            .ctx
            .gateway
            .delete_section(&self.board.id, section_id)
            .await;
        self.ctx.check(Operation::DeleteSection, section_id, result)?;
        self.board.sections.retain(|s| s.id != section_id);
        Ok(())
    }

    /// New tasks go to the top of their section.
    pub async fn add_task(&mut self, section_id: &str) -> KanbanResult<Task> {
        if self.board.section(section_id).is_none() {
            return Err(KanbanError::NotFound(format!("section {}", section_id)));
        }
        let result = self.ctx.gateway.create_task(&self.board.id, section_id).await;
        let task = self.ctx.check(Operation::CreateTask, section_id, result)?;

        if let Some(section) = self.board.section_mut(section_id) {
            section.tasks.insert(0, task.clone());
        }
        Ok(task)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.board
            .sections
            .iter()
            .find_map(|s| s.task(task_id))
    }

    /// Put an edited task back in place. Returns false if the task is gone.
    pub fn apply_task_update(&mut self, task: &Task) -> bool {
        let slot = self
            .board
            .sections
            .iter_mut()
            .flat_map(|s| s.tasks.iter_mut())
            .find(|t| t.id == task.id);
        match slot {
            Some(existing) => {
                existing.title = task.title.clone();
                existing.content = task.content.clone();
                true
            }
            None => false,
        }
    }

    /// Drop a task locally after it was deleted elsewhere.
    pub fn remove_task(&mut self, task_id: &str) -> bool {
        let mut removed = false;
        for section in self.board.sections.iter_mut() {
            let before = section.tasks.len();
            section.tasks.retain(|t| t.id != task_id);
            removed |= section.tasks.len() != before;
        }
        removed
    }

    /// Splice locally, then send the full order of both sections.
    pub async fn move_task(&mut self, task_move: &TaskMove) -> KanbanResult<()> {
        let resolved = task_move.apply(&mut self.board.sections)?;
        let result = self
            .ctx
            .gateway
            .update_task_position(&self.board.id, &resolved)
            .await;
        self.ctx
            .check(Operation::MoveTask, &task_move.destination_section, result)
    }

    pub fn edit_task(&self, task_id: &str) -> KanbanResult<TaskEditor> {
        let task = self
            .task(task_id)
            .cloned()
            .ok_or_else(|| KanbanError::NotFound(format!("task {}", task_id)))?;
        Ok(TaskEditor::open(self.ctx.clone(), self.board.id.clone(), task))
    }
}

impl std::fmt::Debug for BoardPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardPage")
            .field("board", &self.board.id)
            .finish_non_exhaustive()
    }
}
