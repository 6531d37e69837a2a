use crate::context::SyncContext;
use crate::failure::Operation;
use crate::keys;
use kanban_core::KanbanResult;
use kanban_domain::{BoardId, Task, TaskPatch};

/// Editing session for a single task.
///
/// Once closed, edits are ignored. Writes already scheduled still go out.
pub struct TaskEditor {
    ctx: SyncContext,
    board_id: BoardId,
    task: Task,
    closed: bool,
}

impl TaskEditor {
    pub fn open(ctx: SyncContext, board_id: BoardId, task: Task) -> Self {
        tracing::debug!(task = %task.id, "task editor opened");
        Self {
            ctx,
            board_id,
            task,
            closed: false,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn persist(&self, key: String, patch: TaskPatch) {
        let board_id = self.board_id.clone();
        let task_id = self.task.id.clone();
        self.ctx
            .persist_debounced(key, Operation::UpdateTask, move |gateway| async move {
                gateway.update_task(&board_id, &task_id, &patch).await
            });
    }

    /// Returns the edited task so the board page can mirror it with
    /// [`BoardPage::apply_task_update`](crate::BoardPage::apply_task_update),
    /// or `None` when the editor is already closed.
    pub fn update_title(&mut self, title: impl Into<String>) -> Option<&Task> {
        if self.closed {
            return None;
        }
        let patch = TaskPatch::title(title);
        self.task.apply_patch(&patch);
        self.persist(keys::task_title(&self.task.id), patch);
        Some(&self.task)
    }

    pub fn update_content(&mut self, content: impl Into<String>) -> Option<&Task> {
        if self.closed {
            return None;
        }
        let patch = TaskPatch::content(content);
        self.task.apply_patch(&patch);
        self.persist(keys::task_content(&self.task.id), patch);
        Some(&self.task)
    }

    /// Close the editor and hand back the edited task for the board page.
    pub fn close(&mut self) -> Task {
        self.closed = true;
        self.task.clone()
    }

    pub async fn delete(&mut self) -> KanbanResult<Task> {
        let result = self
            .ctx
            .gateway
            .delete_task(&self.board_id, &self.task.id)
            .await;
        self.ctx.check(Operation::DeleteTask, &self.task.id, result)?;
        Ok(self.close())
    }

    pub fn created_label(&self) -> String {
        self.task.created_label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_page::BoardPage;
    use crate::debounce::WritePhase;
    use chrono::{TimeZone, Utc};
    use kanban_core::SyncConfig;
    use kanban_domain::{Board, Section};
    use kanban_gateway::{GatewayCall, MemoryGateway};
    use std::sync::Arc;

    async fn page_with_task() -> (Arc<MemoryGateway>, SyncContext, BoardPage) {
        let mut board = Board::new("a", "Alpha");
        let mut section = Section::new("s1", "Todo");
        let mut task = Task::new("t1", "s1");
        task.created_at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();
        section.tasks.push(task);
        board.sections.push(section);

        let gateway = Arc::new(MemoryGateway::with_boards(vec![board]));
        let ctx = SyncContext::new(gateway.clone(), &SyncConfig::default());
        let page = BoardPage::open(ctx.clone(), "a").await.unwrap();
        gateway.clear_calls();
        (gateway, ctx, page)
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_lets_pending_title_write_finish() {
        let (gateway, ctx, mut page) = page_with_task().await;
        let mut editor = page.edit_task("t1").unwrap();

        assert!(editor.update_title("Write docs").is_some());
        let task = editor.close();
        assert!(page.apply_task_update(&task));
        assert_eq!(page.task("t1").unwrap().title, "Write docs");

        assert!(editor.update_title("ignored").is_none());
        assert!(editor.update_content("ignored").is_none());
        assert_eq!(ctx.scheduler.pending_count(), 1);

        ctx.scheduler.settle().await;
        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::UpdateTask(
                "a".into(),
                "t1".into(),
                TaskPatch::title("Write docs")
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_lets_pending_content_write_finish() {
        let (gateway, ctx, mut page) = page_with_task().await;
        let mut editor = page.edit_task("t1").unwrap();

        editor.update_content("{\"blocks\":[\"draft\"]}");
        page.apply_task_update(&editor.close());
        assert_eq!(ctx.scheduler.phase("task:content:t1"), WritePhase::PendingWrite);

        assert!(editor.update_content("{\"blocks\":[]}").is_none());
        ctx.scheduler.settle().await;

        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::UpdateTask(
                "a".into(),
                "t1".into(),
                TaskPatch::content("{\"blocks\":[\"draft\"]}")
            )]
        );
        let stored = gateway.stored_board("a").unwrap();
        assert_eq!(
            stored.section("s1").unwrap().task("t1").unwrap().content,
            "{\"blocks\":[\"draft\"]}"
        );
        assert_eq!(page.task("t1").unwrap().content, "{\"blocks\":[\"draft\"]}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_edit_mirrors_into_board_page() {
        let (_, ctx, mut page) = page_with_task().await;
        let mut editor = page.edit_task("t1").unwrap();

        if let Some(task) = editor.update_title("Plan") {
            assert!(page.apply_task_update(task));
        }
        assert_eq!(page.task("t1").unwrap().title, "Plan");

        if let Some(task) = editor.update_content("notes") {
            assert!(page.apply_task_update(task));
        }
        let shown = page.task("t1").unwrap();
        assert_eq!(shown.title, "Plan");
        assert_eq!(shown.content, "notes");
        assert_eq!(ctx.scheduler.pending_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_title_and_content_have_separate_keys() {
        let (gateway, ctx, page) = page_with_task().await;
        let mut editor = page.edit_task("t1").unwrap();

        editor.update_title("T");
        editor.update_content("C");
        assert_eq!(ctx.scheduler.phase("task:title:t1"), WritePhase::PendingWrite);
        assert_eq!(ctx.scheduler.phase("task:content:t1"), WritePhase::PendingWrite);

        ctx.scheduler.settle().await;
        assert_eq!(gateway.writes().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_closes_editor() {
        let (gateway, _ctx, mut page) = page_with_task().await;
        let mut editor = page.edit_task("t1").unwrap();

        let deleted = editor.delete().await.unwrap();

        assert!(editor.is_closed());
        assert!(page.remove_task(&deleted.id));
        assert!(page.task("t1").is_none());
        assert_eq!(
            gateway.writes(),
            vec![GatewayCall::DeleteTask("a".into(), "t1".into())]
        );
    }

    #[tokio::test]
    async fn test_created_label() {
        let (_, _ctx, page) = page_with_task().await;
        let editor = page.edit_task("t1").unwrap();
        assert_eq!(editor.created_label(), "2024-03-09");
    }
}
