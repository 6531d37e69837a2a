use crate::cli::{TaskAction, TaskEditArgs, TaskMoveArgs};
use crate::context::CliContext;
use crate::output;
use kanban_domain::{Task, TaskMove};
use kanban_sync::BoardPage;

pub async fn handle(ctx: &mut CliContext, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::Create {
            board_id,
            section_id,
            title,
        } => {
            let mut page = ctx.open_board(&board_id).await?;
            let mut task = page.add_task(&section_id).await?;
            if let Some(title) = title {
                let mut editor = page.edit_task(&task.id)?;
                if let Some(edited) = editor.update_title(title) {
                    page.apply_task_update(edited);
                }
                task = editor.close();
                ctx.settle().await?;
            }
            output::output_success(&task)?;
        }
        TaskAction::Edit(args) => {
            let task = handle_edit(ctx, args).await?;
            output::output_success(&task)?;
        }
        TaskAction::Delete { board_id, id } => {
            let mut page = ctx.open_board(&board_id).await?;
            let mut editor = page.edit_task(&id)?;
            let deleted = editor.delete().await?;
            page.remove_task(&deleted.id);
            output::output_success(serde_json::json!({ "deleted": deleted.id }))?;
        }
        TaskAction::Move(args) => {
            let mut page = ctx.open_board(&args.board_id).await?;
            let task_move = resolve_move(&page, &args)?;
            page.move_task(&task_move).await?;
            output::output_success(page.board().section(&task_move.destination_section))?;
        }
    }
    Ok(())
}

async fn handle_edit(ctx: &mut CliContext, args: TaskEditArgs) -> anyhow::Result<Task> {
    if args.title.is_none() && args.content.is_none() {
        anyhow::bail!("nothing to update: pass --title and/or --content");
    }

    let mut page = ctx.open_board(&args.board_id).await?;
    let mut editor = page.edit_task(&args.id)?;
    if let Some(title) = args.title {
        if let Some(edited) = editor.update_title(title) {
            page.apply_task_update(edited);
        }
    }
    if let Some(content) = args.content {
        if let Some(edited) = editor.update_content(content) {
            page.apply_task_update(edited);
        }
    }
    let task = editor.close();
    ctx.settle().await?;
    Ok(task)
}

/// Turn "task X to position N of section S" into index-based move.
fn resolve_move(page: &BoardPage, args: &TaskMoveArgs) -> anyhow::Result<TaskMove> {
    let (source, index) = page
        .sections()
        .iter()
        .find_map(|s| {
            s.tasks
                .iter()
                .position(|t| t.id == args.id)
                .map(|i| (s.id.clone(), i))
        })
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", args.id))?;

    Ok(TaskMove {
        destination_section: args.section_id.clone().unwrap_or_else(|| source.clone()),
        source_section: source,
        source_index: index,
        destination_index: args.position,
    })
}
