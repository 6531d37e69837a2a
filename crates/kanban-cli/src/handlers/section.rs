use crate::cli::SectionAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: SectionAction) -> anyhow::Result<()> {
    match action {
        SectionAction::Create { board_id, title } => {
            let mut page = ctx.open_board(&board_id).await?;
            let section = page.add_section().await?;
            if let Some(title) = title {
                page.update_section_title(&section.id, title)?;
                ctx.settle().await?;
            }
            output::output_success(page.board().section(&section.id))?;
        }
        SectionAction::Rename {
            board_id,
            id,
            title,
        } => {
            let mut page = ctx.open_board(&board_id).await?;
            page.update_section_title(&id, title)?;
            ctx.settle().await?;
            output::output_success(page.board().section(&id))?;
        }
        SectionAction::Delete { board_id, id } => {
            let mut page = ctx.open_board(&board_id).await?;
            page.delete_section(&id).await?;
            output::output_success(serde_json::json!({ "deleted": id }))?;
        }
    }
    Ok(())
}
