use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::List => {
            let sidebar = ctx.loaded_sidebar().await?;
            output::output_list(sidebar.boards().to_vec())?;
        }
        BoardAction::Get { id } => {
            let page = ctx.open_board(&id).await?;
            output::output_success(page.board())?;
        }
        BoardAction::Create => {
            let board = ctx.sidebar().add_board().await?;
            output::output_success(&board)?;
        }
        BoardAction::Rename { id, title } => {
            let mut page = ctx.open_board(&id).await?;
            page.update_title(title);
            ctx.settle().await?;
            output::output_success(page.board())?;
        }
        BoardAction::Describe { id, description } => {
            let mut page = ctx.open_board(&id).await?;
            page.update_description(description);
            ctx.settle().await?;
            output::output_success(page.board())?;
        }
        BoardAction::Icon { id, icon } => {
            let mut page = ctx.open_board(&id).await?;
            page.change_icon(icon).await?;
            output::output_success(page.board())?;
        }
        BoardAction::Favourite { id } => {
            let sidebar = ctx.loaded_sidebar().await?;
            let mut page = ctx.open_board(&id).await?;
            let favourite = page.toggle_favourite().await?;
            let favourites: Vec<_> = sidebar.favourites().iter().map(|b| b.id.clone()).collect();
            output::output_success(serde_json::json!({
                "id": id,
                "favourite": favourite,
                "favourites": favourites,
            }))?;
        }
        BoardAction::Delete { id } => {
            ctx.loaded_sidebar().await?;
            let mut page = ctx.open_board(&id).await?;
            let next = page.delete().await?;
            output::output_success(serde_json::json!({
                "deleted": id,
                "next": next.path(),
            }))?;
        }
        BoardAction::Move { id, position } => {
            let sidebar = ctx.loaded_sidebar().await?;
            sidebar.move_board(&id, position).await?;
            let order: Vec<_> = sidebar.boards().iter().map(|b| b.id.clone()).collect();
            output::output_success(serde_json::json!({ "order": order }))?;
        }
    }
    Ok(())
}
