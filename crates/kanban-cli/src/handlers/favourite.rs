use crate::cli::FavouriteAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: FavouriteAction) -> anyhow::Result<()> {
    let sidebar = ctx.loaded_sidebar().await?;
    match action {
        FavouriteAction::List => {
            output::output_list(sidebar.favourites().to_vec())?;
        }
        FavouriteAction::Move { from, to } => {
            sidebar.reorder_favourites(from, to).await?;
            let order: Vec<_> = sidebar.favourites().iter().map(|b| b.id.clone()).collect();
            output::output_success(serde_json::json!({ "order": order }))?;
        }
    }
    Ok(())
}
