use super::{report, AppContext};
use crate::output::{or_dash, Output};
use crate::WatchlistCommands;
use color_eyre::Result;
use lunastream_models::FavoriteKind;

pub async fn run(cmd: WatchlistCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        WatchlistCommands::List { kind } => {
            let kind = FavoriteKind::from(kind);
            let entries = report(ctx.repo.list_watchlist(kind), output);
            let rows = entries
                .iter()
                .map(|e| vec![e.id.to_string(), e.title.clone(), or_dash(e.date.as_deref())])
                .collect();
            output.table(&format!("Watchlist {}s", kind), &["Id", "Title", "Date"], rows, &entries);
        }
        WatchlistCommands::Remove { kind, id } => {
            let kind = FavoriteKind::from(kind);
            report(ctx.repo.remove_from_watchlist(kind, id), output);
            output.success(format!("Removed {} {} from the watchlist", kind, id));
        }
    }
    Ok(())
}
