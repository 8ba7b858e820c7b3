use super::{report, AppContext};
use crate::output::{or_dash, Output};
use crate::{FavoriteCommands, FavoriteKindArg};
use color_eyre::Result;
use lunastream_models::{FavoriteEntry, FavoriteKind};
use serde_json::json;

impl From<FavoriteKindArg> for FavoriteKind {
    fn from(kind: FavoriteKindArg) -> Self {
        match kind {
            FavoriteKindArg::Movie => FavoriteKind::Movie,
            FavoriteKindArg::Show => FavoriteKind::Show,
        }
    }
}

pub async fn run(cmd: FavoriteCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        FavoriteCommands::List { kind } => {
            let kind = FavoriteKind::from(kind);
            let favorites = report(ctx.repo.list_favorites(kind), output);
            let rows = favorites
                .iter()
                .map(|f| {
                    vec![
                        f.id.to_string(),
                        f.title.clone(),
                        or_dash(f.date.as_deref()),
                        or_dash(f.vote_average.map(|v| format!("{:.1}", v))),
                    ]
                })
                .collect();
            output.table(&format!("Favorite {}s", kind), &["Id", "Title", "Date", "Rating"], rows, &favorites);
        }
        FavoriteCommands::Add { kind, id, title, poster_path, date, vote_average } => {
            let kind = FavoriteKind::from(kind);
            let entry = FavoriteEntry { poster_path, date, vote_average, ..FavoriteEntry::new(id, title) };
            let title = entry.title.clone();
            report(ctx.repo.add_favorite(kind, entry), output);
            output.success(format!("Added '{}' to favorite {}s", title, kind));
        }
        FavoriteCommands::Remove { kind, id } => {
            let kind = FavoriteKind::from(kind);
            report(ctx.repo.remove_favorite(kind, id), output);
            output.success(format!("Removed {} {} from favorites", kind, id));
        }
        FavoriteCommands::Check { kind, id } => {
            let kind = FavoriteKind::from(kind);
            let favorite = ctx.repo.is_favorite(kind, id);
            if output.is_human() {
                output.info(if favorite {
                    format!("{} {} is a favorite", kind, id)
                } else {
                    format!("{} {} is not a favorite", kind, id)
                });
            } else {
                output.data(&json!({ "kind": kind.as_str(), "id": id, "favorite": favorite }));
            }
        }
    }
    Ok(())
}
