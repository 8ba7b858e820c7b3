use super::{report, AppContext};
use crate::output::Output;
use color_eyre::Result;
use lunastream_models::FavoriteKind;

/// Which parts of the stored watch state to clear
#[derive(Debug, Clone, Copy, Default)]
pub struct Selection {
    pub all: bool,
    pub continue_watching: bool,
    pub recent: bool,
    pub favorites: bool,
    pub watchlist: bool,
    pub progress: bool,
}

impl Selection {
    fn is_empty(&self) -> bool {
        !(self.all || self.continue_watching || self.recent || self.favorites || self.watchlist || self.progress)
    }
}

pub async fn run_clear(selection: Selection, ctx: &AppContext, output: &Output) -> Result<()> {
    if selection.is_empty() {
        output.warn(
            "No clear option specified. Use --continue-watching, --recent, --favorites, --watchlist, --progress, or --all",
        );
        output.info("\nExample: lunastream clear --recent");
        return Ok(());
    }
    let all = selection.all;

    if all || selection.continue_watching {
        report(ctx.repo.clear_all(), output);
        output.success("Cleared continue watching");
    }

    if all || selection.recent {
        report(ctx.repo.clear_recently_viewed(), output);
        output.success("Cleared recently viewed movies, shows and episodes");
    }

    if all || selection.favorites {
        for kind in [FavoriteKind::Movie, FavoriteKind::Show] {
            report(ctx.repo.clear_favorites(kind), output);
        }
        output.success("Cleared favorite movies and shows");
    }

    if all || selection.watchlist {
        for kind in [FavoriteKind::Movie, FavoriteKind::Show] {
            report(ctx.repo.clear_watchlist(kind), output);
        }
        output.success("Cleared the watchlist");
    }

    if all || selection.progress {
        report(ctx.repo.clear_progress(), output);
        output.success("Cleared watch progress");
    }

    if all {
        report(ctx.prefs.reset(), output);
        output.success("Reset preferences");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Backend;
    use crate::output::OutputFormat;
    use lunastream_config::Config;
    use lunastream_core::watch_state::FAVORITE_SHOWS_KEY;
    use lunastream_core::{KeyValueStore, MemoryStore};
    use lunastream_models::{FavoriteEntry, NewWatchItem, RecentMovie};
    use serde_json::json;
    use std::sync::Arc;

    fn seeded() -> AppContext {
        let backend: Backend = Arc::new(MemoryStore::new());
        let ctx = AppContext::with_backend(backend, &Config::default());
        ctx.repo.add_or_update(NewWatchItem::movie(1, "Heat"));
        ctx.repo.add_favorite(FavoriteKind::Show, FavoriteEntry::new(7, "Show"));
        ctx.repo.add_favorite(FavoriteKind::Movie, FavoriteEntry::new(1, "Heat"));
        ctx.repo.add_to_watchlist(FavoriteKind::Movie, FavoriteEntry::new(1, "Heat"));
        ctx.repo.record_movie_view(RecentMovie { id: 1, title: "Heat".into(), poster_path: None, release_date: None });
        ctx.repo.merge_progress("1", json!({"id": 1, "type": "movie"}).as_object().cloned().unwrap());
        ctx
    }

    #[tokio::test]
    async fn test_clear_only_selected() {
        let ctx = seeded();
        let output = Output::new(OutputFormat::Json, true);

        let selection = Selection { recent: true, ..Selection::default() };
        run_clear(selection, &ctx, &output).await.unwrap();

        assert!(ctx.repo.recent_movies().value().is_empty());
        assert_eq!(ctx.repo.list_continue_watching().value().len(), 1);
        assert!(ctx.repo.is_favorite(FavoriteKind::Show, 7));
        assert!(ctx.repo.is_in_watchlist(FavoriteKind::Movie, 1));
    }

    #[tokio::test]
    async fn test_clear_favorites_drops_both_kinds() {
        let ctx = seeded();
        let output = Output::new(OutputFormat::Json, true);

        let selection = Selection { favorites: true, ..Selection::default() };
        run_clear(selection, &ctx, &output).await.unwrap();

        assert!(ctx.repo.list_favorites(FavoriteKind::Movie).value().is_empty());
        assert!(ctx.repo.list_favorites(FavoriteKind::Show).value().is_empty());
        assert_eq!(ctx.repo.storage().backend().get(FAVORITE_SHOWS_KEY).unwrap(), None);
        assert!(ctx.repo.is_in_watchlist(FavoriteKind::Movie, 1));
    }

    #[tokio::test]
    async fn test_clear_all() {
        let ctx = seeded();
        let output = Output::new(OutputFormat::Json, true);

        let selection = Selection { all: true, ..Selection::default() };
        run_clear(selection, &ctx, &output).await.unwrap();

        assert!(ctx.repo.list_continue_watching().value().is_empty());
        assert!(!ctx.repo.is_favorite(FavoriteKind::Show, 7));
        assert!(!ctx.repo.is_in_watchlist(FavoriteKind::Movie, 1));
        assert!(ctx.repo.recent_movies().value().is_empty());
        assert!(ctx.repo.all_progress().value().is_empty());
    }
}
