use super::{report, AppContext};
use crate::output::{or_dash, Output};
use crate::{ContinueCommands, KindArg};
use color_eyre::Result;
use lunastream_core::WatchStateRepository;
use lunastream_models::{ContinueWatchingItem, NewWatchItem};
use serde_json::json;

pub async fn run(cmd: ContinueCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        ContinueCommands::List => list(ctx, output),
        ContinueCommands::Add { kind, id, title, poster, season, episode, episode_title, dub, progress } => {
            let item = build_item(kind, id, title, season, episode, dub)?.with_poster(poster);
            let item = match episode_title {
                Some(episode_title) => item.with_episode_title(episode_title),
                None => item,
            };
            let item = match progress {
                Some(progress) => item.with_progress(progress),
                None => item,
            };
            add(item, ctx, output)
        }
        ContinueCommands::Remove { id } => {
            report(ctx.repo.remove(&id), output);
            output.success(format!("Removed {} from continue watching", id));
            Ok(())
        }
        ContinueCommands::Next { id } => next(&id, ctx, output),
        ContinueCommands::Clear => {
            report(ctx.repo.clear_all(), output);
            output.success("Continue watching cleared");
            Ok(())
        }
    }
}

fn build_item(
    kind: KindArg,
    id: u64,
    title: String,
    season: Option<u32>,
    episode: Option<u32>,
    dub: bool,
) -> Result<NewWatchItem> {
    let item = match kind {
        KindArg::Movie => NewWatchItem::movie(id, title),
        KindArg::Tv => match (season, episode) {
            (Some(season), Some(episode)) => NewWatchItem::tv(id, title, season, episode),
            _ => return Err(color_eyre::eyre::eyre!("--season and --episode are required for tv")),
        },
        KindArg::Anime => match episode {
            Some(episode) => NewWatchItem::anime(id, title, episode, dub),
            None => return Err(color_eyre::eyre::eyre!("--episode is required for anime")),
        },
    };
    Ok(item)
}

fn add(item: NewWatchItem, ctx: &AppContext, output: &Output) -> Result<()> {
    let title = item.title.clone();
    match report(ctx.repo.add_or_update(item), output) {
        Some(id) => {
            if output.is_human() {
                output.success(format!("Watching '{}' ({})", title, id));
            } else {
                output.data(&json!({ "id": id, "title": title }));
            }
        }
        None => output.error(format!("'{}' was not recorded", title)),
    }
    Ok(())
}

fn describe_episode(item: &ContinueWatchingItem) -> String {
    match (item.season, item.episode) {
        (Some(season), Some(episode)) => format!("S{}E{}", season, episode),
        (None, Some(episode)) => format!("E{}", episode),
        _ => "-".to_string(),
    }
}

fn list(ctx: &AppContext, output: &Output) -> Result<()> {
    let items = report(ctx.repo.list_continue_watching(), output);
    let rows = items
        .iter()
        .map(|item| {
            vec![
                item.id.clone(),
                item.kind.to_string(),
                item.title.clone(),
                describe_episode(item),
                or_dash(item.progress.map(|p| format!("{:.0}%", p))),
                chrono::DateTime::from_timestamp_millis(item.last_watched)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();

    output.table(
        "Continue watching",
        &["Id", "Type", "Title", "Episode", "Progress", "Last watched"],
        rows,
        &items,
    );
    Ok(())
}

fn next(id: &str, ctx: &AppContext, output: &Output) -> Result<()> {
    let items = report(ctx.repo.list_continue_watching(), output);
    let item = items
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| color_eyre::eyre::eyre!("No continue watching entry with id {}", id))?;

    match WatchStateRepository::<super::Backend>::next_episode(item) {
        Some((season, episode)) => {
            if output.is_human() {
                output.info(format!("Next up for '{}': S{}E{}", item.title, season, episode));
            } else {
                output.data(&json!({ "id": item.id, "season": season, "episode": episode }));
            }
        }
        None => output.warn(format!("'{}' has no next episode", item.title)),
    }
    Ok(())
}
