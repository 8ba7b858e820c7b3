use super::{report, AppContext};
use crate::output::{or_dash, Output};
use crate::{EmbedTypeArg, PlayerCommands};
use color_eyre::Result;
use lunastream_core::{EmbedRequest, Handled, PlaybackRequest, PlayerSession, PlayerWindow};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

fn embed_request(media_type: EmbedTypeArg, id: u64, season: Option<u32>, episode: Option<u32>) -> EmbedRequest {
    match media_type {
        EmbedTypeArg::Movie => EmbedRequest::movie(id),
        EmbedTypeArg::Tv => EmbedRequest {
            media_type: lunastream_models::EmbedMediaType::Tv,
            tmdb_id: id,
            season,
            episode,
        },
    }
}

pub async fn run(cmd: PlayerCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        PlayerCommands::Providers => providers(ctx, output),
        PlayerCommands::Url { provider, media_type, id, season, episode } => {
            let provider = provider.unwrap_or_else(|| ctx.registry.default_provider().id.to_string());
            let request = embed_request(media_type, id, season, episode);
            let url = ctx.registry.resolve(&provider, &request)?;
            if output.is_human() {
                output.info(url);
            } else {
                output.data(&json!({ "provider": ctx.registry.provider_or_default(&provider).id, "url": url }));
            }
            Ok(())
        }
        PlayerCommands::Watch {
            provider,
            media_type,
            id,
            title,
            season,
            episode,
            episode_title,
            poster,
            date,
            vote_average,
            messages,
        } => {
            let mut request = PlaybackRequest::new(embed_request(media_type, id, season, episode), title);
            request.episode_title = episode_title;
            request.poster = poster;
            request.date = date;
            request.vote_average = vote_average;
            watch(ctx, provider, request, messages, output).await
        }
        PlayerCommands::Progress { id } => progress(ctx, id, output),
    }
}

fn providers(ctx: &AppContext, output: &Output) -> Result<()> {
    let default_id = ctx.registry.default_provider().id;
    let listed: Vec<Value> = ctx
        .registry
        .providers()
        .iter()
        .map(|p| json!({ "id": p.id, "name": p.name, "default": p.id == default_id }))
        .collect();
    let rows = ctx
        .registry
        .providers()
        .iter()
        .map(|p| {
            let marker = if p.id == default_id { "*" } else { "" };
            vec![p.id.to_string(), p.name.to_string(), marker.to_string()]
        })
        .collect();
    output.table("Providers", &["Id", "Name", "Default"], rows, &listed);
    Ok(())
}

fn progress(ctx: &AppContext, id: Option<String>, output: &Output) -> Result<()> {
    let all = report(ctx.repo.all_progress(), output);
    let selected: Vec<_> = all.iter().filter(|(key, _)| id.as_ref().map_or(true, |id| id == *key)).collect();

    let rows = selected
        .iter()
        .map(|(key, entry)| {
            vec![
                key.to_string(),
                or_dash(entry.media_type()),
                chrono::DateTime::from_timestamp_millis(entry.last_updated)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    let data: serde_json::Map<String, Value> = selected
        .iter()
        .filter_map(|(key, entry)| serde_json::to_value(entry).ok().map(|v| (key.to_string(), v)))
        .collect();
    output.table("Watch progress", &["Id", "Type", "Last updated"], rows, &data);
    Ok(())
}

/// What happened to the messages fed to a player window
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    pub progress_updates: usize,
    pub player_events: usize,
    pub ignored: usize,
}

/// Post every line of `reader` to `window` as one message
///
/// Lines that aren't JSON are posted as plain strings, which the listener
/// ignores like any other foreign message.
pub async fn feed_messages<R: AsyncBufRead + Unpin>(reader: R, window: &PlayerWindow) -> Result<FeedSummary> {
    let mut summary = FeedSummary::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let raw = serde_json::from_str::<Value>(line).unwrap_or_else(|_| Value::String(line.to_string()));
        match window.post_message(&raw) {
            Handled::Progress { id } => {
                debug!("Progress message for {}", id);
                summary.progress_updates += 1;
            }
            Handled::PlayerEvent(_) => summary.player_events += 1,
            Handled::Ignored => summary.ignored += 1,
        }
    }

    Ok(summary)
}

async fn feed_from(path: &Path, window: &PlayerWindow) -> Result<FeedSummary> {
    if path == Path::new("-") {
        return feed_messages(BufReader::new(tokio::io::stdin()), window).await;
    }
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open {}: {}", path.display(), e))?;
    feed_messages(BufReader::new(file), window).await
}

async fn watch(
    ctx: &AppContext,
    provider: Option<String>,
    request: PlaybackRequest,
    messages: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let provider = provider.unwrap_or_else(|| ctx.registry.default_provider().id.to_string());
    let title = request.title.clone();

    let mut session = PlayerSession::new(ctx.repo.clone(), ctx.registry.clone());
    let (url, recorded) = session.open(&provider, request)?;
    let recorded_id = report(recorded, output);

    if output.is_human() {
        output.success(format!("Playing '{}' via {}", title, session.current_provider().unwrap_or(&provider)));
        output.info(&url);
    }

    let summary = match &messages {
        Some(path) => feed_from(path, session.window()).await?,
        None => FeedSummary::default(),
    };
    session.close();
    info!(
        progress_updates = summary.progress_updates,
        player_events = summary.player_events,
        ignored = summary.ignored,
        "Player session closed"
    );

    if output.is_human() {
        if messages.is_some() {
            output.info(format!(
                "{} progress update(s), {} player event(s), {} ignored",
                summary.progress_updates, summary.player_events, summary.ignored
            ));
        }
    } else {
        output.data(&json!({ "url": url, "continueWatchingId": recorded_id, "messages": summary }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Backend;
    use crate::output::OutputFormat;
    use lunastream_config::Config;
    use lunastream_models::FavoriteKind;
    use lunastream_core::MemoryStore;
    use std::sync::Arc;

    fn context() -> AppContext {
        let backend: Backend = Arc::new(MemoryStore::new());
        AppContext::with_backend(backend, &Config::default())
    }

    #[tokio::test]
    async fn test_feed_messages_counts_and_records() {
        let ctx = context();
        let mut session = PlayerSession::new(ctx.repo.clone(), ctx.registry.clone());
        session
            .open("videasy", PlaybackRequest::new(EmbedRequest::tv(7, 1, 2), "Show"))
            .unwrap();

        let input = concat!(
            "{\"type\":\"MEDIA_DATA\",\"data\":{\"id\":7,\"type\":\"tv\",\"progress\":{\"watched\":30}}}\n",
            "\n",
            "{\"type\":\"PLAYER_EVENT\",\"data\":{\"event\":\"pause\",\"currentTime\":30}}\n",
            "not json at all\n",
            "{\"type\":\"MEDIA_DATA\",\"data\":{\"type\":\"tv\"}}\n",
        );
        let summary = feed_messages(input.as_bytes(), session.window()).await.unwrap();

        assert_eq!(summary, FeedSummary { progress_updates: 1, player_events: 1, ignored: 2 });
        let entry = ctx.repo.progress("7").unwrap();
        assert_eq!(entry.payload["progress"]["watched"], 30);
    }

    #[tokio::test]
    async fn test_closed_session_ignores_messages() {
        let ctx = context();
        let mut session = PlayerSession::new(ctx.repo.clone(), ctx.registry.clone());
        session.open("vidify", PlaybackRequest::new(EmbedRequest::movie(42), "Heat")).unwrap();
        session.close();

        let input = "{\"type\":\"MEDIA_DATA\",\"data\":{\"id\":42,\"type\":\"movie\"}}\n";
        let summary = feed_messages(input.as_bytes(), session.window()).await.unwrap();

        assert_eq!(summary.ignored, 1);
        assert!(ctx.repo.progress("42").is_none());
    }

    #[tokio::test]
    async fn test_watch_records_playback_history() {
        let ctx = context();
        let output = Output::new(OutputFormat::Json, true);
        let mut request = PlaybackRequest::new(EmbedRequest::movie(42), "Heat");
        request.date = Some("1995-12-15".into());

        watch(&ctx, None, request, None, &output).await.unwrap();

        assert_eq!(ctx.repo.list_continue_watching().value()[0].id, "movie-42");
        assert_eq!(ctx.repo.recent_movies().value()[0].release_date.as_deref(), Some("1995-12-15"));
        assert!(ctx.repo.is_in_watchlist(FavoriteKind::Movie, 42));
    }

    #[test]
    fn test_embed_request_keeps_missing_episode() {
        let request = embed_request(EmbedTypeArg::Tv, 7, Some(1), None);
        assert_eq!(request.episode, None);
        assert!(context().registry.resolve("videasy", &request).is_err());
    }
}
