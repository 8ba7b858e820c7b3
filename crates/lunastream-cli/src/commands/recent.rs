use super::{report, AppContext};
use crate::output::{render_table, Output};
use crate::RecentCommands;
use color_eyre::Result;
use lunastream_models::{RecentEpisode, RecentMovie, RecentShow};
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run(cmd: RecentCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        RecentCommands::List => list(ctx, output),
        RecentCommands::Movie { id, title, poster_path, release_date } => {
            let movie = RecentMovie { id, title, poster_path, release_date };
            let title = movie.title.clone();
            report(ctx.repo.record_movie_view(movie), output);
            output.success(format!("Viewed '{}'", title));
        }
        RecentCommands::Show { id, name, poster_path } => {
            let show = RecentShow { id, name, poster_path, first_air_date: None };
            let name = show.name.clone();
            report(ctx.repo.record_show_view(show), output);
            output.success(format!("Viewed '{}'", name));
        }
        RecentCommands::Episode { show_id, show_name, season, episode, name } => {
            let show = RecentShow { id: show_id, name: show_name, poster_path: None, first_air_date: None };
            let entry = RecentEpisode {
                id: None,
                name,
                season_number: season,
                episode_number: episode,
                air_date: None,
            };
            let groups = report(ctx.repo.record_episode_view(show, entry), output);
            let count = groups.get(&show_id).map(|g| g.episodes.len()).unwrap_or(0);
            output.success(format!("Viewed S{}E{} ({} recent episode(s) for show {})", season, episode, count, show_id));
        }
        RecentCommands::Clear => {
            report(ctx.repo.clear_recently_viewed(), output);
            output.success("Recently viewed cleared");
        }
    }
    Ok(())
}

fn list(ctx: &AppContext, output: &Output) {
    let movies = report(ctx.repo.recent_movies(), output);
    let shows = report(ctx.repo.recent_shows(), output);
    let episodes = report(ctx.repo.recent_episodes(), output);

    if !output.is_human() {
        output.data(&json!({ "movies": movies, "shows": shows, "episodes": episodes }));
        return;
    }

    output.table(
        "Recently viewed movies",
        &["Id", "Title"],
        movies.iter().map(|m| vec![m.id.to_string(), m.title.clone()]).collect(),
        &movies,
    );
    output.table(
        "Recently viewed shows",
        &["Id", "Name"],
        shows.iter().map(|s| vec![s.id.to_string(), s.name.clone()]).collect(),
        &shows,
    );

    if output.is_quiet() {
        return;
    }
    for group in episodes.values() {
        println!("{} {}", "Episodes of".bright_cyan(), group.show.name.bright_cyan().bold());
        let rows = group
            .episodes
            .iter()
            .map(|e| vec![format!("S{}E{}", e.season_number, e.episode_number), e.name.clone()])
            .collect();
        println!("{}", render_table(&["Episode", "Name"], rows));
    }
}
