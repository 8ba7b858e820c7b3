use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{clear, config, continue_watching, favorite, player, prefs, recent, watchlist};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "lunastream")]
#[command(about = "LunaStream - track what you watch and where to watch it")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Use this directory for config, data and logs instead of the platform default
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Movie,
    Tv,
    Anime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FavoriteKindArg {
    Movie,
    Show,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EmbedTypeArg {
    Movie,
    Tv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the "continue watching" list
    #[command(name = "continue")]
    Continue {
        #[command(subcommand)]
        cmd: ContinueCommands,
    },
    /// Manage favorite movies and shows
    Favorite {
        #[command(subcommand)]
        cmd: FavoriteCommands,
    },
    /// Movies and shows that were started from the player
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },
    /// Recently viewed movies, shows and episodes
    Recent {
        #[command(subcommand)]
        cmd: RecentCommands,
    },
    /// Embed providers, player URLs and playback sessions
    Player {
        #[command(subcommand)]
        cmd: PlayerCommands,
    },
    /// UI preference flags
    Prefs {
        #[command(subcommand)]
        cmd: PrefsCommands,
    },
    /// Show or initialise the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear stored watch state
    #[command(long_about = "Clear stored watch state. Use --continue-watching, --recent, --favorites, --watchlist or --progress to pick what to clear, or --all to clear everything.")]
    Clear {
        /// Clear everything
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear the continue watching list
        #[arg(long, action = ArgAction::SetTrue)]
        continue_watching: bool,

        /// Clear recently viewed movies, shows and episodes
        #[arg(long, action = ArgAction::SetTrue)]
        recent: bool,

        /// Clear favorite movies and shows
        #[arg(long, action = ArgAction::SetTrue)]
        favorites: bool,

        /// Clear the movie and show watchlist
        #[arg(long, action = ArgAction::SetTrue)]
        watchlist: bool,

        /// Clear provider watch progress
        #[arg(long, action = ArgAction::SetTrue)]
        progress: bool,
    },
}

#[derive(Subcommand)]
pub enum ContinueCommands {
    /// List entries, most recently watched first
    List,
    /// Record that a title or episode is being watched
    Add {
        #[arg(long = "type", value_enum)]
        kind: KindArg,

        /// TMDB id (movies and tv) or AniList id (anime)
        #[arg(long)]
        id: u64,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        poster: String,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,

        #[arg(long)]
        episode_title: Option<String>,

        /// Dubbed audio (anime only)
        #[arg(long, action = ArgAction::SetTrue)]
        dub: bool,

        /// Watched percentage, 0-100
        #[arg(long)]
        progress: Option<f64>,
    },
    /// Remove one entry by id (e.g. tv-7-s1-e2)
    Remove { id: String },
    /// Show the episode after a tv entry
    Next { id: String },
    /// Remove every entry
    Clear,
}

#[derive(Subcommand)]
pub enum FavoriteCommands {
    List {
        #[arg(long, value_enum)]
        kind: FavoriteKindArg,
    },
    Add {
        #[arg(long, value_enum)]
        kind: FavoriteKindArg,

        #[arg(long)]
        id: u64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        poster_path: Option<String>,

        /// Release date (movies) or first air date (shows)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        vote_average: Option<f64>,
    },
    Remove {
        #[arg(long, value_enum)]
        kind: FavoriteKindArg,

        #[arg(long)]
        id: u64,
    },
    /// Tell whether the id is a favorite
    Check {
        #[arg(long, value_enum)]
        kind: FavoriteKindArg,

        #[arg(long)]
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    List {
        #[arg(long, value_enum)]
        kind: FavoriteKindArg,
    },
    Remove {
        #[arg(long, value_enum)]
        kind: FavoriteKindArg,

        #[arg(long)]
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum RecentCommands {
    List,
    /// Record a movie page view
    Movie {
        #[arg(long)]
        id: u64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        poster_path: Option<String>,

        #[arg(long)]
        release_date: Option<String>,
    },
    /// Record a show page view
    Show {
        #[arg(long)]
        id: u64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        poster_path: Option<String>,
    },
    /// Record an episode view under its show
    Episode {
        #[arg(long)]
        show_id: u64,

        #[arg(long)]
        show_name: String,

        #[arg(long)]
        season: u32,

        #[arg(long)]
        episode: u32,

        #[arg(long, default_value = "")]
        name: String,
    },
    Clear,
}

#[derive(Subcommand)]
pub enum PlayerCommands {
    /// List available embed providers
    Providers,
    /// Print the embed URL for a title
    Url {
        /// Provider id; unknown ids use the default provider
        #[arg(long)]
        provider: Option<String>,

        #[arg(long = "type", value_enum)]
        media_type: EmbedTypeArg,

        #[arg(long)]
        id: u64,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,
    },
    /// Open a playback session and feed it player messages
    #[command(long_about = "Open a playback session: records the title in continue watching, recently viewed and the watchlist, prints the embed URL and attaches the message listener. Player messages are read as one JSON value per line from --messages, or from stdin when --messages is '-'. The session closes when the input ends.")]
    Watch {
        #[arg(long)]
        provider: Option<String>,

        #[arg(long = "type", value_enum)]
        media_type: EmbedTypeArg,

        #[arg(long)]
        id: u64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,

        #[arg(long)]
        episode_title: Option<String>,

        #[arg(long, default_value = "")]
        poster: String,

        /// Release date (movies) or first air date (shows)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        vote_average: Option<f64>,

        /// File of newline-delimited JSON messages, '-' for stdin
        #[arg(long, value_name = "FILE")]
        messages: Option<PathBuf>,
    },
    /// Show recorded provider progress
    Progress { id: Option<String> },
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    Show,
    Set {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        #[arg(long)]
        welcome_animation: Option<bool>,

        #[arg(long)]
        sandbox_protection: Option<bool>,
    },
    Reset,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = commands::path_manager(cli.home.clone());
    let app_config = commands::load_config(&paths)?;

    logging::init_logging(cli.verbose, cli.quiet, &app_config.logging)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let context = || commands::AppContext::open(&paths, &app_config);
    match cli.command {
        Commands::Config { cmd } => config::run_config(cmd, &paths, &app_config, &output).await,
        Commands::Continue { cmd } => continue_watching::run(cmd, &context(), &output).await,
        Commands::Favorite { cmd } => favorite::run(cmd, &context(), &output).await,
        Commands::Watchlist { cmd } => watchlist::run(cmd, &context(), &output).await,
        Commands::Recent { cmd } => recent::run(cmd, &context(), &output).await,
        Commands::Player { cmd } => player::run(cmd, &context(), &output).await,
        Commands::Prefs { cmd } => prefs::run(cmd, &context(), &output).await,
        Commands::Clear { all, continue_watching, recent, favorites, watchlist, progress } => {
            let selection = clear::Selection { all, continue_watching, recent, favorites, watchlist, progress };
            clear::run_clear(selection, &context(), &output).await
        }
    }
}
