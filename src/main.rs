use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use genrecli::{cli, config, engine::AnalysisKind, error, utils};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Connect your Spotify account through the analysis service
    Auth,

    /// Forget the cached login
    Logout,

    /// Start a new analysis
    Analyze(AnalyzeOptions),

    /// List past analyses
    History,

    /// Show the genre breakdown of an analysis
    Result(ResultOptions),

    /// Pick genres and tracks interactively
    Select(ResultOptions),

    #[clap(about = "Create playlists from an analysis")]
    Playlist(PlaylistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeOptions {
    #[command(subcommand)]
    pub target: AnalyzeTarget,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AnalyzeTarget {
    /// Analyse your liked songs
    Liked,

    /// Analyse a playlist by URL or id
    Playlist {
        /// Spotify playlist URL or id
        playlist: String,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct ResultOptions {
    /// Analysis id
    analysis_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Analysis id
    analysis_id: String,

    /// Genre to include; can be repeated
    #[clap(long = "genre", action = ArgAction::Append)]
    genres: Vec<String>,

    /// Track id to leave out; can be repeated
    #[clap(long = "exclude", action = ArgAction::Append)]
    excludes: Vec<String>,

    /// Route an unclassified track to a genre (TRACK=GENRE); can be repeated
    #[clap(
        long = "assign",
        value_parser = utils::parse_assignment,
        action = ArgAction::Append
    )]
    assignments: Vec<(String, String)>,

    /// Create one playlist per genre instead
    #[clap(long, conflicts_with_all = ["genres", "excludes", "assignments"])]
    all: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Logout => cli::logout().await,
        Command::Analyze(opt) => match opt.target {
            AnalyzeTarget::Liked => cli::analyze(AnalysisKind::Liked).await,
            AnalyzeTarget::Playlist { playlist } => match utils::extract_playlist_id(&playlist) {
                Some(id) => cli::analyze(AnalysisKind::Playlist(id)).await,
                None => error!("A playlist URL or id is required."),
            },
        },
        Command::History => cli::history().await,
        Command::Result(opt) => cli::result(opt.analysis_id).await,
        Command::Select(opt) => cli::select(opt.analysis_id).await,
        Command::Playlist(opt) => {
            cli::playlist(
                opt.analysis_id,
                opt.genres,
                opt.excludes,
                opt.assignments,
                opt.all,
            )
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
