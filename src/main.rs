use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotlist::{
    cli,
    config::{self, Config, ConfigOverrides},
    error, warning,
};

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
    #[clap(flatten)]
    credentials: CredentialOptions,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Create a playlist from a song list
    #[clap(after_help = "File format: each line should be\n  Song Name – Movie/Artist Name")]
    Create(SongListOptions),

    /// Show which track every song would match
    Preview(PreviewOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct CredentialOptions {
    /// Spotify application client id (overrides SPOTIFY_API_AUTH_CLIENT_ID)
    #[clap(long, global = true)]
    client_id: Option<String>,

    /// Spotify application client secret (overrides SPOTIFY_API_AUTH_CLIENT_SECRET)
    #[clap(long, global = true)]
    client_secret: Option<String>,

    /// OAuth redirect URI (overrides SPOTIFY_API_REDIRECT_URI)
    #[clap(long, global = true)]
    redirect_uri: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SongListOptions {
    /// Text file with one `Song – Artist` line per song
    #[clap(required_unless_present = "manual")]
    song_file: Option<PathBuf>,

    /// Playlist name, defaults to the file name with underscores as spaces
    playlist_name: Option<String>,

    /// Create a private playlist
    #[clap(long)]
    private: bool,

    /// Read song lines from standard input; lines without a separator are
    /// searched by title only
    #[clap(long, conflicts_with = "song_file")]
    manual: bool,

    /// Playlist name when reading from standard input
    #[clap(long, requires = "manual")]
    name: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewOptions {
    #[clap(flatten)]
    songs: SongListOptions,

    /// Create the playlist from the previewed matches
    #[clap(long)]
    create: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

/// The positional name only parses next to a song file and `--name` only
/// parses with `--manual`, so at most one of the two is ever set.
impl From<SongListOptions> for cli::RunOptions {
    fn from(opt: SongListOptions) -> Self {
        cli::RunOptions {
            song_file: opt.song_file,
            playlist_name: opt.name.or(opt.playlist_name),
            public: !opt.private,
            manual: opt.manual,
        }
    }
}

fn load_config(credentials: CredentialOptions) -> Config {
    let overrides = ConfigOverrides {
        client_id: credentials.client_id,
        client_secret: credentials.client_secret,
        redirect_uri: credentials.redirect_uri,
    };

    match Config::from_env(&overrides) {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth(&load_config(cli.credentials)).await,
        Command::Create(opt) => cli::create(load_config(cli.credentials), opt.into()).await,
        Command::Preview(opt) => {
            cli::preview(load_config(cli.credentials), opt.songs.into(), opt.create).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_options(args: &[&str]) -> cli::RunOptions {
        match Cli::try_parse_from(args).unwrap().command {
            Command::Create(opt) => opt.into(),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_file_with_positional_name() {
        let opts = run_options(&["spotlist", "create", "songs.txt", "Road Trip", "--private"]);
        assert_eq!(opts.song_file, Some(PathBuf::from("songs.txt")));
        assert_eq!(opts.playlist_name.as_deref(), Some("Road Trip"));
        assert!(!opts.public);
        assert!(!opts.manual);
    }

    #[test]
    fn test_manual_takes_name_flag() {
        let opts = run_options(&["spotlist", "create", "--manual", "--name", "Road Trip"]);
        assert_eq!(opts.song_file, None);
        assert_eq!(opts.playlist_name.as_deref(), Some("Road Trip"));
        assert!(opts.public);
        assert!(opts.manual);
    }

    #[test]
    fn test_manual_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["spotlist", "create", "--manual", "Road Trip"]).is_err());
    }

    #[test]
    fn test_name_flag_requires_manual() {
        assert!(
            Cli::try_parse_from(["spotlist", "create", "songs.txt", "--name", "Road Trip"])
                .is_err()
        );
    }

    #[test]
    fn test_song_file_required_without_manual() {
        assert!(Cli::try_parse_from(["spotlist", "create"]).is_err());
    }
}
