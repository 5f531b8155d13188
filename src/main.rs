use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tidalshift::{
    cli, config, error,
    types::{Account, Selection},
    utils,
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
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in to a TIDAL account with the device-code flow
    Login(LoginOptions),

    /// Export the source library into the data directory
    Export(SelectionOptions),

    /// Import the exported library into the destination account
    Import(SelectionOptions),

    /// Export from the source account and import into the destination account
    Transfer(SelectionOptions),

    /// Remove library content from the source account
    Delete(DeleteOptions),

    /// Show export files and the last failure count
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginOptions {
    /// Which account to log in
    #[clap(long, value_enum)]
    pub account: Account,
}

#[derive(Parser, Debug, Clone)]
pub struct SelectionOptions {
    /// Include favorite tracks
    #[clap(long)]
    pub tracks: bool,

    /// Include favorite albums
    #[clap(long)]
    pub albums: bool,

    /// Include followed artists
    #[clap(long)]
    pub artists: bool,

    /// Include playlists
    #[clap(long)]
    pub playlists: bool,

    /// Include every category (the default when no flag is given)
    #[clap(long)]
    pub all: bool,
}

impl SelectionOptions {
    fn selection(&self) -> Selection {
        utils::selection_from_flags(
            self.tracks,
            self.albums,
            self.artists,
            self.playlists,
            self.all,
        )
    }

    fn is_explicit(&self) -> bool {
        self.all || self.tracks || self.albums || self.artists || self.playlists
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteOptions {
    #[clap(flatten)]
    pub selection: SelectionOptions,

    /// Skip the confirmation prompt
    #[clap(long)]
    pub yes: bool,
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
        Command::Login(opt) => cli::login(opt.account).await,
        Command::Export(opt) => cli::export(opt.selection()).await,
        Command::Import(opt) => cli::import(opt.selection()).await,
        Command::Transfer(opt) => cli::transfer(opt.selection()).await,
        Command::Delete(opt) => {
            // deleting everything must be asked for explicitly
            let selection = if opt.selection.is_explicit() {
                opt.selection.selection()
            } else {
                Selection::default()
            };
            cli::delete(selection, opt.yes).await
        }
        Command::Info => cli::info().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
