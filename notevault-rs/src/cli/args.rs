//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notevault")]
#[command(author, version, about = "Markdown notes on disk, indexed in memory", long_about = None)]
pub struct Cli {
    /// Path to the vault (overrides config default)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes in the vault
    List(ListArgs),

    /// Show a single note
    Show(ShowArgs),

    /// Create a new note
    Create(CreateArgs),

    /// Change fields of an existing note
    Update(UpdateArgs),

    /// Delete a note and its file
    Delete(DeleteArgs),

    /// Search titles, bodies and tags
    Search(SearchArgs),

    /// List every known tag
    Tags,

    /// Keep the index in sync with the vault directory
    Watch(WatchArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortField {
    #[default]
    Title,
    Path,
    Created,
    Modified,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only notes with this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only pinned notes
    #[arg(long)]
    pub pinned: bool,

    /// Include archived notes
    #[arg(long)]
    pub archived: bool,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortField::Title)]
    pub sort: SortField,

    /// Reverse the sort order
    #[arg(long)]
    pub reverse: bool,

    /// Maximum number of notes to print
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Note path relative to the vault (extension optional)
    pub path: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Note title
    #[arg(long)]
    pub title: String,

    /// Body text (read from stdin when omitted and stdin is piped)
    #[arg(long)]
    pub content: Option<String>,

    /// Tag to attach (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Explicit path instead of one derived from the title
    #[arg(long)]
    pub path: Option<String>,

    /// Color label
    #[arg(long)]
    pub color: Option<String>,

    /// Pin the note
    #[arg(long)]
    pub pinned: bool,

    /// Print the file that would be written without writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Note path relative to the vault (extension optional)
    pub path: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    /// Tag to add (repeatable)
    #[arg(long = "add-tag")]
    pub add_tags: Vec<String>,

    /// Tag to remove (repeatable)
    #[arg(long = "remove-tag")]
    pub remove_tags: Vec<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long, conflicts_with = "unpin")]
    pub pin: bool,

    #[arg(long)]
    pub unpin: bool,

    #[arg(long, conflicts_with = "unarchive")]
    pub archive: bool,

    #[arg(long)]
    pub unarchive: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Note path relative to the vault (extension optional)
    pub path: String,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive text to look for
    pub query: String,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Stop after this many seconds (runs until killed otherwise)
    #[arg(long)]
    pub seconds: Option<u64>,

    /// Override the configured interval between passes
    #[arg(long)]
    pub interval_ms: Option<u64>,
}
