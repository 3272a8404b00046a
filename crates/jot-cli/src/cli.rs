use clap::{Parser, Subcommand, ValueEnum};
use jot_core::notes::SortMode;

/// CLI surface definition.
#[derive(Parser, Debug)]
#[command(
    name = "jot",
    about = "Local-first personal notes with accounts",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Optional subcommand; defaults to the notes TUI when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Browse the current user's notes in a read-only TUI (q or Esc exits).
    Tui,
    /// Create an account and log in.
    Signup {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log in as an existing user.
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// End the current session.
    Logout,
    /// Print the logged-in username, if any.
    Whoami,
    /// Manage notes (requires a session).
    #[command(subcommand)]
    Note(NoteCommand),
    /// Print version and exit.
    Version,
    /// Run a health check against the storage backend.
    Health,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum NoteCommand {
    /// List notes, optionally filtered and re-ordered.
    List {
        /// Case-insensitive substring matched against title or body.
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value = "newest")]
        sort: SortArg,
    },
    /// Create a note.
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        body: String,
        /// Local file reference; stored verbatim, never validated.
        #[arg(long)]
        image: Option<String>,
    },
    /// Change fields of an existing note.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long, conflicts_with = "remove_image")]
        image: Option<String>,
        /// Detach the image from the note.
        #[arg(long)]
        remove_image: bool,
    },
    /// Delete a note. Succeeds even when the id does not exist.
    Rm { id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}

/// Sort orders as spelled on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Newest,
    Oldest,
    Az,
    Za,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SortMode::NewestFirst,
            SortArg::Oldest => SortMode::OldestFirst,
            SortArg::Az => SortMode::TitleAsc,
            SortArg::Za => SortMode::TitleDesc,
        }
    }
}
