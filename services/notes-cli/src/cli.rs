//! Command-line surface

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use notes_client::models::{Pagination, UserRole, UserStatus};

#[derive(Debug, Parser)]
#[command(name = "notes", version, about = "Command-line client for the notes API")]
pub struct Cli {
    /// Config file (default: $NOTES_CONFIG, then ./notes.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session tokens
    Login {
        email: String,
        #[arg(long, env = "NOTES_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Revoke the refresh token and forget the session
    Logout,
    /// Create an account
    Register {
        email: String,
        #[arg(long, env = "NOTES_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Show the logged-in user
    Whoami,
    VerifyEmail {
        token: String,
    },
    ResendVerification {
        email: String,
    },
    /// Request a password reset code by email
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: String,
        #[arg(long, env = "NOTES_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    ChangePassword {
        #[arg(long, env = "NOTES_PASSWORD", hide_env_values = true)]
        current_password: String,
        #[arg(long, env = "NOTES_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    #[command(subcommand)]
    Notes(NotesCommand),
    #[command(subcommand)]
    Search(SearchCommand),
    #[command(subcommand)]
    Qa(QaCommand),
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    #[arg(long)]
    pub skip: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

impl From<PageArgs> for Pagination {
    fn from(args: PageArgs) -> Self {
        Pagination {
            skip: args.skip,
            limit: args.limit,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum NotesCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        pinned: Option<bool>,
        #[arg(long)]
        archived: Option<bool>,
        #[arg(long)]
        sort_by: Option<String>,
    },
    Get {
        id: String,
    },
    Create {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Repeat for several tags
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Replaces all tags; repeat for several
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    /// Move a note to the trash
    Delete {
        id: String,
    },
    Restore {
        id: String,
    },
    /// Toggle pinned
    Pin {
        id: String,
    },
    /// Toggle archived
    Archive {
        id: String,
    },
    /// List trashed notes
    Trash {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Delete a note for good
    Purge {
        id: String,
    },
    Summarize {
        id: String,
    },
    SuggestTags {
        id: String,
        /// Suggest for this text instead of the stored content
        #[arg(long)]
        content: Option<String>,
    },
    /// Create a note from a file
    Upload {
        file: PathBuf,
        /// Defaults to the file name
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Fetch the original file of a note
    Download {
        id: String,
        /// Write here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SearchCommand {
    Semantic {
        query: String,
        #[arg(long)]
        top_k: Option<u32>,
    },
    Keyword {
        keywords: String,
        #[arg(long)]
        top_k: Option<u32>,
    },
    /// Index a note for semantic search
    Embed {
        id: String,
    },
    Stats {
        id: String,
    },
    /// Drop a note's embeddings
    Unembed {
        id: String,
    },
    /// Re-index every note
    Rebuild,
}

#[derive(Debug, Subcommand)]
pub enum QaCommand {
    Create {
        #[arg(long = "note", required = true)]
        note_ids: Vec<String>,
        #[arg(long)]
        title: Option<String>,
    },
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Show {
        id: String,
    },
    Rename {
        id: String,
        title: String,
    },
    Delete {
        id: String,
    },
    Ask {
        id: String,
        question: String,
    },
    Summary {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    Stats,
    Users {
        #[command(flatten)]
        page: PageArgs,
    },
    SetRole {
        user_id: String,
        role: RoleArg,
    },
    SetStatus {
        user_id: String,
        status: StatusArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    User,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::User => UserRole::User,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Active,
    Inactive,
}

impl From<StatusArg> for UserStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Active => UserStatus::Active,
            StatusArg::Inactive => UserStatus::Inactive,
        }
    }
}
