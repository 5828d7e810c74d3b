//! Clap derive structures for the `backoffice` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// backoffice -- admin console for users and products
#[derive(Debug, Parser)]
#[command(
    name = "backoffice",
    version,
    about = "Manage users and products from the command line",
    long_about = "Admin console for a REST backend exposing `users` and `products`\n\
        collections. Lists are filtered, sorted and paged locally; every\n\
        change is written to the backend before it shows up here.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "BACKOFFICE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "BACKOFFICE_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "BACKOFFICE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "BACKOFFICE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BACKOFFICE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage users
    #[command(alias = "u")]
    Users(RecordsArgs),

    /// Manage products
    #[command(alias = "p")]
    Products(RecordsArgs),

    /// Show user and product totals
    #[command(alias = "dash")]
    Dashboard,

    /// Sign in to the console
    Login(LoginArgs),

    /// Sign out and clear the stored session
    Logout,

    /// Show whether a session is active
    Status,

    /// View or edit the local profile page
    Profile(ProfileArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Collections ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub command: RecordsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// List records (filtered, sorted, one page)
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record
    Get {
        /// Record id
        id: String,
    },

    /// Create a record
    Add(FieldArgs),

    /// Update a record
    Edit {
        /// Record id
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: String,
    },
}

/// Filtering, sorting and paging for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive substring over the searchable columns
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Column to sort by [default: the screen's default sort]
    #[arg(long, short = 's')]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: NonZeroUsize,

    /// Rows per page [default: from profile, else 10]
    #[arg(long)]
    pub page_size: Option<NonZeroUsize>,
}

/// Field values for add/edit.
#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Set a field (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Read fields from a JSON object file
    #[arg(long, short = 'F', conflicts_with = "set")]
    pub from_file: Option<PathBuf>,
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// User name to record in the session (prompted when omitted)
    #[arg(long, short = 'u', env = "BACKOFFICE_USER")]
    pub user: Option<String>,
}

// ── Profile page ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the saved profile
    Show,

    /// Change profile fields
    Update {
        /// Set a field: username, email, bio, image (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Show or set the console language (en, ru, uz)
    Language {
        /// Language code; omit to print the current one
        code: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
