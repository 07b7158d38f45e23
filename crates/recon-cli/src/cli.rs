//! CLI argument definitions for the allocation reconciler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "alloc-recon",
    version,
    about = "Allocation reconciler - match spreadsheet exports against a dictionary",
    long_about = "Reconcile allocation spreadsheet exports against a reference dictionary.\n\n\
                  Detects store, item, and quantity columns, resolves tokens through\n\
                  exact, partial, and fuzzy matching, and can redistribute quantity\n\
                  away from excluded stores."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile an allocation export against a dictionary.
    Reconcile(ReconcileArgs),

    /// Summarize the items and stores in a dictionary file.
    Dictionary(DictionaryArgs),

    /// List or delete archived reconciliation sessions.
    Archives(ArchivesArgs),
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Path to the allocation export (CSV).
    #[arg(value_name = "EXPORT")]
    pub export: PathBuf,

    /// Path to the dictionary JSON file.
    #[arg(long = "dictionary", value_name = "FILE")]
    pub dictionary: PathBuf,

    /// Exclude a store from the reconciled views (repeatable).
    #[arg(long = "exclude", value_name = "STORE")]
    pub exclude: Vec<String>,

    /// Redistribute excluded quantity onto the remaining stores.
    #[arg(long = "redistribute", value_enum, value_name = "MODE")]
    pub redistribute: Option<RedistributeArg>,

    /// Directory to archive the session into.
    #[arg(long = "archive-dir", value_name = "DIR", requires = "save_as")]
    pub archive_dir: Option<PathBuf>,

    /// Name to archive the session under.
    #[arg(long = "save-as", value_name = "NAME", requires = "archive_dir")]
    pub save_as: Option<String>,

    /// List every match warning instead of only the count.
    #[arg(long = "show-warnings")]
    pub show_warnings: bool,
}

#[derive(Parser)]
pub struct DictionaryArgs {
    /// Path to the dictionary JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct ArchivesArgs {
    /// Archive directory to inspect.
    #[arg(long = "dir", value_name = "DIR")]
    pub dir: PathBuf,

    /// Delete the named snapshot instead of listing.
    #[arg(long = "delete", value_name = "NAME")]
    pub delete: Option<String>,
}

/// Redistribution mode choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum RedistributeArg {
    Equal,
    Rank,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
