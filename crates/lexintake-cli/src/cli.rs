//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lexintake CLI - Batch contract intake and field extraction.
#[derive(Debug, Parser)]
#[command(name = "lexintake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload files and extract their contract fields
    Upload(UploadArgs),

    /// List stored document records
    List(ListArgs),

    /// Show or reorder the display columns
    Columns(ColumnsArgs),

    /// Ask the assistant follow-up questions interactively
    Chat,

    /// Verify the configured assistant is reachable
    Check,
}

/// Arguments for the upload command.
#[derive(Debug, Parser)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Also store the original bytes in blob storage
    #[arg(long)]
    pub blobs: bool,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Maximum number of records to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the columns command.
#[derive(Debug, Parser)]
pub struct ColumnsArgs {
    /// Move a column: source index followed by destination index
    #[arg(long = "move", num_args = 2, value_names = ["FROM", "TO"])]
    pub move_indices: Option<Vec<usize>>,
}
