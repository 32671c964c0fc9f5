//! Command-line interface definitions for richdoc

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the toc command
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum TocFormat {
    /// Nested JSON entries
    Json,
    /// Indented plain-text outline
    #[default]
    Text,
}

/// CLI structure for the richdoc application
#[derive(Parser)]
#[command(name = "richdoc")]
#[command(version)]
#[command(about = "Render rich documents (document trees or Markdown) to HTML", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for richdoc
#[derive(Subcommand)]
pub enum Commands {
    /// Render one document to an HTML fragment or page
    Render {
        /// Input file, or "-" to read from stdin
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to ./richdoc.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Wrap the fragment in a standalone HTML page
        #[arg(long)]
        page: bool,

        /// Highlight code blocks before writing
        #[arg(long)]
        highlight: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the table of contents of a document
    Toc {
        /// Input file, or "-" to read from stdin
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: TocFormat,

        /// Configuration file (defaults to ./richdoc.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Render every document under a directory to HTML pages
    Build {
        /// Input directory (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "html")]
        output: PathBuf,

        /// Configuration file (defaults to richdoc.toml in the input directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a default richdoc.toml
    InitConfig {
        /// File to write (defaults to ./richdoc.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            Commands::Render { verbose, .. }
            | Commands::Toc { verbose, .. }
            | Commands::Build { verbose, .. }
            | Commands::InitConfig { verbose, .. } => *verbose,
        }
    }
}
