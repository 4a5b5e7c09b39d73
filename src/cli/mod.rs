//! Command-line interface for esdump
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Shell completion generation

use clap::{CommandFactory, Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{EsdumpError, Result};

/// esdump - dump and restore collections of a document store
#[derive(Parser, Debug)]
#[command(
    name = "esdump",
    version,
    about = "Dump and restore tool for Elasticsearch-compatible stores",
    long_about = "Snapshots a remote document collection to compressed chunk archives on
local disk and reloads them later, preserving schema and data fidelity."
)]
pub struct CliArgs {
    /// Store endpoint as host:port (may be given multiple times)
    #[arg(long = "host", value_name = "HOST:PORT")]
    pub hosts: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (debug logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for esdump
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dump a collection into a local directory
    Dump {
        /// Collection to export
        #[arg(value_name = "COLLECTION")]
        collection: String,

        /// Directory receiving the dump (created if absent)
        #[arg(value_name = "DIR")]
        output: PathBuf,

        /// Document kind label
        #[arg(long, value_name = "NAME", default_value = "_doc")]
        doc_type: String,

        /// JSON file holding the search query; matches everything when omitted
        #[arg(long, value_name = "FILE")]
        query_file: Option<PathBuf>,

        /// Keep store-assigned metadata with every document
        #[arg(long)]
        raw: bool,

        /// Hits requested per scroll page
        #[arg(long, value_name = "COUNT")]
        page_size: Option<u32>,

        /// Documents stored per chunk archive
        #[arg(long, value_name = "COUNT")]
        docs_per_chunk: Option<usize>,
    },

    /// Restore a dump directory into a collection
    Restore {
        /// Directory holding a previous dump
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Target collection
        #[arg(value_name = "COLLECTION")]
        collection: String,

        /// Document kind label
        #[arg(long, value_name = "NAME", default_value = "_doc")]
        doc_type: String,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// Parses arguments, loads the configuration and applies the
    /// command-line overrides that take precedence over file values.
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Build the interface from already-parsed arguments.
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let mut config = Config::load(args.config_file.as_deref())?;

        if !args.hosts.is_empty() {
            config.store.hosts = args.hosts.clone();
        }
        if let Some(timeout) = args.timeout {
            config.store.timeout = timeout;
        }
        if let Commands::Dump {
            raw,
            page_size,
            docs_per_chunk,
            ..
        } = &args.command
        {
            if *raw {
                config.dump.raw = true;
            }
            if let Some(page_size) = page_size {
                config.dump.page_size = *page_size;
            }
            if let Some(docs_per_chunk) = docs_per_chunk {
                config.dump.docs_per_chunk = *docs_per_chunk;
            }
        }
        config.validate()?;

        Ok(Self { args, config })
    }

    /// Get parsed arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Get effective configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Effective log level from verbosity flags and configuration.
    pub fn log_level(&self) -> tracing::Level {
        if self.args.quiet {
            tracing::Level::ERROR
        } else if self.args.very_verbose {
            tracing::Level::DEBUG
        } else if self.args.verbose {
            tracing::Level::INFO
        } else {
            self.config.logging.level.to_tracing_level()
        }
    }

    /// Handle the completion subcommand, if given
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand was handled and the
    ///   process should exit
    pub fn handle_completion(&self) -> Result<bool> {
        if let Commands::Completion { shell } = &self.args.command {
            let shell: clap_complete::Shell = shell
                .parse()
                .map_err(|_| EsdumpError::Generic(format!("Unsupported shell: {shell}")))?;
            let mut command = CliArgs::command();
            clap_complete::generate(shell, &mut command, "esdump", &mut io::stdout());
            return Ok(true);
        }
        Ok(false)
    }
}
