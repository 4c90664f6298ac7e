//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Post-filter pagination over a synthetic source of the numbers `1..=size`
#[derive(Parser, Debug)]
#[command(name = "siftpage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Paginator configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of items in the synthetic source
    #[arg(long, global = true, default_value = "100")]
    pub size: usize,

    /// Keep only multiples of this number
    #[arg(short, long, global = true, default_value = "3")]
    pub match_every: usize,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select filtered items by offset and limit
    Core {
        /// Filtered items to skip
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Filtered items to return
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Select filtered items through a paged query descriptor
    Windowed {
        /// Filtered items to skip (a multiple of limit)
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Filtered items to return
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Fetch a numbered page from a top-window source
    Top {
        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: usize,

        /// Items per page
        #[arg(long, default_value = "10")]
        page_size: usize,
    },

    /// Validate the configuration file
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one message per line)
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_core_command() {
        let cli = Cli::parse_from(["siftpage", "--size", "50", "core", "--offset", "5", "--limit", "5"]);
        assert_eq!(cli.size, 50);
        assert_eq!(cli.match_every, 3);
        assert!(matches!(cli.command, Commands::Core { offset: 5, limit: 5 }));
    }

    #[test]
    fn test_parse_top_command_with_global_flags_after() {
        let cli = Cli::parse_from(["siftpage", "top", "--page", "2", "-f", "pretty", "-v"]);
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Top {
                page: 2,
                page_size: 10
            }
        ));
    }
}
