//! CLI module
//!
//! Command-line interface for running the paginators over a synthetic
//! numeric source.
//!
//! # Commands
//!
//! - `core` - Select items with the offset/limit paginator
//! - `windowed` - Select items through a paged query descriptor
//! - `top` - Fetch a numbered page from a top-window source
//! - `validate` - Validate a configuration file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
