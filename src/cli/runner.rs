//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PaginatorConfig;
use crate::error::{Error, Result};
use crate::pagination::{
    CorePaginator, FetchRequest, IdentityMap, Predicate, QueryDescriptor, TopRequest,
    TopWindowPaginator, WindowedQueryPaginator,
};
use crate::types::Top;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Core { offset, limit } => self.core(*offset, *limit),
            Commands::Windowed { offset, limit } => self.windowed(*offset, *limit),
            Commands::Top { page, page_size } => self.top(*page, *page_size),
            Commands::Validate => self.validate(),
        }
    }

    /// Load configuration, falling back to defaults without a file
    fn load_config(&self) -> Result<PaginatorConfig> {
        match &self.cli.config {
            Some(path) => {
                let config = PaginatorConfig::load(path)?;
                config.validate()?;
                Ok(config)
            }
            None => Ok(PaginatorConfig::default()),
        }
    }

    /// Synthetic source data
    fn source(&self) -> Vec<usize> {
        (1..=self.cli.size).collect()
    }

    /// Filter keeping multiples of `--match-every`
    fn filter(&self) -> Result<Predicate<impl Fn(&usize) -> bool + Copy>> {
        let every = self.cli.match_every;
        if every == 0 {
            return Err(Error::invalid_argument("match_every", "must be at least 1"));
        }
        Ok(Predicate(move |n: &usize| n % every == 0))
    }

    /// Select with the offset/limit paginator
    fn core(&self, offset: usize, limit: usize) -> Result<()> {
        let config = self.load_config()?;
        let data = self.source();
        let retriever = |request: &FetchRequest| -> Result<Vec<usize>> {
            debug!(offset = request.offset, limit = request.limit, "Synthetic retrieval");
            Ok(data
                .iter()
                .skip(request.offset)
                .take(request.limit)
                .copied()
                .collect())
        };

        let paginator = CorePaginator::new(retriever, self.filter()?).with_config(&config)?;
        let start = Instant::now();
        let selection = paginator.select_with_stats(offset, limit)?;
        info!(
            rounds = selection.stats.rounds,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Core selection complete"
        );

        self.output_message(&json!({
            "type": "SELECTION",
            "offset": offset,
            "limit": limit,
            "items": selection.items,
            "stats": selection.stats,
        }));
        Ok(())
    }

    /// Select through a paged query descriptor, tracking every retrieved item
    fn windowed(&self, offset: usize, limit: usize) -> Result<()> {
        let config = self.load_config()?;
        let data = self.source();
        let retriever = |query: &QueryDescriptor, _request: &FetchRequest| -> Result<Vec<usize>> {
            debug!(query = %query, "Synthetic query");
            Ok(data
                .iter()
                .skip(query.offset())
                .take(query.page_size)
                .copied()
                .collect())
        };

        let paginator =
            WindowedQueryPaginator::new(retriever, self.filter()?).with_config(&config)?;
        let mut query = QueryDescriptor::new("numbers");
        let mut tracker = IdentityMap::new(|n: &usize| *n);
        let selection = paginator.select_with_stats(&mut query, &mut tracker, offset, limit)?;
        info!(
            rounds = selection.stats.rounds,
            tracked = tracker.len(),
            "Windowed selection complete"
        );

        self.output_message(&json!({
            "type": "SELECTION",
            "offset": offset,
            "limit": limit,
            "items": selection.items,
            "stats": selection.stats,
            "query": query,
            "tracked": tracker.len(),
        }));
        Ok(())
    }

    /// Fetch a numbered page from a top-window source
    fn top(&self, page_number: usize, page_size: usize) -> Result<()> {
        let config = self.load_config()?;
        let data = self.source();
        let source = |request: &TopRequest| -> Result<Top<usize>> {
            debug!(window = request.window, "Synthetic top window");
            Ok(Top::from_slice(&data, request.window))
        };

        let paginator =
            TopWindowPaginator::new(source, self.filter()?, page_size)?.with_config(&config)?;
        let (page, stats) = paginator.get_page_with_stats(page_number)?;
        info!(
            rounds = stats.rounds,
            total = page.total_unfiltered_items,
            "Top page complete"
        );

        let total_pages = page.total_pages();
        self.output_message(&json!({
            "type": "PAGE",
            "page": page,
            "total_pages": total_pages,
            "stats": stats,
        }));
        Ok(())
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Configuration file not specified (use -C flag)"))?;
        let config = self.load_config()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Configuration '{}' is valid", path.display()),
            },
            "config": config,
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
