pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "panreel")]
#[command(about = "Render a crawler log into a paginated movie report", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/panreel/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of concurrent poster fetches
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch posters and write the HTML report
    Report(ReportArgs),
    /// Print the parsed records without touching the network
    List(ListArgs),
    /// Delete expired poster cache entries
    Sweep {
        /// Cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
pub struct ListArgs {
    /// Crawler log to read
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Link checker log
    #[arg(long)]
    pub status_log: Option<PathBuf>,

    /// Transfer task log with policy removals
    #[arg(long)]
    pub violation_log: Option<PathBuf>,
}

#[derive(Args, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub inputs: ListArgs,

    /// HTML output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Poster cache directory
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Cards per page
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl Cli {
    /// Layer command-line flags over file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.scraper.max_concurrency = workers;
        }

        match &self.command {
            Commands::Report(args) => {
                args.inputs.apply(config);
                if let Some(output) = &args.output {
                    config.report.output_path = output.clone();
                }
                if let Some(dir) = &args.cache_dir {
                    config.cache.dir = dir.clone();
                }
                if let Some(page_size) = args.page_size {
                    config.report.page_size = page_size;
                }
            }
            Commands::List(args) => args.apply(config),
            Commands::Sweep { cache_dir } => {
                if let Some(dir) = cache_dir {
                    config.cache.dir = dir.clone();
                }
            }
        }
    }
}

impl ListArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(log) = &self.log {
            config.report.log_path = log.clone();
        }
        if let Some(path) = &self.status_log {
            config.report.status_log_path = path.clone();
        }
        if let Some(path) = &self.violation_log {
            config.report.violation_log_path = path.clone();
        }
    }
}
