//! Bite CLI binary.
//!
//! Provides the command-line interface for building minimum wage bite panels.

mod integration;

use bite::DefaultPipeline;
use bite::data::{BiteConfig, RawDataProvider};
use bite::output::{ExportFormat, Exporter, PanelExport, PanelSummary};
use bite::panel::IndustrySelector;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use integration::cache_manager::{clear_zone_cache, print_cache_info, resolve_config};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bite")]
#[command(about = "Quarterly minimum wage bite panels by county", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding downloads, raw extracts and the database
    #[arg(long, global = true)]
    saving_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the panel for one industry
    Panel {
        /// Industry: 31-33, 44-45, 48-49, 72-accommodation, 72-food or a NAICS prefix
        #[arg(long)]
        industry: String,

        /// Keep foreign employers instead of domestic ones
        #[arg(long)]
        foreign: bool,

        /// Write the panel to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Inspect or manage the local cache
    Cache {
        /// Show cached tables
        #[arg(long)]
        stats: bool,

        /// Drop the zone geometry cache
        #[arg(long)]
        clear: bool,

        /// Build the zone geometry cache and the raw table if absent
        #[arg(long)]
        build: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.saving_dir.as_deref())?;
    log::debug!("Saving directory: {}", config.saving_dir.display());

    match cli.command {
        Commands::Panel {
            industry,
            foreign,
            output,
            format,
        } => {
            let format: ExportFormat = format.parse()?;
            build_panel(&config, &industry, foreign, output, format).await?;
        }
        Commands::Cache {
            stats,
            clear,
            build,
        } => {
            if clear {
                clear_zone_cache(&config)?;
                println!("Zone geometry cache cleared");
            }
            if build {
                build_caches(&config).await?;
            }
            if stats || (!clear && !build) {
                print_cache_info(&config)?;
            }
        }
    }

    Ok(())
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Ok(pb)
}

async fn build_panel(
    config: &BiteConfig,
    industry: &str,
    foreign: bool,
    output: Option<PathBuf>,
    format: ExportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let selector = IndustrySelector::from(industry);
    let pipeline = DefaultPipeline::from_config(config)?;

    let pb = spinner("Building panel...")?;
    let panel = match pipeline.build_panel(&selector, foreign).await {
        Ok(panel) => {
            pb.finish_with_message(format!("Built {} area-quarters", panel.len()));
            panel
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    let export = PanelExport::new(selector.to_string(), foreign, &panel);
    let summary = PanelSummary::new(selector.to_string(), &panel);

    match output {
        Some(path) => {
            export.export_to_file(&path, format)?;
            println!("{}", summary.to_ascii_table());
            println!("Wrote {}", path.display());
        }
        None => {
            print!("{}", export.export_to_string(format)?);
            eprint!("{}", summary);
        }
    }

    Ok(())
}

async fn build_caches(config: &BiteConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = DefaultPipeline::from_config(config)?;

    let pb = spinner("Building zone geometry cache...")?;
    let built = pipeline.mapper().ensure_zone_cache().await?;
    pb.finish_with_message(if built {
        "Zone geometry cache built"
    } else {
        "Zone geometry cache already present"
    });

    let pb = spinner("Importing raw records...")?;
    pipeline.builder().cleaner().provider().ensure_raw_dataset()?;
    pb.finish_with_message("Raw table ready");

    Ok(())
}
