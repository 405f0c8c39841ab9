//! Identikit CLI - Sketch composition from the terminal
//!
//! Lists the asset catalog, composes a sketch from layer arguments and
//! exports it as PNG or JPEG.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::compose::{ComposeOptions, LayerArg};

/// Identikit - compose face sketches from feature assets
#[derive(Parser)]
#[command(name = "identikit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog categories and assets
    Catalog {
        /// Asset directory to scan (defaults to the built-in catalog)
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// List every asset, not just category sizes
        #[arg(short, long)]
        full: bool,
    },

    /// Compose a sketch and export it
    Compose {
        /// Layer, bottom first: `asset[@x,y[,width[,rotation]]]`
        #[arg(short, long = "layer", required = true)]
        layers: Vec<LayerArg>,

        /// Asset directory (`<dir>/<category>/<name>.png`)
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// Export format
        #[arg(short, long, default_value = "png")]
        format: identikit_core::ExportFormat,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Hide the template overlay
        #[arg(long)]
        no_template: bool,

        /// Template overlay opacity (0-1)
        #[arg(long)]
        template_opacity: Option<f32>,

        /// Use a catalog asset as the template image
        #[arg(long)]
        template_image: Option<String>,

        /// Paint the template into the exported bitmap
        #[arg(long)]
        include_template: bool,

        /// Print the artboard snapshot as JSON instead of exporting
        #[arg(long)]
        dump_json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the built-in defaults, ignoring any config file
        #[arg(long)]
        defaults: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(!cli.no_color)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Catalog { assets, full } => {
            commands::catalog::run(assets.as_deref(), full)?;
        }

        Commands::Compose {
            layers,
            assets,
            format,
            output,
            config,
            no_template,
            template_opacity,
            template_image,
            include_template,
            dump_json,
        } => {
            let options = ComposeOptions {
                layers,
                assets,
                format,
                output,
                config,
                no_template,
                template_opacity,
                template_image,
                include_template,
                dump_json,
            };
            commands::compose::run(options).await?;
        }

        Commands::Config { config, defaults } => {
            commands::config::run(config.as_deref(), defaults)?;
        }
    }

    Ok(())
}
