//! Resamp CLI - Batch Image Resampler
//!
//! Assembles a file list, resolves the target geometry from flags and saved
//! preferences, and drives the batch conversion pipeline with a live
//! progress bar.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use resamp::{init, BatchPipeline, ItemRegistry, Preferences, TargetConfig};

/// Resamp - Batch Image Resampler
#[derive(Parser)]
#[command(
    name = "resamp",
    version,
    about = "Resize a batch of images to fixed dimensions as JPEG copies",
    long_about = "Resamp converts a list of images into resized JPEG copies named \
                  {name}_{width}x{height}.jpg. Files with unsupported extensions are \
                  skipped silently, a broken file never aborts the batch, and default \
                  dimensions plus a fixed output folder can be saved as preferences."
)]
struct Cli {
    /// Image files to convert (.jpg, .jpeg, .png, .bmp, .tiff)
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Target width in pixels (default: saved preference)
    #[arg(short, long, value_name = "PIXELS")]
    width: Option<u32>,

    /// Target height in pixels (default: saved preference)
    #[arg(short = 'H', long, value_name = "PIXELS")]
    height: Option<u32>,

    /// Output directory (default: saved fixed path, if enabled)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value = "90", value_name = "QUALITY")]
    quality: u8,

    /// Preferences file (default: per-user config location)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Save the effective width/height/output directory as preferences
    #[arg(long)]
    save_settings: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short = 'Q', long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", log_level);
    }
    init();

    if let Err(e) = run_cli(cli).await {
        eprintln!("{}: {}", style("Error").red().bold(), e);
        process::exit(1);
    }
}

async fn run_cli(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.quality == 0 || cli.quality > 100 {
        return Err("Quality must be between 1 and 100".into());
    }

    let settings_path = cli
        .settings
        .clone()
        .or_else(Preferences::default_path)
        .ok_or("Cannot determine a preferences location; pass --settings")?;
    let preferences = Preferences::load_or_default(&settings_path);

    let width = cli.width.unwrap_or(preferences.default_width);
    let height = cli.height.unwrap_or(preferences.default_height);

    let (output_dir, use_fixed_path) = match &cli.output {
        Some(dir) => (dir.clone(), false),
        None if preferences.use_fixed_path && !preferences.output_path.as_os_str().is_empty() => {
            (preferences.output_path.clone(), true)
        }
        None => {
            return Err(
                "No output directory: pass --output, or save a fixed path with --save-settings"
                    .into(),
            )
        }
    };

    // Registry filters extensions and duplicates silently
    let mut registry = ItemRegistry::new();
    let requested = cli.files.len();
    let accepted = registry.add(cli.files.clone());
    if accepted < requested {
        info!("Skipped {} unsupported or duplicate paths", requested - accepted);
    }

    let items = registry.snapshot();
    let total = items.len();

    let progress_bar = if cli.quiet {
        None
    } else {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    };

    let (tx, mut rx) = resamp::pipeline::progress::channel();
    let reporter = {
        let progress_bar = progress_bar.clone();
        tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                if let Some(pb) = &progress_bar {
                    pb.set_position(update.completed as u64);
                    pb.set_message(update.message);
                }
            }
        })
    };

    let pipeline = BatchPipeline::with_quality(cli.quality);
    let config = TargetConfig {
        width,
        height,
        output_dir: output_dir.clone(),
        use_fixed_path,
    };

    let outcome = match pipeline.run(items, config, tx).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(pb) = &progress_bar {
                pb.abandon();
            }
            return Err(e.user_message().into());
        }
    };
    let _ = reporter.await;

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Done");
    }

    println!();
    println!("{}", style("Conversion Summary:").bold());
    println!("  {}: {}", style("Converted").green(), outcome.succeeded());
    if outcome.failed() > 0 {
        println!("  {}: {}", style("Skipped").red(), outcome.failed());
        for failure in outcome.failures() {
            warn!("{}", failure);
        }
    }
    println!("  {}: {}", style("Output").cyan(), output_dir.display());

    if cli.save_settings {
        let updated = Preferences {
            default_width: width,
            default_height: height,
            output_path: output_dir,
            use_fixed_path: true,
        };
        // Best effort: a failed save never fails the workflow
        if let Err(e) = updated.to_file(&settings_path) {
            warn!("Could not save preferences to {:?}: {}", settings_path, e);
        } else {
            info!("Preferences saved to {:?}", settings_path);
        }
    }

    Ok(())
}
