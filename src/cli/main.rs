use anyhow::Result;
use clap::Parser;
use clap::builder::PossibleValuesParser;
use std::path::PathBuf;

use exif_stamp::config::Config;
use exif_stamp::pipeline::{self, OutputLayout};
use exif_stamp::render::Anchor;

#[derive(Parser, Debug)]
#[command(
    name = "exif-stamp",
    version,
    about = "Add EXIF date watermarks to images"
)]
struct Cli {
    /// Path to image file or directory
    #[arg(value_name = "IMAGE_PATH", required_unless_present = "init")]
    image_path: Option<PathBuf>,

    /// Font size (default: 40)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    font_size: Option<u32>,

    /// Text color: white, black, red, green, blue, #rrggbb or rgb(r, g, b) (default: white)
    #[arg(long)]
    color: Option<String>,

    /// Text position (default: bottom-right)
    #[arg(long, value_parser = PossibleValuesParser::new(Anchor::NAMES))]
    position: Option<String>,

    /// TrueType font file (default: fonts/Arial.ttf, built-in font if missing)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Put the output directory inside the input directory or beside it (default: nested)
    #[arg(long, value_parser = PossibleValuesParser::new(OutputLayout::NAMES))]
    layout: Option<String>,

    /// Copy the original EXIF data into stamped JPEG/PNG files
    #[arg(long)]
    keep_metadata: bool,

    /// Process images without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let Some(input) = cli.image_path.as_deref() else {
        anyhow::bail!("No input file or directory specified. Use --help for usage.");
    };

    // Load config, then let flags override it
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(size) = cli.font_size {
        config.watermark.font_size = size;
    }
    if let Some(color) = cli.color {
        config.watermark.color = color;
    }
    if let Some(position) = cli.position {
        config.watermark.position = position;
    }
    if let Some(font) = cli.font {
        config.watermark.font_path = Some(font);
    }
    if let Some(layout) = cli.layout.as_deref() {
        config.output.layout = OutputLayout::from_name(layout);
    }
    if cli.keep_metadata {
        config.output.keep_metadata = true;
    }
    if cli.dry_run {
        config.output.dry_run = true;
    }

    let options = config.batch_options()?;
    let report = pipeline::run_batch(input, &options)?;

    // Keep stdout parseable in JSON mode; the summary goes to the log instead
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        log::info!(
            "Processed {}/{} images successfully",
            report.success,
            report.total
        );
        log::info!("Watermarked images saved to: {}", report.output_dir.display());
        return Ok(());
    }

    // Summary
    println!(
        "Processed {}/{} images successfully",
        report.success, report.total
    );
    println!("Watermarked images saved to: {}", report.output_dir.display());

    Ok(())
}
