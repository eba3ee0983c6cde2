use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::watermark::{StampOutcome, Stamper, WatermarkConfig};

/// Suffix appended to the input name to form the output directory.
const OUTPUT_SUFFIX: &str = "_watermark";

/// Where the output directory goes when the input is a directory.
///
/// A single-file input always writes to `<stem>_watermark` next to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputLayout {
    /// `photos/photos_watermark`
    #[default]
    Nested,
    /// `photos_watermark` beside `photos`
    Sibling,
}

impl OutputLayout {
    pub const NAMES: [&'static str; 2] = ["nested", "sibling"];

    /// Parse a layout name, defaulting to [`OutputLayout::Nested`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "sibling" => Self::Sibling,
            "nested" => Self::Nested,
            other => {
                log::warn!("Unknown output layout '{other}', using nested");
                Self::Nested
            }
        }
    }
}

/// Extensions picked up when the input is a directory (case-insensitive).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff"];

/// Files to process and the directory their stamped copies go to.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchInput {
    pub images: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

/// Options for a whole run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub watermark: WatermarkConfig,
    pub layout: OutputLayout,
    pub dry_run: bool,
    pub keep_metadata: bool,
}

/// Per-file result inside a [`BatchReport`].
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: StampOutcome,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub success: usize,
    pub total: usize,
    pub output_dir: PathBuf,
    pub files: Vec<FileReport>,
}

/// Check if a file has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect the supported images directly inside `dir`, sorted by name.
///
/// Subdirectories are not entered.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let p = entry.path();
        if entry.file_type().is_file() && is_supported_image(p) {
            images.push(p.to_path_buf());
        }
    }

    Ok(images)
}

/// Work out which files to stamp and where the results go.
///
/// # Example
///
/// ```rust,no_run
/// use exif_stamp::pipeline::{resolve_input, OutputLayout};
/// use std::path::Path;
///
/// let batch = resolve_input(Path::new("holiday"), OutputLayout::Nested).unwrap();
/// assert_eq!(batch.output_dir, Path::new("holiday/holiday_watermark"));
/// ```
pub fn resolve_input(input: &Path, layout: OutputLayout) -> Result<BatchInput> {
    if input.is_dir() {
        // `.` and `..` carry no name of their own
        let dir = match input.file_name() {
            Some(_) => input.to_path_buf(),
            None => input
                .canonicalize()
                .with_context(|| format!("Failed to resolve {}", input.display()))?,
        };
        let name = dir
            .file_name()
            .with_context(|| format!("{} has no directory name", dir.display()))?
            .to_string_lossy();
        let output_name = format!("{name}{OUTPUT_SUFFIX}");
        let output_dir = match layout {
            OutputLayout::Nested => input.join(output_name),
            OutputLayout::Sibling => match dir.parent() {
                Some(parent) => parent.join(output_name),
                None => bail!("{} has no parent directory", dir.display()),
            },
        };
        let images = collect_images(input)?;
        return Ok(BatchInput { images, output_dir });
    }

    if !input.exists() {
        log::warn!("Path does not exist: {}", input.display());
    }
    let stem = input
        .file_stem()
        .with_context(|| format!("{} has no file name", input.display()))?
        .to_string_lossy();
    let output_dir = input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{stem}{OUTPUT_SUFFIX}"));

    Ok(BatchInput {
        images: vec![input.to_path_buf()],
        output_dir,
    })
}

/// Stamp every image found at `input`.
///
/// Individual failures are recorded in the report; only being unable to
/// list the input or create the output directory aborts the run.
pub fn run_batch(input: &Path, options: &BatchOptions) -> Result<BatchReport> {
    let BatchInput { images, output_dir } = resolve_input(input, options.layout)?;

    if options.dry_run {
        log::info!("DRY RUN — no files will be written");
    } else {
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory {}", output_dir.display())
        })?;
    }

    let stamper = Stamper::new(options.watermark.clone())
        .dry_run(options.dry_run)
        .keep_metadata(options.keep_metadata);
    if stamper.uses_builtin_font() {
        log::info!("Using built-in font");
    }

    let total = images.len();
    log::info!("Found {total} image(s) to process");

    let mut files = Vec::with_capacity(total);
    let mut success = 0;

    for (i, image_path) in images.into_iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", i + 1, total, image_path.display());

        let outcome = stamper.apply(&image_path, &output_dir);
        if outcome.is_success() {
            success += 1;
        }
        files.push(FileReport {
            path: image_path,
            outcome,
        });
    }

    Ok(BatchReport {
        success,
        total,
        output_dir,
        files,
    })
}
