//! # exif-stamp
//!
//! Stamp the capture date stored in a photo's EXIF metadata onto the photo
//! as visible text. Works on a single file or on every JPEG, PNG and TIFF in
//! a directory, writing stamped copies to a `<name>_watermark` directory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exif_stamp::pipeline::{run_batch, BatchOptions};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let report = run_batch(Path::new("./photos"), &BatchOptions::default())?;
//!     println!("Processed {}/{} images successfully", report.success, report.total);
//!     println!("Watermarked images saved to: {}", report.output_dir.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! ```rust,no_run
//! use exif_stamp::exif::read_exif;
//! use exif_stamp::render::{place, Anchor};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let dates = read_exif(Path::new("photo.jpg"))?;
//!     if let Some(date) = dates.capture_date() {
//!         let at = place(4000, 3000, 300, 40, Anchor::BottomRight);
//!         println!("{date} goes at {},{}", at.x, at.y);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration types and loading/saving
//! - [`exif`] — Capture date extraction and EXIF carry-over
//! - [`render`] — Text placement, colors and fonts
//! - [`watermark`] — Stamping a single image
//! - [`pipeline`] — Input resolution and batch runs

pub mod config;
pub mod exif;
pub mod pipeline;
pub mod render;
pub mod watermark;

#[cfg(test)]
mod test_support;
