//! EXIF date reading and EXIF carry-over.
//!
//! - [`read_exif`] — read the date-taken and modification-date fields
//! - [`ExifDates::capture_date`] — normalize them into a `YYYY-MM-DD` date
//! - [`carry_exif`] — copy the source EXIF block into a stamped JPEG/PNG

mod carry;
mod reader;

pub use carry::carry_exif;
pub use reader::{ExifDates, normalize_date, read_exif};
