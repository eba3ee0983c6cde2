use anyhow::{Context, Result};
use nom_exif::*;
use std::path::Path;

// ModifyDate / DateTime (IFD0)
const TAG_MODIFY_DATE: u16 = 0x0132;

/// Raw date fields read from an image's EXIF block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifDates {
    /// `DateTimeOriginal` — when the photo was taken.
    pub date_taken: Option<String>,
    /// `ModifyDate` (`DateTime`, 0x0132) — last modification.
    pub modify_date: Option<String>,
}

impl ExifDates {
    /// The capture date as `YYYY-MM-DD`.
    ///
    /// Prefers the date taken and falls back to the modification date.
    /// Values that don't normalize to a calendar date count as absent.
    ///
    /// ```rust
    /// use exif_stamp::exif::ExifDates;
    ///
    /// let dates = ExifDates {
    ///     date_taken: None,
    ///     modify_date: Some("2023:07:15 10:20:30".into()),
    /// };
    /// assert_eq!(dates.capture_date().as_deref(), Some("2023-07-15"));
    /// ```
    pub fn capture_date(&self) -> Option<String> {
        self.date_taken
            .as_deref()
            .and_then(normalize_date)
            .or_else(|| self.modify_date.as_deref().and_then(normalize_date))
    }
}

/// Read the date fields from an image file.
///
/// A file without an EXIF container yields empty [`ExifDates`]; only a file
/// that cannot be opened at all is an error.
pub fn read_exif(path: &Path) -> Result<ExifDates> {
    std::fs::File::open(path).context("Failed to open image file")?;

    let mut parser = MediaParser::new();
    let ms = match MediaSource::file_path(path) {
        Ok(ms) => ms,
        Err(e) => {
            log::debug!("No EXIF container in {}: {e}", path.display());
            return Ok(ExifDates::default());
        }
    };

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(_) => {
            log::debug!("No EXIF data found in {}", path.display());
            return Ok(ExifDates::default());
        }
    };
    let exif: Exif = iter.into();

    let mut dates = ExifDates::default();

    if let Some(val) = exif.get(ExifTag::DateTimeOriginal) {
        dates.date_taken = entry_to_string(val);
    }

    if let Some(val) = exif.get_by_ifd_tag_code(0, TAG_MODIFY_DATE) {
        dates.modify_date = entry_to_string(val);
    }

    Ok(dates)
}

/// Convert an EntryValue to an Option<String>.
fn entry_to_string(val: &EntryValue) -> Option<String> {
    let s = val.to_string();
    let s = s.trim().trim_matches('"').trim().to_string();
    if s.is_empty() { None } else { Some(s) }
}

/// Turn an EXIF timestamp into `YYYY-MM-DD`.
///
/// Keeps whatever precedes the time part and swaps `:` for `-`. The result
/// must look like a date, otherwise `None`.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_matches('"');
    // Timestamps rendered as ISO 8601 separate the time with 'T'.
    let date_part = raw.split([' ', 'T']).next()?;
    let date = date_part.replace(':', "-");

    let well_formed = date.len() == 10
        && date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    well_formed.then_some(date)
}
