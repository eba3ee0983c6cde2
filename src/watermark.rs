use anyhow::{Context, Result};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader, Rgb, Rgba};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::exif;
use crate::render::{Anchor, ColorSpec, Placement, StampFont, place};

/// How the date is drawn. Built once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    /// Font size in pixels, at least 1.
    pub font_size: u32,
    pub color: ColorSpec,
    pub anchor: Anchor,
    /// TrueType font to draw with; the built-in font is used when `None`
    /// or when the file can't be loaded.
    pub font_path: Option<PathBuf>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_size: 40,
            color: ColorSpec::default(),
            anchor: Anchor::default(),
            font_path: Some(PathBuf::from("fonts/Arial.ttf")),
        }
    }
}

/// What happened to a single image.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StampOutcome {
    /// The date was drawn (and written, unless this was a dry run).
    Stamped {
        output: PathBuf,
        date: String,
        placement: Placement,
    },
    /// No usable capture date; the image was left alone.
    Skipped { reason: String },
    /// Decoding, drawing or saving failed.
    Failed { error: String },
}

impl StampOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Stamped { .. })
    }
}

/// Draws capture dates onto images with a fixed style.
///
/// # Example
///
/// ```rust,no_run
/// use exif_stamp::watermark::{Stamper, WatermarkConfig};
/// use std::path::Path;
///
/// let stamper = Stamper::new(WatermarkConfig::default());
/// let outcome = stamper.apply(Path::new("photo.jpg"), Path::new("out"));
/// println!("{outcome:?}");
/// ```
pub struct Stamper {
    config: WatermarkConfig,
    font: StampFont,
    dry_run: bool,
    keep_metadata: bool,
}

impl Stamper {
    pub fn new(config: WatermarkConfig) -> Self {
        let font = StampFont::load(config.font_path.as_deref(), config.font_size);
        Self {
            config,
            font,
            dry_run: false,
            keep_metadata: false,
        }
    }

    /// Run everything except writing the output file.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Copy the source EXIF block into JPEG/PNG outputs.
    pub fn keep_metadata(mut self, keep: bool) -> Self {
        self.keep_metadata = keep;
        self
    }

    pub fn uses_builtin_font(&self) -> bool {
        self.font.is_builtin()
    }

    /// Stamp one image into `output_dir`, keeping its file name and format.
    ///
    /// Never panics or returns an error: a missing date is a
    /// [`StampOutcome::Skipped`] and any processing error is a
    /// [`StampOutcome::Failed`].
    pub fn apply(&self, path: &Path, output_dir: &Path) -> StampOutcome {
        match self.try_apply(path, output_dir) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Error processing {}: {e:#}", path.display());
                StampOutcome::Failed {
                    error: format!("{e:#}"),
                }
            }
        }
    }

    fn try_apply(&self, path: &Path, output_dir: &Path) -> Result<StampOutcome> {
        let reader = ImageReader::open(path)
            .context("Failed to open image")?
            .with_guessed_format()
            .context("Failed to read image header")?;
        let format = reader.format().context("Unrecognized image format")?;
        let image = reader.decode().context("Failed to decode image")?;

        let dates = match exif::read_exif(path) {
            Ok(dates) => dates,
            Err(e) => {
                log::warn!("Failed to read EXIF from {}: {e}", path.display());
                Default::default()
            }
        };
        let Some(date) = dates.capture_date() else {
            log::info!("No EXIF date found for {}, skipping", path.display());
            return Ok(StampOutcome::Skipped {
                reason: "no capture date in metadata".to_string(),
            });
        };

        let (text_width, text_height) = self.font.text_size(&date);
        let placement = place(
            image.width(),
            image.height(),
            text_width,
            text_height,
            self.config.anchor,
        );
        log::debug!(
            "{}: {date} ({text_width}x{text_height}) at {},{}",
            path.display(),
            placement.x,
            placement.y
        );

        let rgb = self.config.color.resolve()?;
        let image = draw_date(image, &self.font, rgb, placement, &date);

        let file_name = path.file_name().context("Input path has no file name")?;
        let output = output_dir.join(file_name);

        if self.dry_run {
            log::info!("Would write: {}", output.display());
            return Ok(StampOutcome::Stamped {
                output,
                date,
                placement,
            });
        }

        save(&image, &output, format)?;
        drop(image);

        if self.keep_metadata {
            match exif::carry_exif(path, &output) {
                Ok(true) => log::debug!("Carried EXIF into {}", output.display()),
                Ok(false) => {}
                Err(e) => log::warn!("Failed to carry EXIF into {}: {e}", output.display()),
            }
        }

        log::info!("Watermarked: {}", output.display());
        Ok(StampOutcome::Stamped {
            output,
            date,
            placement,
        })
    }
}

fn save(image: &DynamicImage, output: &Path, format: ImageFormat) -> Result<()> {
    image
        .save_with_format(output, format)
        .with_context(|| format!("Failed to save {}", output.display()))
}

/// Draw `text` onto the image, keeping its original pixel layout.
fn draw_date(
    image: DynamicImage,
    font: &StampFont,
    rgb: [u8; 3],
    at: Placement,
    text: &str,
) -> DynamicImage {
    let [r, g, b] = rgb;
    match image {
        DynamicImage::ImageRgb8(mut buf) => {
            font.draw(&mut buf, Rgb(rgb), at.x, at.y, text);
            DynamicImage::ImageRgb8(buf)
        }
        DynamicImage::ImageRgba8(mut buf) => {
            font.draw(&mut buf, Rgba([r, g, b, u8::MAX]), at.x, at.y, text);
            DynamicImage::ImageRgba8(buf)
        }
        DynamicImage::ImageRgb16(mut buf) => {
            font.draw(&mut buf, Rgb(widen(rgb)), at.x, at.y, text);
            DynamicImage::ImageRgb16(buf)
        }
        DynamicImage::ImageRgba16(mut buf) => {
            let [r, g, b] = widen(rgb);
            font.draw(&mut buf, Rgba([r, g, b, u16::MAX]), at.x, at.y, text);
            DynamicImage::ImageRgba16(buf)
        }
        other => {
            let color = other.color();
            let mut buf = other.to_rgba8();
            font.draw(&mut buf, Rgba([r, g, b, u8::MAX]), at.x, at.y, text);
            restore_color_type(DynamicImage::ImageRgba8(buf), color)
        }
    }
}

fn widen(rgb: [u8; 3]) -> [u16; 3] {
    rgb.map(|c| u16::from(c) * 257)
}

fn restore_color_type(image: DynamicImage, color: ColorType) -> DynamicImage {
    match color {
        ColorType::L8 => DynamicImage::ImageLuma8(image.into_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(image.into_luma_alpha8()),
        ColorType::L16 => DynamicImage::ImageLuma16(image.into_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(image.into_luma_alpha16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(image.into_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(image.into_rgba32f()),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_jpeg_with_dates, write_plain_png};
    use image::{GenericImageView, GrayImage, Luma};
    use tempfile::TempDir;

    fn builtin_config(anchor: Anchor) -> WatermarkConfig {
        WatermarkConfig {
            font_size: 16,
            color: ColorSpec::from_arg("red"),
            anchor,
            font_path: None,
        }
    }

    #[test]
    fn stamps_dated_jpeg() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("photo.jpg");
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        write_jpeg_with_dates(&input, 200, 100, Some("2023:07:15 10:20:30"), None);

        let stamper = Stamper::new(builtin_config(Anchor::BottomRight));
        let outcome = stamper.apply(&input, &out_dir);

        let StampOutcome::Stamped { output, date, placement } = outcome else {
            panic!("expected stamped, got {outcome:?}");
        };
        assert_eq!(output, out_dir.join("photo.jpg"));
        assert_eq!(date, "2023-07-15");
        // builtin cell 2px: text 118x14
        assert_eq!(placement, Placement { x: 72, y: 76 });

        let written = image::open(&output).unwrap();
        assert_eq!(written.dimensions(), (200, 100));
        assert_eq!(ImageFormat::from_path(&output).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn skips_image_without_date() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("plain.png");
        write_plain_png(&input, 50, 50);

        let outcome = Stamper::new(builtin_config(Anchor::TopLeft)).apply(&input, dir.path());
        assert!(matches!(outcome, StampOutcome::Skipped { .. }));
        assert!(!outcome.is_success());
    }

    #[test]
    fn undecodable_file_fails() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.jpg");
        std::fs::write(&input, b"definitely not a jpeg").unwrap();

        let outcome = Stamper::new(builtin_config(Anchor::TopLeft)).apply(&input, dir.path());
        assert!(matches!(outcome, StampOutcome::Failed { .. }), "{outcome:?}");
    }

    #[test]
    fn missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let outcome = Stamper::new(builtin_config(Anchor::TopLeft))
            .apply(&dir.path().join("gone.jpg"), dir.path());
        assert!(matches!(outcome, StampOutcome::Failed { .. }));
    }

    #[test]
    fn unusable_color_fails_the_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("photo.jpg");
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        write_jpeg_with_dates(&input, 80, 60, Some("2020:01:01 00:00:00"), None);

        let config = WatermarkConfig {
            color: ColorSpec::from_arg("chartreuse-ish"),
            ..builtin_config(Anchor::Center)
        };
        let outcome = Stamper::new(config).apply(&input, &out_dir);
        let StampOutcome::Failed { error } = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(error.contains("chartreuse-ish"));
        assert!(!out_dir.join("photo.jpg").exists());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("photo.jpg");
        let out_dir = dir.path().join("out");
        write_jpeg_with_dates(&input, 80, 60, Some("2020:01:01 00:00:00"), None);

        let outcome = Stamper::new(builtin_config(Anchor::TopLeft))
            .dry_run(true)
            .apply(&input, &out_dir);
        assert!(outcome.is_success());
        assert!(!out_dir.exists());
    }

    #[test]
    fn keep_metadata_preserves_date() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("photo.jpg");
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        write_jpeg_with_dates(&input, 80, 60, Some("2011:11:11 11:11:11"), None);

        let outcome = Stamper::new(builtin_config(Anchor::TopLeft))
            .keep_metadata(true)
            .apply(&input, &out_dir);
        assert!(outcome.is_success());

        let dates = exif::read_exif(&out_dir.join("photo.jpg")).unwrap();
        assert_eq!(dates.capture_date().as_deref(), Some("2011-11-11"));
    }

    #[test]
    fn output_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("photo.jpg");
        write_jpeg_with_dates(&input, 120, 90, Some("2023:07:15 10:20:30"), None);
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        std::fs::create_dir(&first).unwrap();
        std::fs::create_dir(&second).unwrap();

        let stamper = Stamper::new(builtin_config(Anchor::Center));
        assert!(stamper.apply(&input, &first).is_success());
        assert!(stamper.apply(&input, &second).is_success());

        let a = std::fs::read(first.join("photo.jpg")).unwrap();
        let b = std::fs::read(second.join("photo.jpg")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn draw_date_keeps_rgb_layout() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(40, 20));
        let font = StampFont::builtin(8);
        let out = draw_date(img, &font, [0, 0, 255], Placement { x: 1, y: 1 }, "1");
        assert_eq!(out.color(), ColorType::Rgb8);
        let rgb = out.to_rgb8();
        assert!(rgb.pixels().any(|p| p.0 == [0, 0, 255]));
    }

    #[test]
    fn draw_date_keeps_grayscale_layout() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 20, Luma([0])));
        let font = StampFont::builtin(8);
        let out = draw_date(img, &font, [255, 255, 255], Placement { x: 1, y: 1 }, "7");
        assert_eq!(out.color(), ColorType::L8);
        assert!(out.to_luma8().pixels().any(|p| p.0 == [255]));
    }

    #[test]
    fn draw_date_widens_16_bit_color() {
        let img = DynamicImage::ImageRgb16(image::ImageBuffer::new(20, 20));
        let font = StampFont::builtin(8);
        let out = draw_date(img, &font, [255, 0, 0], Placement { x: 0, y: 0 }, "8");
        let DynamicImage::ImageRgb16(buf) = out else {
            panic!("layout changed");
        };
        assert!(buf.pixels().any(|p| p.0 == [u16::MAX, 0, 0]));
    }

    #[test]
    fn png_with_alpha_stays_png_rgba() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("stamped.png");
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(40, 20, Rgba([0, 0, 0, 128])));
        let font = StampFont::builtin(8);
        let out = draw_date(img, &font, [255, 0, 0], Placement { x: 1, y: 1 }, "5");
        save(&out, &output, ImageFormat::Png).unwrap();

        let reader = ImageReader::open(&output).unwrap().with_guessed_format().unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Png));
        let reopened = reader.decode().unwrap();
        assert_eq!(reopened.color(), ColorType::Rgba8);
        assert!(reopened.to_rgba8().pixels().any(|p| p.0 == [255, 0, 0, 255]));
    }

    #[test]
    fn tiff_stays_tiff_rgb() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("stamped.tiff");
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(40, 20));
        let font = StampFont::builtin(8);
        let out = draw_date(img, &font, [0, 255, 0], Placement { x: 1, y: 1 }, "9");
        save(&out, &output, ImageFormat::Tiff).unwrap();

        let reader = ImageReader::open(&output).unwrap().with_guessed_format().unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Tiff));
        let reopened = reader.decode().unwrap();
        assert_eq!(reopened.color(), ColorType::Rgb8);
        assert_eq!(reopened.dimensions(), (40, 20));
        assert!(reopened.to_rgb8().pixels().any(|p| p.0 == [0, 255, 0]));
    }
}
