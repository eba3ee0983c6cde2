use anyhow::{Context, Result};
use img_parts::{Bytes, DynImage, ImageEXIF};
use std::path::Path;

/// Copy the EXIF block of `source` into the already written `output`.
///
/// Only JPEG and PNG outputs can carry EXIF this way. Returns `false` when
/// there was nothing to copy or the output format can't hold it.
pub fn carry_exif(source: &Path, output: &Path) -> Result<bool> {
    let source_bytes = std::fs::read(source).context("Failed to read source image")?;
    let exif = match DynImage::from_bytes(Bytes::from(source_bytes))
        .map_err(|e| anyhow::anyhow!("Failed to parse source image: {e}"))?
    {
        Some(img) => img.exif(),
        None => None,
    };
    let Some(exif) = exif else {
        log::debug!("No EXIF block to carry from {}", source.display());
        return Ok(false);
    };

    let output_bytes = std::fs::read(output).context("Failed to read written image")?;
    let rewritten = match DynImage::from_bytes(Bytes::from(output_bytes))
        .map_err(|e| anyhow::anyhow!("Failed to parse written image: {e}"))?
    {
        Some(DynImage::Jpeg(mut jpeg)) => {
            jpeg.set_exif(Some(exif));
            jpeg.encoder().bytes()
        }
        Some(DynImage::Png(mut png)) => {
            png.set_exif(Some(exif));
            png.encoder().bytes()
        }
        _ => {
            log::debug!("{} cannot carry EXIF, leaving it stripped", output.display());
            return Ok(false);
        }
    };

    std::fs::write(output, &rewritten).context("Failed to write image with EXIF")?;
    Ok(true)
}
