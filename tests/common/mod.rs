//! Image fixtures shared by the integration tests. Kept in step with
//! `src/test_support.rs`, which the unit tests use.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};
use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use std::io::Cursor;
use std::path::Path;

// little_exif as_u8_vec(JPEG) returns: [APP1 marker 2B][length 2B][Exif\0\0 6B][TIFF data]
const JPEG_EXIF_OVERHEAD: usize = 10;

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([40, 80, 120]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

pub fn write_plain_png(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode(width, height, ImageFormat::Png)).unwrap();
}

pub fn write_plain_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode(width, height, ImageFormat::Jpeg)).unwrap();
}

pub fn write_plain_tiff(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode(width, height, ImageFormat::Tiff)).unwrap();
}

/// JPEG with `DateTimeOriginal` and/or `ModifyDate` set.
pub fn write_jpeg_with_dates(
    path: &Path,
    width: u32,
    height: u32,
    date_taken: Option<&str>,
    modify_date: Option<&str>,
) {
    let mut metadata = Metadata::new();
    if let Some(date) = date_taken {
        metadata.set_tag(ExifTag::DateTimeOriginal(date.to_string()));
    }
    if let Some(date) = modify_date {
        metadata.set_tag(ExifTag::ModifyDate(date.to_string()));
    }
    let exif_bytes = metadata.as_u8_vec(FileExtension::JPEG);

    let mut jpeg = Jpeg::from_bytes(Bytes::from(encode(width, height, ImageFormat::Jpeg))).unwrap();
    jpeg.set_exif(Some(Bytes::from(exif_bytes[JPEG_EXIF_OVERHEAD..].to_vec())));
    std::fs::write(path, jpeg.encoder().bytes()).unwrap();
}
