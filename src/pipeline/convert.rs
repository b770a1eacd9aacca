//! Single-item conversion: decode, resample, encode

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::registry::CandidateFile;

use super::report::{ConvertedItem, ItemErrorKind, ItemFailure, ItemResult};

/// Compute the deterministic output file name for a source and target geometry
///
/// `photo.png` at 800x600 becomes `photo_800x600.jpg`, always JPEG regardless
/// of the source format.
pub fn output_file_name(source: &Path, width: u32, height: u32) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}_{}x{}.jpg", stem, width, height)
}

/// Convert one item, blocking the calling thread
///
/// The image is stretched to exactly `width`x`height`; aspect ratio is not
/// preserved and nothing is letterboxed. Any failure is returned as an
/// [`ItemFailure`], and a partially written output file is removed first.
pub(crate) fn convert_item(
    item: &CandidateFile,
    width: u32,
    height: u32,
    output_dir: &Path,
    quality: u8,
) -> ItemResult {
    let source = &item.full_path;
    debug!("Converting {:?} to {}x{}", source, width, height);

    let decoded = image::open(source).map_err(|e| {
        ItemFailure::new(source.clone(), ItemErrorKind::Decode, e.to_string())
    })?;

    // Lanczos3 is the highest-quality filter the image crate offers
    let resized = decoded.resize_exact(width, height, FilterType::Lanczos3);

    // JPEG has no alpha channel; flatten to RGB before encoding
    let canvas = DynamicImage::ImageRgb8(resized.to_rgb8());

    let output_path = output_dir.join(output_file_name(source, width, height));
    let result = write_jpeg(&canvas, &output_path, quality);

    if let Err(failure) = result {
        // Do not leave a truncated file behind from this run
        let _ = std::fs::remove_file(&output_path);
        return Err(ItemFailure::new(source.clone(), failure.0, failure.1));
    }

    debug!("Wrote {:?}", output_path);
    Ok(ConvertedItem {
        source: source.clone(),
        output: output_path,
    })
}

fn write_jpeg(
    image: &DynamicImage,
    output_path: &Path,
    quality: u8,
) -> std::result::Result<(), (ItemErrorKind, String)> {
    // File::create truncates, so a same-named file from a prior run is overwritten
    let file = File::create(output_path).map_err(|e| (ItemErrorKind::Io, e.to_string()))?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    image
        .write_with_encoder(encoder)
        .map_err(|e| (ItemErrorKind::Encode, e.to_string()))?;
    writer.flush().map_err(|e| (ItemErrorKind::Io, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn candidate(path: PathBuf) -> CandidateFile {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        CandidateFile {
            display_name,
            full_path: path,
        }
    }

    #[test]
    fn test_output_file_name_is_deterministic() {
        assert_eq!(
            output_file_name(Path::new("/in/photo.png"), 800, 600),
            "photo_800x600.jpg"
        );
        assert_eq!(
            output_file_name(Path::new("archive.v2.tiff"), 10, 20),
            "archive.v2_10x20.jpg"
        );
    }

    #[test]
    fn test_convert_stretches_to_exact_dimensions() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("wide.png");
        RgbImage::new(40, 10).save(&source).unwrap();

        let converted =
            convert_item(&candidate(source), 16, 16, dir.path(), 90).expect("conversion failed");

        let output = image::open(&converted.output).unwrap();
        assert_eq!((output.width(), output.height()), (16, 16));
        assert_eq!(
            converted.output.file_name().unwrap().to_str().unwrap(),
            "wide_16x16.jpg"
        );
    }

    #[test]
    fn test_convert_corrupt_source_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("broken.jpg");
        std::fs::write(&source, b"this is not a jpeg").unwrap();

        let out_dir = TempDir::new().unwrap();
        let result = convert_item(&candidate(source), 100, 100, out_dir.path(), 90);

        let failure = result.expect_err("expected a decode failure");
        assert_eq!(failure.kind, ItemErrorKind::Decode);
        assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_convert_overwrites_prior_output() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.png");
        RgbImage::new(8, 8).save(&source).unwrap();

        let item = candidate(source);
        let first = convert_item(&item, 4, 4, dir.path(), 90).unwrap();
        let second = convert_item(&item, 4, 4, dir.path(), 90).unwrap();
        assert_eq!(first.output, second.output);
        assert!(image::open(&second.output).is_ok());
    }
}
