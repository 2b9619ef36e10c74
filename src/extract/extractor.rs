use std::fs;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageReader};
use log::{debug, info, warn};

use super::{ExtractedImage, SheetReport};
use crate::cli::CompressionLevel;
use crate::error::SlicerError;
use crate::output::{Optimizer, save_png};
use crate::sheet::{
    CharacterNames, Slot, SlotKind, crop_region, has_expected_dimensions, load_character_names,
    sanitize_filename, sheet_slots,
};

/// Slices sprite sheets into face sprites and portraits
#[derive(Debug, Clone)]
pub struct SheetExtractor {
    pub compress: Option<CompressionLevel>,
    pub optimizer: Option<Optimizer>,
}

impl Default for SheetExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetExtractor {
    pub fn new() -> Self {
        Self {
            compress: Some(CompressionLevel::default()),
            optimizer: None,
        }
    }

    pub fn compress(mut self, compress: Option<CompressionLevel>) -> Self {
        self.compress = compress;
        self
    }

    pub fn optimizer(mut self, optimizer: Option<Optimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Slice one sheet into `output_dir`, creating the directory if needed.
    pub fn extract(&self, sheet_path: &Path, output_dir: &Path) -> Result<SheetReport, SlicerError> {
        let sheet = load_sheet(sheet_path)?;
        let (width, height) = sheet.dimensions();

        if !has_expected_dimensions(&sheet) {
            warn!("Expected 160x160 pixels, got {}x{}", width, height);
        }

        let base_name = sheet_base_name(sheet_path);

        let names = load_character_names(sheet_path)?.filter(|n| !n.is_empty());
        match &names {
            Some(names) => info!(
                "Loaded {} character names from {}.txt",
                names.len(),
                base_name
            ),
            None => {
                info!("No character names file found ({}.txt)", base_name);
                info!("Using default naming (row/sprite numbers)");
            }
        }

        fs::create_dir_all(output_dir).map_err(|e| SlicerError::CreateDir {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        info!("Processing {}...", sheet_path.display());

        let mut written = Vec::new();
        let mut current_kind = None;
        for extracted in slice_sheet(&sheet, &base_name, names.as_ref()) {
            if current_kind != Some(extracted.slot.kind) {
                current_kind = Some(extracted.slot.kind);
                match extracted.slot.kind {
                    SlotKind::Face => info!("Extracting 16x16 sprites from first column..."),
                    SlotKind::Portrait => {
                        info!("Extracting 32x32 portraits from remaining columns...")
                    }
                }
            }

            let path = output_dir.join(&extracted.filename);
            save_png(&extracted.image, &path, self.compress)?;
            debug!(
                "  {:?} row {} sprite {} at {:?}",
                extracted.slot.kind, extracted.slot.row, extracted.slot.sprite, extracted.slot.region
            );
            info!("  Saved: {}", extracted.filename);
            written.push(path);
        }

        let optimizer_failures = match &self.optimizer {
            Some(optimizer) if !written.is_empty() => {
                info!(
                    "Optimizing {} files with {}...",
                    written.len(),
                    optimizer.program().display()
                );
                let failures = optimizer.optimize_all(&written);
                info!("Optimization complete!");
                failures
            }
            _ => 0,
        };

        info!("Extraction complete for {}!", sheet_path.display());

        Ok(SheetReport {
            sheet: sheet_path.to_path_buf(),
            width,
            height,
            names_loaded: names.as_ref().map(CharacterNames::len),
            written,
            optimizer_failures,
        })
    }
}

/// Crop every slot of a decoded sheet and assign its output filename.
///
/// Faces come first, then portraits, each in raster order. Crops keep the
/// sheet's color type.
pub fn slice_sheet(
    sheet: &DynamicImage,
    base_name: &str,
    names: Option<&CharacterNames>,
) -> Vec<ExtractedImage> {
    sheet_slots()
        .into_iter()
        .map(|slot| ExtractedImage {
            filename: output_filename(&slot, base_name, names),
            image: crop_region(sheet, slot.region),
            slot,
        })
        .collect()
}

/// Output filename for a slot.
///
/// Named characters produce `{name}face.png` and `{name}.png`; anything
/// without a name falls back to `{base}_row{row}_sprite{n}[_portrait].png`.
pub fn output_filename(slot: &Slot, base_name: &str, names: Option<&CharacterNames>) -> String {
    let name = names.and_then(|n| n.get(slot.character_index()));

    match (slot.kind, name) {
        (SlotKind::Face, Some(name)) => format!("{}face.png", sanitize_filename(name)),
        (SlotKind::Portrait, Some(name)) => format!("{}.png", sanitize_filename(name)),
        (SlotKind::Face, None) => {
            format!("{}_row{}_sprite{}.png", base_name, slot.row, slot.sprite)
        }
        (SlotKind::Portrait, None) => format!(
            "{}_row{}_sprite{}_portrait.png",
            base_name, slot.row, slot.sprite
        ),
    }
}

/// Sheet filename without directory or extension.
pub fn sheet_base_name(sheet_path: &Path) -> String {
    sheet_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sheet".to_string())
}

fn load_sheet(path: &Path) -> Result<DynamicImage, SlicerError> {
    let img = ImageReader::open(path)
        .map_err(|e| SlicerError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| SlicerError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| SlicerError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::geometry::{FacePosition, face_region, portrait_region};
    use image::{ImageBuffer, Rgba, RgbaImage};

    fn marker_sheet(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([x as u8, y as u8, 200, 255])
        }))
    }

    fn twenty_names() -> CharacterNames {
        let content: String = (0..20).map(|i| format!("Hero {i}\n")).collect();
        CharacterNames::parse(&content)
    }

    #[test]
    fn test_positional_filenames() {
        let sheet = marker_sheet(160, 160);
        let images = slice_sheet(&sheet, "npc-sprites-page-1", None);

        assert_eq!(images.len(), 40);
        assert_eq!(images[0].filename, "npc-sprites-page-1_row0_sprite1.png");
        assert_eq!(images[3].filename, "npc-sprites-page-1_row0_sprite4.png");
        assert_eq!(images[19].filename, "npc-sprites-page-1_row4_sprite4.png");
        assert_eq!(
            images[20].filename,
            "npc-sprites-page-1_row0_sprite1_portrait.png"
        );
        assert_eq!(
            images[39].filename,
            "npc-sprites-page-1_row4_sprite4_portrait.png"
        );
    }

    #[test]
    fn test_named_faces_and_portraits_align() {
        let sheet = marker_sheet(160, 160);
        let names = twenty_names();
        let images = slice_sheet(&sheet, "sheet", Some(&names));

        for i in 0..20 {
            assert_eq!(images[i].filename, format!("Hero_{i}face.png"));
            assert_eq!(images[20 + i].filename, format!("Hero_{i}.png"));
            assert_eq!(
                images[i].slot.character_index(),
                images[20 + i].slot.character_index()
            );
        }
    }

    #[test]
    fn test_short_name_list_falls_back() {
        let names = CharacterNames::parse("Alice\nBob O'Brien (2)\nCarol\n");
        let sheet = marker_sheet(160, 160);
        let images = slice_sheet(&sheet, "base", Some(&names));

        assert_eq!(images[0].filename, "Aliceface.png");
        assert_eq!(images[1].filename, "Bob_OBrien_2face.png");
        assert_eq!(images[2].filename, "Carolface.png");
        assert_eq!(images[3].filename, "base_row0_sprite4.png");
        assert_eq!(images[4].filename, "base_row1_sprite1.png");

        assert_eq!(images[20].filename, "Alice.png");
        assert_eq!(images[21].filename, "Bob_OBrien_2.png");
        assert_eq!(images[23].filename, "base_row0_sprite4_portrait.png");
    }

    #[test]
    fn test_crops_match_regions() {
        let sheet = marker_sheet(160, 160);
        let images = slice_sheet(&sheet, "s", None);

        let face = &images[6];
        assert_eq!(face.slot.region, face_region(1, FacePosition::BottomLeft));
        assert_eq!(face.image.dimensions(), (16, 16));
        assert_eq!(face.image.get_pixel(0, 0), Rgba([0, 48, 200, 255]));

        let portrait = &images[20 + 9];
        assert_eq!(portrait.slot.region, portrait_region(2, 2));
        assert_eq!(portrait.image.dimensions(), (32, 32));
        assert_eq!(portrait.image.get_pixel(0, 0), Rgba([64, 64, 200, 255]));
        assert_eq!(portrait.image.get_pixel(31, 31), Rgba([95, 95, 200, 255]));
    }

    #[test]
    fn test_sheet_base_name() {
        assert_eq!(
            sheet_base_name(Path::new("some/dir/npc-sprites-page-1.png")),
            "npc-sprites-page-1"
        );
    }

    #[test]
    fn test_extract_writes_forty_files() {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("npc-sprites-a.png");
        marker_sheet(160, 160).save(&sheet_path).unwrap();
        let out = dir.path().join("out");

        let report = SheetExtractor::new()
            .compress(None)
            .extract(&sheet_path, &out)
            .unwrap();

        assert_eq!(report.written.len(), 40);
        assert!(report.has_expected_dimensions());
        assert_eq!(report.names_loaded, None);
        assert_eq!(report.optimizer_failures, 0);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 40);

        let portrait = image::open(out.join("npc-sprites-a_row4_sprite4_portrait.png"))
            .unwrap()
            .into_rgba8();
        assert_eq!(portrait.get_pixel(0, 0), &Rgba([128, 128, 200, 255]));
    }

    #[test]
    fn test_extract_with_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("npc-sprites-a.png");
        marker_sheet(160, 160).save(&sheet_path).unwrap();
        let names: String = (0..20).map(|i| format!("Npc {i}\n")).collect();
        fs::write(dir.path().join("npc-sprites-a.txt"), names).unwrap();
        let out = dir.path().join("out");

        let report = SheetExtractor::new().extract(&sheet_path, &out).unwrap();

        assert_eq!(report.names_loaded, Some(20));
        assert!(out.join("Npc_0face.png").is_file());
        assert!(out.join("Npc_19.png").is_file());

        let face = image::open(out.join("Npc_5face.png")).unwrap().into_rgba8();
        assert_eq!(face.get_pixel(0, 0), &Rgba([16, 32, 200, 255]));
    }

    #[test]
    fn test_extract_misshapen_sheet_still_runs() {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("npc-sprites-big.png");
        marker_sheet(192, 160).save(&sheet_path).unwrap();
        let out = dir.path().join("out");

        let report = SheetExtractor::new()
            .compress(None)
            .extract(&sheet_path, &out)
            .unwrap();

        assert!(!report.has_expected_dimensions());
        assert_eq!((report.width, report.height), (192, 160));
        assert_eq!(report.written.len(), 40);
    }

    #[test]
    fn test_extract_undersized_sheet_zero_fills() {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("npc-sprites-small.png");
        marker_sheet(128, 128).save(&sheet_path).unwrap();
        let out = dir.path().join("out");

        let report = SheetExtractor::new()
            .compress(None)
            .extract(&sheet_path, &out)
            .unwrap();

        assert!(!report.has_expected_dimensions());
        assert_eq!(report.written.len(), 40);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 40);

        let face = image::open(out.join("npc-sprites-small_row4_sprite1.png"))
            .unwrap()
            .into_rgba8();
        assert_eq!(face.dimensions(), (16, 16));
        assert!(face.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));

        let portrait = image::open(out.join("npc-sprites-small_row4_sprite4_portrait.png"))
            .unwrap()
            .into_rgba8();
        assert_eq!(portrait.dimensions(), (32, 32));
        assert!(portrait.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));

        let inside = image::open(out.join("npc-sprites-small_row3_sprite3_portrait.png"))
            .unwrap()
            .into_rgba8();
        assert_eq!(inside.get_pixel(0, 0), &Rgba([96, 96, 200, 255]));
    }

    #[test]
    fn test_extract_keeps_sixteen_bit_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("npc-sprites-deep.png");
        let mut sheet: ImageBuffer<Rgba<u16>, Vec<u16>> =
            ImageBuffer::from_pixel(160, 160, Rgba([0, 0, 0, 65535]));
        sheet.put_pixel(32, 0, Rgba([8225, 7, 1234, 65535]));
        DynamicImage::ImageRgba16(sheet).save(&sheet_path).unwrap();
        let out = dir.path().join("out");

        SheetExtractor::new()
            .compress(None)
            .extract(&sheet_path, &out)
            .unwrap();

        let portrait = image::open(out.join("npc-sprites-deep_row0_sprite1_portrait.png")).unwrap();
        let portrait = portrait.as_rgba16().unwrap();
        assert_eq!(portrait.get_pixel(0, 0), &Rgba([8225, 7, 1234, 65535]));
    }

    #[test]
    fn test_extract_empty_names_file_uses_positional_names() {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("npc-sprites-a.png");
        marker_sheet(160, 160).save(&sheet_path).unwrap();
        fs::write(dir.path().join("npc-sprites-a.txt"), "\n   \n").unwrap();
        let out = dir.path().join("out");

        let report = SheetExtractor::new()
            .compress(None)
            .extract(&sheet_path, &out)
            .unwrap();

        assert_eq!(report.names_loaded, None);
        assert!(out.join("npc-sprites-a_row0_sprite1.png").is_file());
        assert!(out.join("npc-sprites-a_row0_sprite1_portrait.png").is_file());
    }

    #[test]
    fn test_extract_unreadable_sheet_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("npc-sprites-bad.png");
        fs::write(&sheet_path, b"not an image").unwrap();

        let err = SheetExtractor::new()
            .extract(&sheet_path, &dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, SlicerError::ImageLoad { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_optimizer_failures_do_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let sheet_path = dir.path().join("npc-sprites-a.png");
        marker_sheet(160, 160).save(&sheet_path).unwrap();
        let out = dir.path().join("out");

        let report = SheetExtractor::new()
            .compress(None)
            .optimizer(Some(Optimizer::new("false", 2)))
            .extract(&sheet_path, &out)
            .unwrap();

        assert_eq!(report.written.len(), 40);
        assert_eq!(report.optimizer_failures, 40);
        assert!(report.written.iter().all(|p| p.is_file()));
    }
}
