use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel, imageops};

/// Expected sheet width and height in pixels.
pub const SHEET_SIZE: u32 = 160;
/// Side length of one grid cell.
pub const CELL_SIZE: u32 = 32;
/// Side length of one face sprite (a quarter of a column-0 cell).
pub const FACE_SIZE: u32 = 16;
/// Rows in the sheet grid.
pub const ROWS: u32 = 5;
/// Characters per row: four face sprites in column 0, four portraits in columns 1-4.
pub const SLOTS_PER_ROW: u32 = 4;
/// Character slots per sheet.
pub const CHARACTER_SLOTS: usize = (ROWS * SLOTS_PER_ROW) as usize;

/// A pixel rectangle within the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Position of a face sprite inside its 2x2 column-0 cell, in raster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FacePosition {
    pub const ALL: [FacePosition; 4] = [
        FacePosition::TopLeft,
        FacePosition::TopRight,
        FacePosition::BottomLeft,
        FacePosition::BottomRight,
    ];

    /// Pixel offset from the top-left corner of the cell.
    pub fn offset(self) -> (u32, u32) {
        match self {
            FacePosition::TopLeft => (0, 0),
            FacePosition::TopRight => (FACE_SIZE, 0),
            FacePosition::BottomLeft => (0, FACE_SIZE),
            FacePosition::BottomRight => (FACE_SIZE, FACE_SIZE),
        }
    }

    /// Sprite number within the row (1-4).
    pub fn sprite_number(self) -> u32 {
        match self {
            FacePosition::TopLeft => 1,
            FacePosition::TopRight => 2,
            FacePosition::BottomLeft => 3,
            FacePosition::BottomRight => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Face,
    Portrait,
}

/// One extractable image on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub kind: SlotKind,
    /// Grid row (0-4)
    pub row: u32,
    /// Sprite number within the row (1-4)
    pub sprite: u32,
    pub region: Region,
}

impl Slot {
    /// Index into the character name list. Faces and portraits of the same
    /// character share an index.
    pub fn character_index(&self) -> usize {
        (self.row * SLOTS_PER_ROW + (self.sprite - 1)) as usize
    }
}

/// Region of a face sprite in the given row.
pub fn face_region(row: u32, position: FacePosition) -> Region {
    let (dx, dy) = position.offset();
    Region {
        x: dx,
        y: row * CELL_SIZE + dy,
        width: FACE_SIZE,
        height: FACE_SIZE,
    }
}

/// Region of the portrait in the given row and column (1-4).
pub fn portrait_region(row: u32, col: u32) -> Region {
    Region {
        x: col * CELL_SIZE,
        y: row * CELL_SIZE,
        width: CELL_SIZE,
        height: CELL_SIZE,
    }
}

/// All 40 slots of a sheet: every face sprite, then every portrait, each pass
/// in raster order. Name assignment depends on this order.
pub fn sheet_slots() -> Vec<Slot> {
    let mut slots = Vec::with_capacity(CHARACTER_SLOTS * 2);

    for row in 0..ROWS {
        for position in FacePosition::ALL {
            slots.push(Slot {
                kind: SlotKind::Face,
                row,
                sprite: position.sprite_number(),
                region: face_region(row, position),
            });
        }
    }

    for row in 0..ROWS {
        for col in 1..=SLOTS_PER_ROW {
            slots.push(Slot {
                kind: SlotKind::Portrait,
                row,
                sprite: col,
                region: portrait_region(row, col),
            });
        }
    }

    slots
}

/// Whether the sheet has the expected 160x160 layout.
pub fn has_expected_dimensions(sheet: &DynamicImage) -> bool {
    sheet.dimensions() == (SHEET_SIZE, SHEET_SIZE)
}

/// Copy a region out of the sheet, keeping the sheet's color type.
///
/// The result is always `region.width` x `region.height`. Pixels that fall
/// outside the sheet are zero (transparent black), so an undersized sheet
/// still yields full-size crops.
pub fn crop_region(sheet: &DynamicImage, region: Region) -> DynamicImage {
    match sheet {
        DynamicImage::ImageLuma8(img) => DynamicImage::ImageLuma8(padded_crop(img, region)),
        DynamicImage::ImageLumaA8(img) => DynamicImage::ImageLumaA8(padded_crop(img, region)),
        DynamicImage::ImageRgb8(img) => DynamicImage::ImageRgb8(padded_crop(img, region)),
        DynamicImage::ImageRgba8(img) => DynamicImage::ImageRgba8(padded_crop(img, region)),
        DynamicImage::ImageLuma16(img) => DynamicImage::ImageLuma16(padded_crop(img, region)),
        DynamicImage::ImageLumaA16(img) => DynamicImage::ImageLumaA16(padded_crop(img, region)),
        DynamicImage::ImageRgb16(img) => DynamicImage::ImageRgb16(padded_crop(img, region)),
        DynamicImage::ImageRgba16(img) => DynamicImage::ImageRgba16(padded_crop(img, region)),
        DynamicImage::ImageRgb32F(img) => DynamicImage::ImageRgb32F(padded_crop(img, region)),
        DynamicImage::ImageRgba32F(img) => DynamicImage::ImageRgba32F(padded_crop(img, region)),
        other => DynamicImage::ImageRgba16(padded_crop(&other.to_rgba16(), region)),
    }
}

fn padded_crop<P>(
    sheet: &ImageBuffer<P, Vec<P::Subpixel>>,
    region: Region,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
{
    let mut out = ImageBuffer::new(region.width, region.height);
    // crop_imm clips to the sheet bounds; paste the overlap at the origin
    let overlap = imageops::crop_imm(sheet, region.x, region.y, region.width, region.height)
        .to_image();
    imageops::replace(&mut out, &overlap, 0, 0);
    out
}
