use crate::foundation::core::{ColorType, ImageInfo};
use crate::pixels::pixmap::ImmutableData;

/// Read-only raster image wrapping detached pixel data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    info: ImageInfo,
    data: ImmutableData,
    row_bytes: usize,
}

impl RasterImage {
    /// Wrap `data` as an image described by `info` with the given stride.
    ///
    /// Returns `None` for empty or unknown-format descriptions, strides shorter than a row or not
    /// a multiple of the pixel size, and data blocks too small for the description.
    pub fn from_data(info: ImageInfo, data: ImmutableData, row_bytes: usize) -> Option<Self> {
        if info.is_empty() || info.color_type() == ColorType::Unknown {
            return None;
        }
        let min_row_bytes = info.min_row_bytes()?;
        if row_bytes < min_row_bytes || row_bytes % info.bytes_per_pixel() != 0 {
            return None;
        }
        if data.len() < info.compute_byte_size(row_bytes)? {
            return None;
        }
        Some(Self {
            info,
            data,
            row_bytes,
        })
    }

    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width()
    }

    pub fn height(&self) -> u32 {
        self.info.height()
    }

    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    pub fn data(&self) -> &ImmutableData {
        &self.data
    }

    /// Pixel bytes of row `y`, without stride padding.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height() {
            return None;
        }
        let start = y as usize * self.row_bytes;
        let len = self.width() as usize * self.info.bytes_per_pixel();
        self.data.as_bytes().get(start..start + len)
    }

    /// Copy of the pixels with stride padding removed.
    pub fn to_tight_bytes(&self) -> Vec<u8> {
        (0..self.height())
            .filter_map(|y| self.row(y))
            .flat_map(|row| row.iter().copied())
            .collect()
    }
}
