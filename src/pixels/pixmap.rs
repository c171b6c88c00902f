use std::sync::Arc;

use crate::foundation::core::{ColorType, ImageInfo};
use crate::foundation::error::{SurfmaskError, SurfmaskResult};

/// Shared, read-only byte block produced by detaching a pixmap's storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImmutableData(Arc<[u8]>);

impl ImmutableData {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ImmutableData {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

/// Exclusively owned CPU pixel storage for an 8-bit-per-channel image.
///
/// Storage is `None` until [`AlphaPixmap::try_alloc`] succeeds and again after
/// [`AlphaPixmap::detach_pixels_as_data`].
#[derive(Debug, Default)]
pub struct AlphaPixmap {
    info: ImageInfo,
    row_bytes: usize,
    pixels: Option<Vec<u8>>,
}

impl AlphaPixmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate tightly packed storage for `info`. Existing storage is released first.
    ///
    /// Fails when the color type has no byte layout, the size overflows, or the allocator
    /// refuses the request. Contents are unspecified until [`AlphaPixmap::erase`].
    pub fn try_alloc(&mut self, info: ImageInfo) -> SurfmaskResult<()> {
        self.reset();
        if info.color_type() == ColorType::Unknown {
            return Err(SurfmaskError::validation(
                "cannot allocate pixels for an unknown color type",
            ));
        }
        let row_bytes = info
            .min_row_bytes()
            .ok_or_else(|| SurfmaskError::allocation("pixmap row size overflows"))?;
        let byte_len = info
            .compute_byte_size(row_bytes)
            .ok_or_else(|| SurfmaskError::allocation("pixmap byte size overflows"))?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(byte_len).map_err(|e| {
            SurfmaskError::allocation(format!("pixmap of {byte_len} bytes: {e}"))
        })?;
        pixels.resize(byte_len, 0);

        self.info = info;
        self.row_bytes = row_bytes;
        self.pixels = Some(pixels);
        Ok(())
    }

    /// Release storage and forget dimensions.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_allocated(&self) -> bool {
        self.pixels.is_some()
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

    /// Fill every byte with `value`.
    pub fn erase(&mut self, value: u8) {
        if let Some(pixels) = self.pixels.as_mut() {
            pixels.fill(value);
        }
    }

    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_deref().unwrap_or(&[])
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.pixels.as_deref_mut().unwrap_or(&mut [])
    }

    /// Byte at `(x, y)` for one-byte-per-pixel layouts.
    pub fn get_u8(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width() || y >= self.height() || self.info.bytes_per_pixel() != 1 {
            return None;
        }
        self.pixels()
            .get(y as usize * self.row_bytes + x as usize)
            .copied()
    }

    /// Move storage out as immutable data, leaving this pixmap empty.
    ///
    /// Returns `None` when nothing is allocated or the allocation holds zero bytes.
    pub fn detach_pixels_as_data(&mut self) -> Option<ImmutableData> {
        let pixels = self.pixels.take()?;
        self.reset();
        if pixels.is_empty() {
            return None;
        }
        Some(ImmutableData::from(pixels))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixels/pixmap.rs"]
mod tests;
