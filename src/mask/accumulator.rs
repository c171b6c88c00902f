use kurbo::{Affine, Rect, Vec2};

use crate::foundation::core::{IRect, ImageInfo};
use crate::foundation::error::{SurfmaskError, SurfmaskResult};
use crate::gpu::texture::{
    BackingFit, Budgeted, InternalSurfaceFlags, SurfaceFlags, TextureProvider, TextureProxy,
};
use crate::mask::ops::{ClipOp, blend_row, op_to_mode};
use crate::mask::raster::{CoverageRasterizer, VelloRasterizer};
use crate::mask::shape::Shape;
use crate::pixels::image::RasterImage;
use crate::pixels::pixmap::AlphaPixmap;

/// Accumulator configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskOpts {
    /// Largest accepted width or height for [`MaskAccumulator::init`].
    pub max_dimension: u32,
    /// Request a zero-cleared backing store when the mask is uploaded.
    pub initial_clear: bool,
    /// Flattening tolerance for curves and stroke expansion, in pixels.
    pub tolerance: f64,
}

impl Default for MaskOpts {
    fn default() -> Self {
        Self {
            max_dimension: 8192,
            initial_clear: cfg!(feature = "webgl"),
            tolerance: 0.1,
        }
    }
}

impl MaskOpts {
    /// Defaults overridden by `SURFMASK_MASK_MAX_DIM` and `SURFMASK_INITIAL_CLEAR`.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();
        if let Some(max) = lookup("SURFMASK_MASK_MAX_DIM")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            opts.max_dimension = max;
        }
        if let Some(clear) = lookup("SURFMASK_INITIAL_CLEAR").and_then(|v| parse_flag(&v)) {
            opts.initial_clear = clear;
        }
        opts
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Software A8 coverage buffer built by compositing clip elements, then uploaded as a texture.
///
/// Lifecycle: [`init`](Self::init), any number of `composite_*` calls, then one
/// [`finalize`](Self::finalize) which moves the pixels out. Device space is mapped onto the
/// buffer by translating by `-bounds.origin`.
#[derive(Debug)]
pub struct MaskAccumulator<R = VelloRasterizer> {
    opts: MaskOpts,
    rasterizer: R,
    pixmap: AlphaPixmap,
    bounds: IRect,
    translation: Vec2,
    coverage: Vec<u8>,
}

impl Default for MaskAccumulator<VelloRasterizer> {
    fn default() -> Self {
        Self::new(MaskOpts::default())
    }
}

impl MaskAccumulator<VelloRasterizer> {
    pub fn new(opts: MaskOpts) -> Self {
        Self::with_rasterizer(opts, VelloRasterizer::new())
    }
}

impl<R: CoverageRasterizer> MaskAccumulator<R> {
    pub fn with_rasterizer(opts: MaskOpts, rasterizer: R) -> Self {
        Self {
            opts,
            rasterizer,
            pixmap: AlphaPixmap::new(),
            bounds: IRect::default(),
            translation: Vec2::ZERO,
            coverage: Vec::new(),
        }
    }

    pub fn opts(&self) -> &MaskOpts {
        &self.opts
    }

    /// Device-space area covered by the buffer.
    pub fn bounds(&self) -> IRect {
        self.bounds
    }

    /// Offset applied to every element before rasterization (`-bounds.origin`).
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The accumulated coverage, row-major and tightly packed. Empty after `finalize`.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.pixels()
    }

    /// Coverage at buffer coordinate `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.get_u8(x, y)
    }

    /// Allocate a zeroed buffer for `bounds`. Zero-area bounds are accepted; inverted bounds are
    /// not.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn init(&mut self, bounds: IRect) -> SurfmaskResult<()> {
        let (Ok(width), Ok(height)) =
            (u32::try_from(bounds.width()), u32::try_from(bounds.height()))
        else {
            self.pixmap.reset();
            tracing::debug!("negative mask dimensions");
            return Err(SurfmaskError::validation(format!(
                "mask bounds {}x{} have a negative dimension",
                bounds.width(),
                bounds.height()
            )));
        };
        let max = self.opts.max_dimension;
        if width > max || height > max {
            self.pixmap.reset();
            return Err(SurfmaskError::allocation(format!(
                "mask {width}x{height} exceeds max dimension {max}"
            )));
        }

        self.pixmap.try_alloc(ImageInfo::make_a8(width, height))?;
        self.pixmap.erase(0);
        self.bounds = bounds;
        self.translation = Vec2::new(-f64::from(bounds.left), -f64::from(bounds.top));
        Ok(())
    }

    /// Composite a device-space rectangle (under `transform`) with `op`.
    ///
    /// Rectangles always blend through the op's blend mode, `Replace` included.
    pub fn composite_rect(
        &mut self,
        rect: Rect,
        transform: Affine,
        op: ClipOp,
        anti_alias: bool,
        alpha: u8,
    ) -> SurfmaskResult<()> {
        self.composite(&Shape::rect(rect), transform, op, anti_alias, alpha, false)
    }

    /// Composite a styled shape (under `transform`) with `op`.
    ///
    /// `Replace` at full alpha writes coverage straight into the buffer; every other combination
    /// goes through the op's blend mode.
    pub fn composite_shape(
        &mut self,
        shape: &Shape,
        transform: Affine,
        op: ClipOp,
        anti_alias: bool,
        alpha: u8,
    ) -> SurfmaskResult<()> {
        self.composite(shape, transform, op, anti_alias, alpha, true)
    }

    fn composite(
        &mut self,
        shape: &Shape,
        transform: Affine,
        op: ClipOp,
        anti_alias: bool,
        alpha: u8,
        replace_fast_path: bool,
    ) -> SurfmaskResult<()> {
        if !self.pixmap.is_allocated() {
            return Err(SurfmaskError::validation(
                "mask accumulator is not initialized or was already finalized",
            ));
        }
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        if width == 0 || height == 0 {
            return Ok(());
        }

        let (path, fill_type) = shape.to_fill_path(self.opts.tolerance);
        let matrix = Affine::translate(self.translation) * transform;
        self.coverage.resize(width as usize * height as usize, 0);
        self.rasterizer.fill_coverage(
            &path,
            matrix,
            fill_type.is_even_odd(),
            anti_alias,
            width,
            height,
            &mut self.coverage,
        )?;
        if fill_type.is_inverse() {
            invert(&mut self.coverage);
        }

        let row_bytes = self.pixmap.row_bytes();
        let dst = self.pixmap.pixels_mut();
        let rows = dst
            .chunks_mut(row_bytes)
            .zip(self.coverage.chunks(width as usize));
        if replace_fast_path && op == ClipOp::Replace && alpha == 0xFF {
            for (dst_row, cov_row) in rows {
                for (d, &c) in dst_row.iter_mut().zip(cov_row) {
                    if c != 0 {
                        *d = c;
                    }
                }
            }
        } else {
            let mode = op_to_mode(op);
            for (dst_row, cov_row) in rows {
                blend_row(mode, alpha, cov_row, dst_row);
            }
        }
        Ok(())
    }

    /// Hand the buffer to `provider` as an A8 texture.
    ///
    /// Returns `None` when there is nothing to upload (already finalized, never initialized, or
    /// zero-area) or when the provider cannot allocate. The buffer is released either way.
    #[tracing::instrument(level = "debug", skip(self, provider))]
    pub fn finalize(
        &mut self,
        provider: &mut dyn TextureProvider,
        fit: BackingFit,
    ) -> Option<TextureProxy> {
        let info = *self.pixmap.info();
        let row_bytes = self.pixmap.row_bytes();
        let Some(data) = self.pixmap.detach_pixels_as_data() else {
            tracing::debug!("no pixel data to detach");
            return None;
        };
        let Some(image) = RasterImage::from_data(info, data, row_bytes) else {
            tracing::debug!("detached pixels do not form an image");
            return None;
        };

        let internal_flags = if provider.rendering_directly() {
            InternalSurfaceFlags::empty()
        } else {
            InternalSurfaceFlags::NO_PENDING_IO
        };
        let surface_flags = if self.opts.initial_clear {
            SurfaceFlags::PERFORM_INITIAL_CLEAR
        } else {
            SurfaceFlags::empty()
        };

        let proxy = provider.create_texture_proxy(
            image,
            surface_flags,
            1,
            Budgeted::Yes,
            fit,
            internal_flags,
        );
        if proxy.is_none() {
            tracing::debug!("texture provider refused the mask");
        }
        proxy
    }
}

fn invert(coverage: &mut [u8]) {
    for c in coverage {
        *c = 255 - *c;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/accumulator.rs"]
mod tests;
