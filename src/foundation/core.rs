pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Integer rectangle in device space, stored as left/top/right/bottom edges.
///
/// `right` and `bottom` are exclusive. An inverted rectangle reports a negative width or height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct IRect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl IRect {
    /// Create a rectangle from its four edges.
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle anchored at the origin.
    pub const fn from_wh(width: i32, height: i32) -> Self {
        Self::from_ltrb(0, 0, width, height)
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::from_ltrb(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    pub fn width(self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Return `true` when the rectangle encloses no pixels.
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }

    /// Convert to a floating-point [`Rect`].
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }
}

/// Pixel layout of a CPU-side image.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ColorType {
    #[default]
    Unknown,
    Alpha8,
    Rgb565,
    Rgba8888,
    Bgra8888,
    Rgba1010102,
    Gray8,
    RgbaF16,
}

impl ColorType {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Unknown => 0,
            ColorType::Alpha8 | ColorType::Gray8 => 1,
            ColorType::Rgb565 => 2,
            ColorType::Rgba8888 | ColorType::Bgra8888 | ColorType::Rgba1010102 => 4,
            ColorType::RgbaF16 => 8,
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum AlphaType {
    #[default]
    Unknown,
    Opaque,
    Premul,
    Unpremul,
}

/// Color space attached to an image description.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ColorSpace {
    /// No color space; pixel values are interpreted as device values.
    #[default]
    None,
    Srgb,
    SrgbLinear,
    DisplayP3,
}

/// Dimensions and pixel interpretation of an image or surface.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ImageInfo {
    width: u32,
    height: u32,
    color_type: ColorType,
    alpha_type: AlphaType,
    color_space: ColorSpace,
}

impl ImageInfo {
    pub fn new(
        width: u32,
        height: u32,
        color_type: ColorType,
        alpha_type: AlphaType,
        color_space: ColorSpace,
    ) -> Self {
        Self {
            width,
            height,
            color_type,
            alpha_type,
            color_space,
        }
    }

    /// Single-channel coverage layout used for masks.
    pub fn make_a8(width: u32, height: u32) -> Self {
        Self::new(
            width,
            height,
            ColorType::Alpha8,
            AlphaType::Premul,
            ColorSpace::None,
        )
    }

    /// Premultiplied 8-bit RGBA with the given color space.
    pub fn make_n32_premul(width: u32, height: u32, color_space: ColorSpace) -> Self {
        Self::new(
            width,
            height,
            ColorType::Rgba8888,
            AlphaType::Premul,
            color_space,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    pub fn alpha_type(&self) -> AlphaType {
        self.alpha_type
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.color_type.bytes_per_pixel()
    }

    /// Tightly packed row stride, or `None` on overflow.
    pub fn min_row_bytes(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.bytes_per_pixel())
    }

    /// Bytes needed to address every pixel with the given stride.
    ///
    /// The last row only needs `min_row_bytes`, matching how strided images are sliced.
    pub fn compute_byte_size(&self, row_bytes: usize) -> Option<usize> {
        if self.height == 0 {
            return Some(0);
        }
        let last_row = self.min_row_bytes()?;
        row_bytes
            .checked_mul(self.height as usize - 1)?
            .checked_add(last_row)
    }

    /// Copy with different dimensions.
    pub fn make_wh(&self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..*self
        }
    }

    /// Copy with a different color space.
    pub fn make_color_space(&self, color_space: ColorSpace) -> Self {
        Self {
            color_space,
            ..*self
        }
    }
}

/// Vertical orientation of a GPU surface.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum SurfaceOrigin {
    #[default]
    TopLeft,
    BottomLeft,
}

/// Subpixel arrangement used for LCD text.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum PixelGeometry {
    #[default]
    Unknown,
    RgbHorizontal,
    BgrHorizontal,
    RgbVertical,
    BgrVertical,
}

/// Text-rendering hints carried with a surface.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SurfaceProps {
    pub pixel_geometry: PixelGeometry,
    pub use_device_independent_fonts: bool,
}

impl SurfaceProps {
    pub fn new(pixel_geometry: PixelGeometry) -> Self {
        Self {
            pixel_geometry,
            use_device_independent_fonts: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
