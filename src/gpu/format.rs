use crate::foundation::core::ColorType;

/// GPU API family a format or capability set belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BackendApi {
    OpenGl,
    Vulkan,
    Metal,
    WebGpu,
    Mock,
}

/// Native GL sized internal formats.
pub mod gl {
    pub const RGBA8: u32 = 0x8058;
    pub const RGB10_A2: u32 = 0x8059;
    pub const ALPHA8: u32 = 0x803C;
    pub const LUMINANCE8: u32 = 0x8040;
    pub const R8: u32 = 0x8229;
    pub const RGBA16F: u32 = 0x881A;
    pub const SRGB8_ALPHA8: u32 = 0x8C43;
    pub const RGB565: u32 = 0x8D62;
    pub const BGRA8: u32 = 0x93A1;
}

/// Native `VkFormat` values.
pub mod vk {
    pub const R5G6B5_UNORM_PACK16: u32 = 4;
    pub const R8_UNORM: u32 = 9;
    pub const R8G8B8A8_UNORM: u32 = 37;
    pub const R8G8B8A8_SRGB: u32 = 43;
    pub const B8G8R8A8_UNORM: u32 = 44;
    pub const B8G8R8A8_SRGB: u32 = 50;
    pub const A2B10G10R10_UNORM_PACK32: u32 = 64;
    pub const R16G16B16A16_SFLOAT: u32 = 97;
}

/// Native `MTLPixelFormat` values.
pub mod mtl {
    pub const A8_UNORM: u32 = 1;
    pub const R8_UNORM: u32 = 10;
    pub const B5G6R5_UNORM: u32 = 40;
    pub const RGBA8_UNORM: u32 = 70;
    pub const RGBA8_UNORM_SRGB: u32 = 71;
    pub const BGRA8_UNORM: u32 = 80;
    pub const BGRA8_UNORM_SRGB: u32 = 81;
    pub const RGB10A2_UNORM: u32 = 90;
    pub const RGBA16_FLOAT: u32 = 115;
}

/// Stable codes for WebGPU texture formats.
pub mod webgpu {
    pub const R8_UNORM: u32 = 1;
    pub const RGBA8_UNORM: u32 = 2;
    pub const RGBA8_UNORM_SRGB: u32 = 3;
    pub const BGRA8_UNORM: u32 = 4;
    pub const BGRA8_UNORM_SRGB: u32 = 5;
    pub const RGB10A2_UNORM: u32 = 6;
    pub const RGBA16_FLOAT: u32 = 7;
}

/// Backend-native texture format, tagged with its API.
///
/// The default value is invalid and never resolves to a [`PixelConfig`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BackendFormat {
    native: Option<(BackendApi, u32)>,
}

impl BackendFormat {
    pub fn gl(internal_format: u32) -> Self {
        Self::native(BackendApi::OpenGl, internal_format)
    }

    pub fn vk(vk_format: u32) -> Self {
        Self::native(BackendApi::Vulkan, vk_format)
    }

    pub fn mtl(pixel_format: u32) -> Self {
        Self::native(BackendApi::Metal, pixel_format)
    }

    pub fn webgpu(code: u32) -> Self {
        Self::native(BackendApi::WebGpu, code)
    }

    /// Mock formats name a [`PixelConfig`] directly.
    pub fn mock(config: PixelConfig) -> Self {
        if config == PixelConfig::Unknown {
            return Self::invalid();
        }
        Self::native(BackendApi::Mock, config as u32)
    }

    pub fn invalid() -> Self {
        Self { native: None }
    }

    fn native(backend: BackendApi, code: u32) -> Self {
        // Zero is the "undefined" value in every native enum we accept.
        if code == 0 {
            return Self::invalid();
        }
        Self {
            native: Some((backend, code)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.native.is_some()
    }

    pub fn backend(&self) -> Option<BackendApi> {
        self.native.map(|(backend, _)| backend)
    }

    /// Native code when this format belongs to `backend`.
    pub fn code_for(&self, backend: BackendApi) -> Option<u32> {
        match self.native {
            Some((b, code)) if b == backend => Some(code),
            _ => None,
        }
    }
}

/// Backend-independent internal pixel format.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(u32)]
pub enum PixelConfig {
    #[default]
    Unknown = 0,
    Alpha8 = 1,
    Gray8 = 2,
    Rgb565 = 3,
    Rgba8888 = 4,
    Bgra8888 = 5,
    Srgba8888 = 6,
    Sbgra8888 = 7,
    Rgba1010102 = 8,
    RgbaHalf = 9,
}

impl PixelConfig {
    pub const ALL: [PixelConfig; 9] = [
        PixelConfig::Alpha8,
        PixelConfig::Gray8,
        PixelConfig::Rgb565,
        PixelConfig::Rgba8888,
        PixelConfig::Bgra8888,
        PixelConfig::Srgba8888,
        PixelConfig::Sbgra8888,
        PixelConfig::Rgba1010102,
        PixelConfig::RgbaHalf,
    ];

    pub fn from_code(code: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| *c as u32 == code)
            .unwrap_or(PixelConfig::Unknown)
    }

    pub fn is_srgb(self) -> bool {
        matches!(self, PixelConfig::Srgba8888 | PixelConfig::Sbgra8888)
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelConfig::Unknown => 0,
            PixelConfig::Alpha8 | PixelConfig::Gray8 => 1,
            PixelConfig::Rgb565 => 2,
            PixelConfig::Rgba8888
            | PixelConfig::Bgra8888
            | PixelConfig::Srgba8888
            | PixelConfig::Sbgra8888
            | PixelConfig::Rgba1010102 => 4,
            PixelConfig::RgbaHalf => 8,
        }
    }

    /// Whether CPU data of `color_type` can be stored in this config.
    pub fn matches_color_type(self, color_type: ColorType) -> bool {
        matches!(
            (self, color_type),
            (PixelConfig::Alpha8, ColorType::Alpha8)
                | (PixelConfig::Gray8, ColorType::Gray8)
                | (PixelConfig::Rgb565, ColorType::Rgb565)
                | (PixelConfig::Rgba8888, ColorType::Rgba8888)
                | (PixelConfig::Srgba8888, ColorType::Rgba8888)
                | (PixelConfig::Bgra8888, ColorType::Bgra8888)
                | (PixelConfig::Sbgra8888, ColorType::Bgra8888)
                | (PixelConfig::Rgba1010102, ColorType::Rgba1010102)
                | (PixelConfig::RgbaHalf, ColorType::RgbaF16)
        )
    }
}

/// One row of a backend's `(native code, color type) -> config` table.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FormatMapping {
    pub(crate) code: u32,
    pub(crate) color_type: ColorType,
    pub(crate) config: PixelConfig,
}

pub(crate) const fn mapping(code: u32, color_type: ColorType, config: PixelConfig) -> FormatMapping {
    FormatMapping {
        code,
        color_type,
        config,
    }
}

pub(crate) fn lookup_config(
    table: &[FormatMapping],
    code: u32,
    color_type: ColorType,
) -> PixelConfig {
    table
        .iter()
        .find(|m| m.code == code && m.color_type == color_type)
        .map(|m| m.config)
        .unwrap_or(PixelConfig::Unknown)
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/format.rs"]
mod tests;
