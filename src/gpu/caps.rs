use std::collections::HashMap;
use std::fmt;

use crate::foundation::core::ColorType;
use crate::gpu::format::{
    BackendApi, BackendFormat, FormatMapping, PixelConfig, gl, lookup_config, mapping, mtl, vk,
};

/// Per-config support: texturability and the ascending list of renderable sample counts.
///
/// An empty `sample_counts` list means the config cannot be rendered to at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatInfo {
    pub texturable: bool,
    pub sample_counts: Vec<u32>,
}

impl FormatInfo {
    pub fn texture_only() -> Self {
        Self {
            texturable: true,
            sample_counts: Vec::new(),
        }
    }

    pub fn render_only(sample_counts: &[u32]) -> Self {
        Self {
            texturable: false,
            sample_counts: sample_counts.to_vec(),
        }
    }

    pub fn renderable(sample_counts: &[u32]) -> Self {
        Self {
            texturable: true,
            sample_counts: sample_counts.to_vec(),
        }
    }
}

/// Support matrix keyed by [`PixelConfig`]. Configs without an entry are unsupported.
#[derive(Clone, Debug, Default)]
pub struct FormatTable {
    infos: HashMap<PixelConfig, FormatInfo>,
}

impl FormatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, config: PixelConfig, info: FormatInfo) -> Self {
        self.set(config, info);
        self
    }

    pub fn set(&mut self, config: PixelConfig, mut info: FormatInfo) {
        info.sample_counts.sort_unstable();
        info.sample_counts.dedup();
        self.infos.insert(config, info);
    }

    pub fn info(&self, config: PixelConfig) -> Option<&FormatInfo> {
        self.infos.get(&config)
    }

    pub fn is_texturable(&self, config: PixelConfig) -> bool {
        self.info(config).is_some_and(|i| i.texturable)
    }

    pub fn max_sample_count(&self, config: PixelConfig) -> u32 {
        self.info(config)
            .and_then(|i| i.sample_counts.last().copied())
            .unwrap_or(0)
    }

    /// Smallest supported sample count `>= requested`, or 0 when none exists.
    ///
    /// Requests of 0 are treated as 1. A single-sample request only succeeds when the config is
    /// renderable without multisampling.
    pub fn render_target_sample_count(&self, requested: u32, config: PixelConfig) -> u32 {
        let Some(info) = self.info(config) else {
            return 0;
        };
        let Some(&first) = info.sample_counts.first() else {
            return 0;
        };
        let requested = requested.max(1);
        if requested == 1 {
            return if first == 1 { 1 } else { 0 };
        }
        info.sample_counts
            .iter()
            .copied()
            .find(|&c| c >= requested)
            .unwrap_or(0)
    }
}

/// Driver/device level switches shared by every backend implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapsOptions {
    pub mipmap_support: bool,
    pub srgb_support: bool,
    /// Color-only supersampling with shared depth/stencil (e.g. `NV_framebuffer_mixed_samples`).
    pub mixed_samples: bool,
    pub max_texture_size: u32,
    /// Upper bound applied to every config's sample-count ladder.
    pub max_sample_count: u32,
}

impl Default for CapsOptions {
    fn default() -> Self {
        Self {
            mipmap_support: true,
            srgb_support: true,
            mixed_samples: false,
            max_texture_size: 8192,
            max_sample_count: 16,
        }
    }
}

/// Read-only capability queries for one GPU backend.
///
/// Implementations are built once when a context is created and then shared by `Arc` across
/// threads; none of the queries may mutate state.
pub trait Caps: Send + Sync + fmt::Debug {
    fn backend(&self) -> BackendApi;

    fn options(&self) -> &CapsOptions;

    fn format_table(&self) -> &FormatTable;

    /// Resolve a native format plus CPU color type into an internal config.
    ///
    /// Returns [`PixelConfig::Unknown`] for formats of another backend or unsupported pairs.
    fn config_from_backend_format(
        &self,
        format: &BackendFormat,
        color_type: ColorType,
    ) -> PixelConfig;

    fn mipmap_support(&self) -> bool {
        self.options().mipmap_support
    }

    fn srgb_support(&self) -> bool {
        self.options().srgb_support
    }

    fn uses_mixed_samples(&self) -> bool {
        self.options().mixed_samples
    }

    fn max_texture_size(&self) -> u32 {
        self.options().max_texture_size
    }

    fn is_config_texturable(&self, config: PixelConfig) -> bool {
        self.format_table().is_texturable(config)
    }

    fn is_config_renderable(&self, config: PixelConfig) -> bool {
        self.max_render_target_sample_count(config) > 0
    }

    fn max_render_target_sample_count(&self, config: PixelConfig) -> u32 {
        self.format_table().max_sample_count(config)
    }

    /// Clamp `requested` to a supported sample count for `config`; 0 means not renderable.
    fn render_target_sample_count(&self, requested: u32, config: PixelConfig) -> u32 {
        self.format_table()
            .render_target_sample_count(requested, config)
    }
}

fn msaa_ladder(max_sample_count: u32) -> Vec<u32> {
    [1, 2, 4, 8, 16]
        .into_iter()
        .filter(|&c| c <= max_sample_count.max(1))
        .collect()
}

/// Flavor of GL context; format support differs between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlStandard {
    Gl,
    Gles,
    WebGl,
}

const GL_MAPPINGS: &[FormatMapping] = &[
    mapping(gl::RGBA8, ColorType::Rgba8888, PixelConfig::Rgba8888),
    mapping(gl::SRGB8_ALPHA8, ColorType::Rgba8888, PixelConfig::Srgba8888),
    mapping(gl::R8, ColorType::Alpha8, PixelConfig::Alpha8),
    mapping(gl::ALPHA8, ColorType::Alpha8, PixelConfig::Alpha8),
    mapping(gl::R8, ColorType::Gray8, PixelConfig::Gray8),
    mapping(gl::LUMINANCE8, ColorType::Gray8, PixelConfig::Gray8),
    mapping(gl::RGB565, ColorType::Rgb565, PixelConfig::Rgb565),
    mapping(gl::RGB10_A2, ColorType::Rgba1010102, PixelConfig::Rgba1010102),
    mapping(gl::RGBA16F, ColorType::RgbaF16, PixelConfig::RgbaHalf),
];

/// Representative capabilities of an OpenGL, OpenGL ES or WebGL context.
///
/// The format table is a fixed approximation of common driver support, not a query of a real
/// context. Build a [`MockCaps`] or a custom [`Caps`] when exact answers matter.
#[derive(Clone, Debug)]
pub struct GlCaps {
    standard: GlStandard,
    options: CapsOptions,
    table: FormatTable,
}

impl GlCaps {
    pub fn new(standard: GlStandard, mut options: CapsOptions) -> Self {
        if standard == GlStandard::WebGl {
            // Mixed-sample extensions are never exposed through WebGL.
            options.mixed_samples = false;
        }
        let msaa = msaa_ladder(options.max_sample_count);

        let mut table = FormatTable::new()
            .with(PixelConfig::Alpha8, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Gray8, FormatInfo::texture_only())
            .with(PixelConfig::Rgb565, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Rgba8888, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Rgba1010102, FormatInfo::renderable(&msaa))
            .with(PixelConfig::RgbaHalf, FormatInfo::renderable(&[1]));
        if standard != GlStandard::WebGl {
            table.set(PixelConfig::Bgra8888, FormatInfo::renderable(&msaa));
        }
        if options.srgb_support {
            table.set(PixelConfig::Srgba8888, FormatInfo::renderable(&msaa));
        }

        Self {
            standard,
            options,
            table,
        }
    }

    pub fn standard(&self) -> GlStandard {
        self.standard
    }
}

impl Caps for GlCaps {
    fn backend(&self) -> BackendApi {
        BackendApi::OpenGl
    }

    fn options(&self) -> &CapsOptions {
        &self.options
    }

    fn format_table(&self) -> &FormatTable {
        &self.table
    }

    fn config_from_backend_format(
        &self,
        format: &BackendFormat,
        color_type: ColorType,
    ) -> PixelConfig {
        let Some(code) = format.code_for(BackendApi::OpenGl) else {
            return PixelConfig::Unknown;
        };
        if color_type == ColorType::Bgra8888 {
            // Desktop GL swizzles BGRA uploads into RGBA8 storage; ES needs the BGRA8 extension.
            return match (self.standard, code) {
                (GlStandard::Gl, gl::RGBA8) | (GlStandard::Gles, gl::BGRA8) => {
                    PixelConfig::Bgra8888
                }
                _ => PixelConfig::Unknown,
            };
        }
        lookup_config(GL_MAPPINGS, code, color_type)
    }
}

const VK_MAPPINGS: &[FormatMapping] = &[
    mapping(vk::R8G8B8A8_UNORM, ColorType::Rgba8888, PixelConfig::Rgba8888),
    mapping(vk::R8G8B8A8_SRGB, ColorType::Rgba8888, PixelConfig::Srgba8888),
    mapping(vk::B8G8R8A8_UNORM, ColorType::Bgra8888, PixelConfig::Bgra8888),
    mapping(vk::B8G8R8A8_SRGB, ColorType::Bgra8888, PixelConfig::Sbgra8888),
    mapping(vk::R8_UNORM, ColorType::Alpha8, PixelConfig::Alpha8),
    mapping(vk::R8_UNORM, ColorType::Gray8, PixelConfig::Gray8),
    mapping(vk::R5G6B5_UNORM_PACK16, ColorType::Rgb565, PixelConfig::Rgb565),
    mapping(
        vk::A2B10G10R10_UNORM_PACK32,
        ColorType::Rgba1010102,
        PixelConfig::Rgba1010102,
    ),
    mapping(vk::R16G16B16A16_SFLOAT, ColorType::RgbaF16, PixelConfig::RgbaHalf),
];

/// Representative capabilities of a Vulkan device, from a fixed table like [`GlCaps`].
#[derive(Clone, Debug)]
pub struct VulkanCaps {
    options: CapsOptions,
    table: FormatTable,
}

impl VulkanCaps {
    pub fn new(mut options: CapsOptions) -> Self {
        options.mixed_samples = false;
        let msaa = msaa_ladder(options.max_sample_count);

        let mut table = FormatTable::new()
            .with(PixelConfig::Alpha8, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Gray8, FormatInfo::texture_only())
            .with(PixelConfig::Rgb565, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Rgba8888, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Bgra8888, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Rgba1010102, FormatInfo::renderable(&msaa))
            .with(PixelConfig::RgbaHalf, FormatInfo::renderable(&msaa));
        if options.srgb_support {
            table.set(PixelConfig::Srgba8888, FormatInfo::renderable(&msaa));
            table.set(PixelConfig::Sbgra8888, FormatInfo::renderable(&msaa));
        }

        Self { options, table }
    }
}

impl Caps for VulkanCaps {
    fn backend(&self) -> BackendApi {
        BackendApi::Vulkan
    }

    fn options(&self) -> &CapsOptions {
        &self.options
    }

    fn format_table(&self) -> &FormatTable {
        &self.table
    }

    fn config_from_backend_format(
        &self,
        format: &BackendFormat,
        color_type: ColorType,
    ) -> PixelConfig {
        format
            .code_for(BackendApi::Vulkan)
            .map(|code| lookup_config(VK_MAPPINGS, code, color_type))
            .unwrap_or(PixelConfig::Unknown)
    }
}

const MTL_MAPPINGS: &[FormatMapping] = &[
    mapping(mtl::RGBA8_UNORM, ColorType::Rgba8888, PixelConfig::Rgba8888),
    mapping(mtl::RGBA8_UNORM_SRGB, ColorType::Rgba8888, PixelConfig::Srgba8888),
    mapping(mtl::BGRA8_UNORM, ColorType::Bgra8888, PixelConfig::Bgra8888),
    mapping(mtl::BGRA8_UNORM_SRGB, ColorType::Bgra8888, PixelConfig::Sbgra8888),
    mapping(mtl::R8_UNORM, ColorType::Alpha8, PixelConfig::Alpha8),
    mapping(mtl::A8_UNORM, ColorType::Alpha8, PixelConfig::Alpha8),
    mapping(mtl::R8_UNORM, ColorType::Gray8, PixelConfig::Gray8),
    mapping(mtl::B5G6R5_UNORM, ColorType::Rgb565, PixelConfig::Rgb565),
    mapping(mtl::RGB10A2_UNORM, ColorType::Rgba1010102, PixelConfig::Rgba1010102),
    mapping(mtl::RGBA16_FLOAT, ColorType::RgbaF16, PixelConfig::RgbaHalf),
];

/// Representative capabilities of a Metal device, from a fixed table like [`GlCaps`].
/// Mipmaps are always available.
#[derive(Clone, Debug)]
pub struct MetalCaps {
    options: CapsOptions,
    table: FormatTable,
}

impl MetalCaps {
    pub fn new(mut options: CapsOptions) -> Self {
        options.mixed_samples = false;
        options.mipmap_support = true;
        let msaa: Vec<u32> = msaa_ladder(options.max_sample_count)
            .into_iter()
            .filter(|&c| c <= 8)
            .collect();

        let mut table = FormatTable::new()
            .with(PixelConfig::Alpha8, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Gray8, FormatInfo::texture_only())
            .with(PixelConfig::Rgb565, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Rgba8888, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Bgra8888, FormatInfo::renderable(&msaa))
            .with(PixelConfig::Rgba1010102, FormatInfo::renderable(&msaa))
            .with(PixelConfig::RgbaHalf, FormatInfo::renderable(&msaa));
        if options.srgb_support {
            table.set(PixelConfig::Srgba8888, FormatInfo::renderable(&msaa));
            table.set(PixelConfig::Sbgra8888, FormatInfo::renderable(&msaa));
        }

        Self { options, table }
    }
}

impl Caps for MetalCaps {
    fn backend(&self) -> BackendApi {
        BackendApi::Metal
    }

    fn options(&self) -> &CapsOptions {
        &self.options
    }

    fn format_table(&self) -> &FormatTable {
        &self.table
    }

    fn config_from_backend_format(
        &self,
        format: &BackendFormat,
        color_type: ColorType,
    ) -> PixelConfig {
        format
            .code_for(BackendApi::Metal)
            .map(|code| lookup_config(MTL_MAPPINGS, code, color_type))
            .unwrap_or(PixelConfig::Unknown)
    }
}

/// Fully configurable capabilities for tests and tooling.
///
/// Mock backend formats name their config directly; the color type must still match it.
#[derive(Clone, Debug)]
pub struct MockCaps {
    options: CapsOptions,
    table: FormatTable,
}

impl MockCaps {
    pub fn new(options: CapsOptions, table: FormatTable) -> Self {
        Self { options, table }
    }

    /// Every config texturable and renderable with the options' sample-count ladder.
    pub fn permissive(options: CapsOptions) -> Self {
        let msaa = msaa_ladder(options.max_sample_count);
        let table = PixelConfig::ALL
            .into_iter()
            .fold(FormatTable::new(), |t, c| {
                t.with(c, FormatInfo::renderable(&msaa))
            });
        Self::new(options, table)
    }
}

impl Default for MockCaps {
    fn default() -> Self {
        Self::permissive(CapsOptions::default())
    }
}

impl Caps for MockCaps {
    fn backend(&self) -> BackendApi {
        BackendApi::Mock
    }

    fn options(&self) -> &CapsOptions {
        &self.options
    }

    fn format_table(&self) -> &FormatTable {
        &self.table
    }

    fn config_from_backend_format(
        &self,
        format: &BackendFormat,
        color_type: ColorType,
    ) -> PixelConfig {
        let Some(code) = format.code_for(BackendApi::Mock) else {
            return PixelConfig::Unknown;
        };
        let config = PixelConfig::from_code(code);
        if config.matches_color_type(color_type) {
            config
        } else {
            PixelConfig::Unknown
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/caps.rs"]
mod tests;
