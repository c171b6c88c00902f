//! `wgpu`-backed capability discovery and texture upload.

use std::collections::HashMap;

use crate::foundation::core::ColorType;
use crate::foundation::error::{SurfmaskError, SurfmaskResult};
use crate::gpu::caps::{Caps, CapsOptions, FormatInfo, FormatTable};
use crate::gpu::format::{
    BackendApi, BackendFormat, FormatMapping, PixelConfig, lookup_config, mapping, webgpu,
};
use crate::gpu::texture::{
    BackingFit, Budgeted, InternalSurfaceFlags, SurfaceFlags, TextureProvider, TextureProxy,
    TextureProxyId, config_for_image,
};
use crate::pixels::image::RasterImage;

const WEBGPU_MAPPINGS: &[FormatMapping] = &[
    mapping(webgpu::R8_UNORM, ColorType::Alpha8, PixelConfig::Alpha8),
    mapping(webgpu::R8_UNORM, ColorType::Gray8, PixelConfig::Gray8),
    mapping(webgpu::RGBA8_UNORM, ColorType::Rgba8888, PixelConfig::Rgba8888),
    mapping(webgpu::RGBA8_UNORM_SRGB, ColorType::Rgba8888, PixelConfig::Srgba8888),
    mapping(webgpu::BGRA8_UNORM, ColorType::Bgra8888, PixelConfig::Bgra8888),
    mapping(webgpu::BGRA8_UNORM_SRGB, ColorType::Bgra8888, PixelConfig::Sbgra8888),
    mapping(webgpu::RGB10A2_UNORM, ColorType::Rgba1010102, PixelConfig::Rgba1010102),
    mapping(webgpu::RGBA16_FLOAT, ColorType::RgbaF16, PixelConfig::RgbaHalf),
];

/// `wgpu` texture format backing `config`, if WebGPU has one.
pub fn texture_format(config: PixelConfig) -> Option<wgpu::TextureFormat> {
    use wgpu::TextureFormat as F;
    Some(match config {
        PixelConfig::Alpha8 | PixelConfig::Gray8 => F::R8Unorm,
        PixelConfig::Rgba8888 => F::Rgba8Unorm,
        PixelConfig::Srgba8888 => F::Rgba8UnormSrgb,
        PixelConfig::Bgra8888 => F::Bgra8Unorm,
        PixelConfig::Sbgra8888 => F::Bgra8UnormSrgb,
        PixelConfig::Rgba1010102 => F::Rgb10a2Unorm,
        PixelConfig::RgbaHalf => F::Rgba16Float,
        PixelConfig::Rgb565 | PixelConfig::Unknown => return None,
    })
}

/// Capabilities queried from a live adapter.
#[derive(Clone, Debug)]
pub struct WgpuCaps {
    options: CapsOptions,
    table: FormatTable,
    adapter_name: String,
}

impl WgpuCaps {
    pub fn from_adapter(adapter: &wgpu::Adapter) -> Self {
        let limits = adapter.limits();
        let options = CapsOptions {
            mipmap_support: true,
            srgb_support: true,
            mixed_samples: false,
            max_texture_size: limits.max_texture_dimension_2d,
            max_sample_count: 16,
        };

        let mut table = FormatTable::new();
        for config in PixelConfig::ALL {
            let Some(format) = texture_format(config) else {
                continue;
            };
            let features = adapter.get_texture_format_features(format);
            let texturable = features
                .allowed_usages
                .contains(wgpu::TextureUsages::TEXTURE_BINDING);
            let sample_counts: Vec<u32> = if features
                .allowed_usages
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
            {
                [1, 2, 4, 8, 16]
                    .into_iter()
                    .filter(|&c| c == 1 || features.flags.sample_count_supported(c))
                    .collect()
            } else {
                Vec::new()
            };
            table.set(
                config,
                FormatInfo {
                    texturable,
                    sample_counts,
                },
            );
        }

        let adapter_name = adapter.get_info().name;
        tracing::debug!(adapter = %adapter_name, "wgpu caps discovered");
        Self {
            options,
            table,
            adapter_name,
        }
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }
}

impl Caps for WgpuCaps {
    fn backend(&self) -> BackendApi {
        BackendApi::WebGpu
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
            .code_for(BackendApi::WebGpu)
            .map(|code| lookup_config(WEBGPU_MAPPINGS, code, color_type))
            .unwrap_or(PixelConfig::Unknown)
    }
}

/// Request a default adapter, device and queue without a presentation surface.
pub fn headless() -> SurfmaskResult<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .map_err(|e| match e {
        wgpu::RequestAdapterError::NotFound { .. } => SurfmaskError::gpu("no gpu adapter available"),
        other => SurfmaskError::gpu(format!("wgpu request_adapter failed: {other:?}")),
    })?;

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("surfmask"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::downlevel_defaults(),
        experimental_features: wgpu::ExperimentalFeatures::default(),
        memory_hints: wgpu::MemoryHints::MemoryUsage,
        trace: wgpu::Trace::Off,
    }))
    .map_err(|e| SurfmaskError::gpu(format!("wgpu request_device failed: {e:?}")))?;

    Ok((adapter, device, queue))
}

/// [`TextureProvider`] that uploads immediately through a `wgpu` queue.
#[derive(Debug)]
pub struct WgpuTextureProvider {
    device: wgpu::Device,
    queue: wgpu::Queue,
    max_texture_size: u32,
    next_id: u32,
    textures: HashMap<TextureProxyId, wgpu::Texture>,
}

impl WgpuTextureProvider {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let max_texture_size = device.limits().max_texture_dimension_2d;
        Self {
            device,
            queue,
            max_texture_size,
            next_id: 1,
            textures: HashMap::new(),
        }
    }

    pub fn texture(&self, id: TextureProxyId) -> Option<&wgpu::Texture> {
        self.textures.get(&id)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn write(
        &self,
        texture: &wgpu::Texture,
        bytes: &[u8],
        bytes_per_row: u32,
        width: u32,
        height: u32,
    ) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

impl TextureProvider for WgpuTextureProvider {
    fn rendering_directly(&self) -> bool {
        true
    }

    fn create_texture_proxy(
        &mut self,
        image: RasterImage,
        surface_flags: SurfaceFlags,
        sample_count: u32,
        budgeted: Budgeted,
        fit: BackingFit,
        internal_flags: InternalSurfaceFlags,
    ) -> Option<TextureProxy> {
        let config = config_for_image(&image);
        let format = texture_format(config)?;
        let (width, height) = (image.width(), image.height());
        if width > self.max_texture_size || height > self.max_texture_size {
            tracing::debug!(width, height, "texture exceeds adapter limit");
            return None;
        }
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("surfmask_mask"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        self.write(
            &texture,
            image.data().as_bytes(),
            u32::try_from(image.row_bytes()).ok()?,
            width,
            height,
        );

        let id = TextureProxyId(self.next_id);
        self.next_id += 1;
        self.textures.insert(id, texture);
        Some(TextureProxy {
            id,
            width,
            height,
            config,
            sample_count,
            budgeted,
            fit,
            surface_flags,
            internal_flags,
        })
    }
}
