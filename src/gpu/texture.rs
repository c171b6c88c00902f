use std::collections::HashMap;

use crate::foundation::core::ColorType;
use crate::gpu::format::PixelConfig;
use crate::pixels::image::RasterImage;

bitflags::bitflags! {
    /// Public surface-creation flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SurfaceFlags: u32 {
        /// Ask the allocator to zero the backing store before the first upload.
        const PERFORM_INITIAL_CLEAR = 1 << 0;
    }
}

bitflags::bitflags! {
    /// Flags that only the resource system itself interprets.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InternalSurfaceFlags: u32 {
        /// The proxy is instantiated at flush time and may not carry pending I/O.
        const NO_PENDING_IO = 1 << 0;
    }
}

/// Whether a resource counts against the cache budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Budgeted {
    Yes,
    No,
}

/// Whether a resource must match the requested size exactly or may be a larger pooled size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackingFit {
    Exact,
    Approx,
}

/// How draws reach the GPU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Resources are created and uploaded as soon as they are requested.
    #[default]
    Immediate,
    /// Work is recorded and resources are instantiated later, at flush time.
    Deferred,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureProxyId(pub u32);

/// Handle to a texture registered with a [`TextureProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureProxy {
    pub(crate) id: TextureProxyId,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) config: PixelConfig,
    pub(crate) sample_count: u32,
    pub(crate) budgeted: Budgeted,
    pub(crate) fit: BackingFit,
    pub(crate) surface_flags: SurfaceFlags,
    pub(crate) internal_flags: InternalSurfaceFlags,
}

impl TextureProxy {
    pub fn id(&self) -> TextureProxyId {
        self.id
    }

    /// Size of the registered image.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> PixelConfig {
        self.config
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn budgeted(&self) -> Budgeted {
        self.budgeted
    }

    pub fn fit(&self) -> BackingFit {
        self.fit
    }

    pub fn surface_flags(&self) -> SurfaceFlags {
        self.surface_flags
    }

    pub fn internal_flags(&self) -> InternalSurfaceFlags {
        self.internal_flags
    }
}

/// GPU resource allocator consumed by mask upload.
pub trait TextureProvider {
    /// `true` when resources are instantiated immediately rather than at flush time.
    fn rendering_directly(&self) -> bool;

    /// Register `image` as a sampleable texture. `None` signals allocation failure.
    fn create_texture_proxy(
        &mut self,
        image: RasterImage,
        surface_flags: SurfaceFlags,
        sample_count: u32,
        budgeted: Budgeted,
        fit: BackingFit,
        internal_flags: InternalSurfaceFlags,
    ) -> Option<TextureProxy>;
}

pub(crate) fn config_for_image(image: &RasterImage) -> PixelConfig {
    match image.info().color_type() {
        ColorType::Alpha8 => PixelConfig::Alpha8,
        ColorType::Gray8 => PixelConfig::Gray8,
        ColorType::Rgb565 => PixelConfig::Rgb565,
        ColorType::Rgba8888 => PixelConfig::Rgba8888,
        ColorType::Bgra8888 => PixelConfig::Bgra8888,
        ColorType::Rgba1010102 => PixelConfig::Rgba1010102,
        ColorType::RgbaF16 => PixelConfig::RgbaHalf,
        ColorType::Unknown => PixelConfig::Unknown,
    }
}

#[derive(Debug)]
struct RecordedTexture {
    proxy: TextureProxy,
    image: RasterImage,
}

/// In-memory [`TextureProvider`] that records every registration and hands back a proxy.
///
/// It applies no allocation policy of its own. A provider built with
/// [`refusing`](Self::refusing) rejects every request, standing in for an allocator that is out
/// of memory.
#[derive(Debug)]
pub struct RecordingTextureProvider {
    mode: ExecutionMode,
    refuse: bool,
    next_id: u32,
    textures: HashMap<TextureProxyId, RecordedTexture>,
}

impl RecordingTextureProvider {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            refuse: false,
            next_id: 1,
            textures: HashMap::new(),
        }
    }

    pub fn immediate() -> Self {
        Self::new(ExecutionMode::Immediate)
    }

    pub fn deferred() -> Self {
        Self::new(ExecutionMode::Deferred)
    }

    /// A provider whose every `create_texture_proxy` call fails.
    pub fn refusing(mode: ExecutionMode) -> Self {
        Self {
            refuse: true,
            ..Self::new(mode)
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn proxy(&self, id: TextureProxyId) -> Option<&TextureProxy> {
        self.textures.get(&id).map(|t| &t.proxy)
    }

    /// The image registered under `id`.
    pub fn image(&self, id: TextureProxyId) -> Option<&RasterImage> {
        self.textures.get(&id).map(|t| &t.image)
    }
}

impl TextureProvider for RecordingTextureProvider {
    fn rendering_directly(&self) -> bool {
        self.mode == ExecutionMode::Immediate
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
        if self.refuse {
            tracing::debug!("recording provider refused texture");
            return None;
        }
        let config = config_for_image(&image);
        if config == PixelConfig::Unknown || sample_count == 0 {
            return None;
        }

        let id = TextureProxyId(self.next_id);
        self.next_id += 1;
        let proxy = TextureProxy {
            id,
            width: image.width(),
            height: image.height(),
            config,
            sample_count,
            budgeted,
            fit,
            surface_flags,
            internal_flags,
        };
        self.textures.insert(
            id,
            RecordedTexture {
                proxy: proxy.clone(),
                image,
            },
        );
        Some(proxy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/texture.rs"]
mod tests;
