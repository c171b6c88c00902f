use crate::foundation::core::{ColorSpace, ImageInfo, SurfaceOrigin, SurfaceProps};
use crate::gpu::context::{ContextId, ThreadSafeProxy};
use crate::gpu::format::PixelConfig;

/// Anti-aliasing strategy of a render target.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum FsaaType {
    #[default]
    None,
    /// Hardware MSAA with equal color and depth/stencil sample counts.
    UnifiedMsaa,
    /// Color-only supersampling with shared depth/stencil.
    MixedSamples,
}

/// Frozen, validated recipe for creating a GPU surface later (possibly on another thread).
///
/// The default value is the invalid characterization. Valid values are only produced by
/// [`ThreadSafeProxy::create_characterization`] and carry the identity of the originating context
/// as a plain [`ContextId`], never a reference to the context itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceCharacterization {
    pub(crate) context_id: Option<ContextId>,
    pub(crate) cache_max_resource_bytes: usize,
    pub(crate) image_info: ImageInfo,
    pub(crate) origin: SurfaceOrigin,
    pub(crate) config: PixelConfig,
    pub(crate) fsaa_type: FsaaType,
    pub(crate) sample_count: u32,
    pub(crate) textureable: bool,
    pub(crate) mipmapped: bool,
    pub(crate) uses_gl_fbo0: bool,
    pub(crate) vulkan_secondary_cb_compatible: bool,
    pub(crate) surface_props: SurfaceProps,
}

impl SurfaceCharacterization {
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.context_id.is_some()
    }

    /// Identity token of the context this recipe was validated against.
    pub fn context_id(&self) -> Option<ContextId> {
        self.context_id
    }

    pub fn cache_max_resource_bytes(&self) -> usize {
        self.cache_max_resource_bytes
    }

    pub fn image_info(&self) -> &ImageInfo {
        &self.image_info
    }

    pub fn width(&self) -> u32 {
        self.image_info.width()
    }

    pub fn height(&self) -> u32 {
        self.image_info.height()
    }

    pub fn color_space(&self) -> ColorSpace {
        self.image_info.color_space()
    }

    pub fn origin(&self) -> SurfaceOrigin {
        self.origin
    }

    pub fn config(&self) -> PixelConfig {
        self.config
    }

    pub fn fsaa_type(&self) -> FsaaType {
        self.fsaa_type
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn is_textureable(&self) -> bool {
        self.textureable
    }

    pub fn is_mipmapped(&self) -> bool {
        self.mipmapped
    }

    pub fn uses_gl_fbo0(&self) -> bool {
        self.uses_gl_fbo0
    }

    pub fn vulkan_secondary_cb_compatible(&self) -> bool {
        self.vulkan_secondary_cb_compatible
    }

    pub fn surface_props(&self) -> &SurfaceProps {
        &self.surface_props
    }

    /// Whether this recipe was produced by `proxy`'s context.
    pub fn is_compatible_with(&self, proxy: &ThreadSafeProxy) -> bool {
        self.context_id == Some(proxy.context_id())
    }

    /// Same recipe with new dimensions.
    ///
    /// Invalid when this characterization is invalid, belongs to another context, or the new
    /// size is empty or exceeds the proxy's maximum texture size.
    pub fn create_resized(&self, proxy: &ThreadSafeProxy, width: u32, height: u32) -> Self {
        if !self.is_compatible_with(proxy) {
            return Self::invalid();
        }
        let max = proxy.caps().max_texture_size();
        if width == 0 || height == 0 || width > max || height > max {
            return Self::invalid();
        }
        Self {
            image_info: self.image_info.make_wh(width, height),
            ..self.clone()
        }
    }

    /// Same recipe tagged with another color space. Invalid stays invalid.
    pub fn create_color_space(&self, color_space: ColorSpace) -> Self {
        if !self.is_valid() {
            return Self::invalid();
        }
        Self {
            image_info: self.image_info.make_color_space(color_space),
            ..self.clone()
        }
    }
}
