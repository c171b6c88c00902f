use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::foundation::core::{ImageInfo, SurfaceOrigin, SurfaceProps};
use crate::gpu::caps::Caps;
use crate::gpu::characterization::{FsaaType, SurfaceCharacterization};
use crate::gpu::format::{BackendApi, BackendFormat, PixelConfig};
use crate::gpu::surface::surface_config_valid;

/// Process-unique identity of a [`GpuContext`]. Compared by value only.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ContextId(u32);

impl ContextId {
    /// Allocate the next id. Zero is never handed out.
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        loop {
            let id = NEXT.fetch_add(1, Ordering::Relaxed);
            if id != 0 {
                return Self(id);
            }
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Context-creation options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextOptions {
    /// Resource cache budget suggested to characterizations created without an explicit one.
    pub resource_cache_limit_bytes: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            resource_cache_limit_bytes: 96 * 1024 * 1024,
        }
    }
}

/// The slice of a rendering context that is safe to share across threads.
///
/// Holds only write-once data: the capability set, the owning context's id, and its options.
/// Every method takes `&self` and performs no GPU work.
#[derive(Debug)]
pub struct ThreadSafeProxy {
    caps: Arc<dyn Caps>,
    context_id: ContextId,
    options: ContextOptions,
}

impl ThreadSafeProxy {
    pub(crate) fn new(caps: Arc<dyn Caps>, context_id: ContextId, options: ContextOptions) -> Self {
        Self {
            caps,
            context_id,
            options,
        }
    }

    pub fn caps(&self) -> &dyn Caps {
        self.caps.as_ref()
    }

    pub fn backend(&self) -> BackendApi {
        self.caps.backend()
    }

    pub fn context_id(&self) -> ContextId {
        self.context_id
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// `true` iff `context` is the context this proxy was created for.
    pub fn matches(&self, context: &GpuContext) -> bool {
        context.unique_id() == self.context_id
    }

    /// Validate a surface request against the capability set.
    ///
    /// Returns [`SurfaceCharacterization::invalid`] when the format is invalid or unsupported,
    /// the default-framebuffer hint is used off GL, the config/color space pair is not a valid
    /// surface, no sample count is renderable, or the config is not texturable. A mipmap request
    /// on hardware without mipmaps is downgraded rather than rejected.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(
        level = "debug",
        skip(self, image_info, surface_props),
        fields(context = self.context_id.get())
    )]
    pub fn create_characterization(
        &self,
        cache_max_resource_bytes: usize,
        image_info: &ImageInfo,
        backend_format: &BackendFormat,
        sample_count: u32,
        origin: SurfaceOrigin,
        surface_props: &SurfaceProps,
        is_mipmapped: bool,
        will_use_gl_fbo0: bool,
    ) -> SurfaceCharacterization {
        if !backend_format.is_valid() {
            return reject("backend format is invalid");
        }

        if will_use_gl_fbo0 && backend_format.backend() != Some(BackendApi::OpenGl) {
            return reject("default framebuffer binding requires a GL backend");
        }

        let caps = self.caps();
        let mut is_mipmapped = is_mipmapped;
        if is_mipmapped && !caps.mipmap_support() {
            tracing::trace!("mipmaps unsupported; downgrading request");
            is_mipmapped = false;
        }

        let config = caps.config_from_backend_format(backend_format, image_info.color_type());
        if config == PixelConfig::Unknown {
            return reject("backend format does not resolve to a pixel config");
        }

        if !surface_config_valid(caps, config, image_info.color_space()) {
            return reject("config and color space do not form a valid surface");
        }

        let sample_count = caps.render_target_sample_count(sample_count, config);
        if sample_count == 0 {
            return reject("config is not renderable at any sample count");
        }

        let fsaa_type = if sample_count > 1 {
            if caps.uses_mixed_samples() {
                FsaaType::MixedSamples
            } else {
                FsaaType::UnifiedMsaa
            }
        } else {
            FsaaType::None
        };

        // Characterizations always describe texture-backed surfaces.
        if !caps.is_config_texturable(config) {
            return reject("config is not texturable");
        }

        SurfaceCharacterization {
            context_id: Some(self.context_id),
            cache_max_resource_bytes,
            image_info: *image_info,
            origin,
            config,
            fsaa_type,
            sample_count,
            textureable: true,
            mipmapped: is_mipmapped,
            uses_gl_fbo0: will_use_gl_fbo0,
            vulkan_secondary_cb_compatible: false,
            surface_props: *surface_props,
        }
    }
}

fn reject(reason: &'static str) -> SurfaceCharacterization {
    tracing::debug!(reason, "surface characterization rejected");
    SurfaceCharacterization::invalid()
}

/// Minimal live context: an identity plus the shared thread-safe proxy.
#[derive(Debug)]
pub struct GpuContext {
    unique_id: ContextId,
    proxy: Arc<ThreadSafeProxy>,
}

impl GpuContext {
    pub fn new(caps: Arc<dyn Caps>, options: ContextOptions) -> Self {
        let unique_id = ContextId::next();
        tracing::debug!(
            context = unique_id.get(),
            backend = ?caps.backend(),
            "gpu context created"
        );
        Self {
            unique_id,
            proxy: Arc::new(ThreadSafeProxy::new(caps, unique_id, options)),
        }
    }

    pub fn unique_id(&self) -> ContextId {
        self.unique_id
    }

    pub fn caps(&self) -> &dyn Caps {
        self.proxy.caps()
    }

    pub fn thread_safe_proxy(&self) -> Arc<ThreadSafeProxy> {
        Arc::clone(&self.proxy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/context.rs"]
mod tests;
