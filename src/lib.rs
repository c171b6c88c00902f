#![forbid(unsafe_code)]
//! Surface characterization and software clip-mask accumulation for GPU renderers.
//!
//! Two independent pieces:
//!
//! - [`ThreadSafeProxy::create_characterization`] validates a requested render-target
//!   description against a backend's [`Caps`] and freezes it into a [`SurfaceCharacterization`]
//!   that can be checked later, from any thread, against the originating [`GpuContext`].
//! - [`MaskAccumulator`] rasterizes clip elements into an 8-bit coverage buffer with one of six
//!   [`ClipOp`]s and hands the result to a [`TextureProvider`] as an A8 texture.

mod foundation;
mod gpu;
mod mask;
mod pixels;

pub use foundation::core::{
    Affine, AlphaType, BezPath, ColorSpace, ColorType, IRect, ImageInfo, PixelGeometry, Point,
    Rect, SurfaceOrigin, SurfaceProps, Vec2,
};
pub use foundation::error::{SurfmaskError, SurfmaskResult};
pub use gpu::caps::{
    Caps, CapsOptions, FormatInfo, FormatTable, GlCaps, GlStandard, MetalCaps, MockCaps,
    VulkanCaps,
};
pub use gpu::characterization::{FsaaType, SurfaceCharacterization};
pub use gpu::context::{ContextId, ContextOptions, GpuContext, ThreadSafeProxy};
pub use gpu::format::{BackendApi, BackendFormat, PixelConfig, gl, mtl, vk, webgpu};
pub use gpu::surface::surface_config_valid;
pub use gpu::texture::{
    BackingFit, Budgeted, ExecutionMode, InternalSurfaceFlags, RecordingTextureProvider,
    SurfaceFlags, TextureProvider, TextureProxy, TextureProxyId,
};
#[cfg(feature = "gpu")]
pub use gpu::wgpu_backend::{WgpuCaps, WgpuTextureProvider, headless, texture_format};
pub use mask::accumulator::{MaskAccumulator, MaskOpts};
pub use mask::ops::{BlendMode, ClipOp, blend_a8, blend_with_coverage, op_to_mode};
pub use mask::raster::{CoverageRasterizer, VelloRasterizer};
pub use mask::shape::{FillType, Shape, ShapeStyle};
pub use pixels::image::RasterImage;
pub use pixels::pixmap::{AlphaPixmap, ImmutableData};
