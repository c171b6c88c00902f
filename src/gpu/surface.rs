use crate::foundation::core::ColorSpace;
use crate::gpu::caps::Caps;
use crate::gpu::format::PixelConfig;

/// Whether a surface of `config` tagged with `color_space` can be constructed on `caps`.
///
/// sRGB-encoded configs need hardware sRGB support; every other config accepts any color space.
pub fn surface_config_valid(caps: &dyn Caps, config: PixelConfig, color_space: ColorSpace) -> bool {
    if config == PixelConfig::Unknown {
        return false;
    }
    if config.is_srgb() {
        return caps.srgb_support();
    }
    tracing::trace!(?config, ?color_space, "surface config accepted");
    true
}
