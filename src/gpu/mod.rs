pub(crate) mod caps;
pub(crate) mod characterization;
pub(crate) mod context;
pub(crate) mod format;
pub(crate) mod surface;
pub(crate) mod texture;
#[cfg(feature = "gpu")]
pub(crate) mod wgpu_backend;
