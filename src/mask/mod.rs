pub(crate) mod accumulator;
pub(crate) mod ops;
pub(crate) mod raster;
pub(crate) mod shape;
