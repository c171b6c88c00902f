pub type SurfmaskResult<T> = Result<T, SurfmaskError>;

#[derive(thiserror::Error, Debug)]
pub enum SurfmaskError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("allocation error: {0}")]
    Allocation(String),

    #[error("raster error: {0}")]
    Raster(String),

    #[error("gpu error: {0}")]
    Gpu(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SurfmaskError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    pub fn gpu(msg: impl Into<String>) -> Self {
        Self::Gpu(msg.into())
    }
}
