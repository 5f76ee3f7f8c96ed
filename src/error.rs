/// Failures outside the diagram domain itself.
///
/// Missing workflows, dangling connections, oversized labels and unknown node
/// types never show up here: those are handled while rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("surface data unavailable: {0}")]
    SurfaceBorrow(#[from] cairo::BorrowError),
    #[error("failed to write PNG: {0}")]
    Png(#[from] cairo::IoError),
    #[error("failed to encode JPEG: {0}")]
    Jpeg(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("workflow JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
