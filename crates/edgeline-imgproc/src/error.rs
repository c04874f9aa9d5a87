use edgeline_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the processing stages.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImgprocError {
    /// A precondition on the arguments does not hold.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the raster type.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the parallel execution helpers.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
