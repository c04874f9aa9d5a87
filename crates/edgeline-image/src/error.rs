/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the raster has a zero dimension.
    #[error("Invalid raster size ({0}, {1})")]
    InvalidImageSize(usize, usize),

    /// Error when the number of channels is not 3 or 4.
    #[error("Unsupported number of channels ({0}), expected 3 or 4")]
    UnsupportedChannels(usize),

    /// Error when the row stride cannot hold a packed row.
    #[error("Row stride ({0}) is smaller than the packed row size ({1})")]
    InvalidStride(usize, usize),

    /// Error when the data length does not match stride times height.
    #[error("Data length ({0}) does not match the raster size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),
}
