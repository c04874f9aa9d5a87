use crate::error::ImageError;

/// Index of the blue channel in an interleaved pixel.
pub const BLUE: usize = 0;
/// Index of the green channel in an interleaved pixel.
pub const GREEN: usize = 1;
/// Index of the red channel in an interleaved pixel.
pub const RED: usize = 2;
/// Index of the alpha channel in a BGRA pixel.
pub const ALPHA: usize = 3;

/// Raster size in pixels
///
/// # Examples
///
/// ```
/// use edgeline_image::RasterSize;
///
/// let size = RasterSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(size.width, 10);
/// assert_eq!(size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RasterSize {
    /// Width of the raster in pixels
    pub width: usize,
    /// Height of the raster in pixels
    pub height: usize,
}

impl std::fmt::Display for RasterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "RasterSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for RasterSize {
    fn from(size: [usize; 2]) -> Self {
        RasterSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Interleaved channel layout of a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Blue, green, red; one byte each.
    Bgr8,
    /// Blue, green, red, alpha; one byte each.
    Bgra8,
}

impl PixelLayout {
    /// Number of interleaved bytes per pixel.
    pub const fn channels(self) -> usize {
        match self {
            PixelLayout::Bgr8 => 3,
            PixelLayout::Bgra8 => 4,
        }
    }

    /// Get the layout for a channel count.
    ///
    /// # Errors
    ///
    /// Only 3 and 4 channels are supported.
    pub fn from_channels(channels: usize) -> Result<Self, ImageError> {
        match channels {
            3 => Ok(PixelLayout::Bgr8),
            4 => Ok(PixelLayout::Bgra8),
            n => Err(ImageError::UnsupportedChannels(n)),
        }
    }
}

/// A width x height grid of interleaved 8-bit pixels with a fixed row stride.
///
/// The buffer holds `stride * height` bytes. Each row starts at `y * stride`
/// and its first `width * channels` bytes are pixel data; any remaining
/// bytes are row padding and are never read by the processing stages.
///
/// All pixel access goes through bounds-checked accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    size: RasterSize,
    layout: PixelLayout,
    stride: usize,
    data: Vec<u8>,
}

/// Bytes in a packed row, `width * channels`.
fn packed_row_len(size: RasterSize, layout: PixelLayout) -> Result<usize, ImageError> {
    size.width
        .checked_mul(layout.channels())
        .ok_or(ImageError::InvalidImageSize(size.width, size.height))
}

impl Raster {
    /// Create a new raster from tightly packed pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the raster in pixels.
    /// * `layout` - The channel layout.
    /// * `data` - The pixel data, `width * height * channels` bytes.
    ///
    /// # Errors
    ///
    /// If a dimension is zero or the data length does not match, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgeline_image::{PixelLayout, Raster, RasterSize};
    ///
    /// let raster = Raster::new(
    ///     RasterSize { width: 10, height: 20 },
    ///     PixelLayout::Bgr8,
    ///     vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(raster.width(), 10);
    /// assert_eq!(raster.height(), 20);
    /// assert_eq!(raster.stride(), 30);
    /// ```
    pub fn new(size: RasterSize, layout: PixelLayout, data: Vec<u8>) -> Result<Self, ImageError> {
        let stride = packed_row_len(size, layout)?;
        Self::from_raw_parts(size, layout, stride, data)
    }

    /// Create a new raster from pixel data with an explicit row stride.
    ///
    /// # Errors
    ///
    /// Fails if a dimension is zero, if `stride < width * channels` or if
    /// `data.len() != stride * height`.
    pub fn from_raw_parts(
        size: RasterSize,
        layout: PixelLayout,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::InvalidImageSize(size.width, size.height));
        }

        let packed = packed_row_len(size, layout)?;
        if stride < packed {
            return Err(ImageError::InvalidStride(stride, packed));
        }

        let expected = stride
            .checked_mul(size.height)
            .ok_or(ImageError::InvalidImageSize(size.width, size.height))?;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self {
            size,
            layout,
            stride,
            data,
        })
    }

    /// Create a new raster with every byte set to `val`.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgeline_image::{PixelLayout, Raster, RasterSize};
    ///
    /// let raster = Raster::from_size_val([4, 2].into(), PixelLayout::Bgra8, 7).unwrap();
    ///
    /// assert_eq!(raster.num_channels(), 4);
    /// assert_eq!(raster.get(3, 1, 3), Some(7));
    /// ```
    pub fn from_size_val(size: RasterSize, layout: PixelLayout, val: u8) -> Result<Self, ImageError> {
        let len = packed_row_len(size, layout)?
            .checked_mul(size.height)
            .ok_or(ImageError::InvalidImageSize(size.width, size.height))?;
        Self::new(size, layout, vec![val; len])
    }

    /// Create a zero-filled raster with the same size, layout and stride.
    pub fn zeros_like(&self) -> Self {
        Self {
            size: self.size,
            layout: self.layout,
            stride: self.stride,
            data: vec![0; self.data.len()],
        }
    }

    /// Get the size of the raster in pixels.
    pub fn size(&self) -> RasterSize {
        self.size
    }

    /// Get the width of the raster in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the raster in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the raster.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the raster.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Bytes per row, padding included.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Get the channel layout.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Get the number of channels in the raster.
    pub fn num_channels(&self) -> usize {
        self.layout.channels()
    }

    /// Whether the layout carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.layout == PixelLayout::Bgra8
    }

    /// The raw buffer, `stride * height` bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The raw buffer, `stride * height` bytes.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the raster and return its raw buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of channel `ch` of pixel `(x, y)`.
    pub fn offset(&self, x: usize, y: usize, ch: usize) -> Option<usize> {
        if x >= self.width() || y >= self.height() || ch >= self.num_channels() {
            return None;
        }
        Some(y * self.stride + x * self.num_channels() + ch)
    }

    /// Get a single channel value.
    pub fn get(&self, x: usize, y: usize, ch: usize) -> Option<u8> {
        self.offset(x, y, ch).map(|i| self.data[i])
    }

    /// Set a single channel value.
    ///
    /// # Errors
    ///
    /// If the coordinates or the channel are out of bounds.
    pub fn set(&mut self, x: usize, y: usize, ch: usize, val: u8) -> Result<(), ImageError> {
        let i = self.offset(x, y, ch).ok_or(ImageError::PixelIndexOutOfBounds(
            x,
            y,
            self.width(),
            self.height(),
        ))?;
        self.data[i] = val;
        Ok(())
    }

    /// Get all channels of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        let start = self.offset(x, y, 0)?;
        self.data.get(start..start + self.num_channels())
    }

    /// Get all channels of pixel `(x, y)` mutably.
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Option<&mut [u8]> {
        let start = self.offset(x, y, 0)?;
        let channels = self.num_channels();
        self.data.get_mut(start..start + channels)
    }

    /// Write the blue, green and red channels of pixel `(x, y)`; alpha is left untouched.
    ///
    /// # Errors
    ///
    /// If the coordinates are out of bounds.
    pub fn set_bgr(&mut self, x: usize, y: usize, bgr: [u8; 3]) -> Result<(), ImageError> {
        let (width, height) = (self.width(), self.height());
        let pixel = self
            .pixel_mut(x, y)
            .ok_or(ImageError::PixelIndexOutOfBounds(x, y, width, height))?;
        pixel[..3].copy_from_slice(&bgr);
        Ok(())
    }

    /// The packed pixel bytes of row `y`, padding excluded.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height() {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width() * self.num_channels())
    }

    /// The packed pixel bytes of row `y`, padding excluded.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height() {
            return None;
        }
        let start = y * self.stride;
        let len = self.width() * self.num_channels();
        self.data.get_mut(start..start + len)
    }

    /// Whether `(x, y)` lies at least `border` pixels away from every edge.
    pub fn is_interior(&self, x: usize, y: usize, border: usize) -> bool {
        x >= border && y >= border && x + border < self.width() && y + border < self.height()
    }
}
