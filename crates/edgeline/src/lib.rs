#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use edgeline_image as image;

#[doc(inline)]
pub use edgeline_imgproc as imgproc;

/// End-to-end line detection built from the processing stages.
pub mod pipeline;
