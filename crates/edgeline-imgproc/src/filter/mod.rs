//! Filter operations
//!
//! This module provides square kernel convolution and the named kernel catalog.

/// Filter kernels
pub mod kernels;
pub use kernels::{Kernel, KernelKind};

/// Convolution operations
mod convolution;
pub(crate) use convolution::check_kernel_fits;
pub use convolution::{convolve, convolve_with};

/// Clamp an accumulated response to a pixel value.
///
/// Values above 255 saturate, values below 1 are zeroed rather than rounded,
/// everything else is truncated.
pub(crate) fn clamp_response(value: f64) -> u8 {
    if value < 1.0 {
        return 0;
    }
    num_traits::clamp(value, 1.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::clamp_response;

    #[test]
    fn test_clamp_response() {
        assert_eq!(clamp_response(-3.0), 0);
        assert_eq!(clamp_response(0.99), 0);
        assert_eq!(clamp_response(1.0), 1);
        assert_eq!(clamp_response(28.33), 28);
        assert_eq!(clamp_response(254.9), 254);
        assert_eq!(clamp_response(1e6), 255);
        assert_eq!(clamp_response(f64::NAN), 0);
    }
}
