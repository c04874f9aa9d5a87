use serde::{Deserialize, Serialize};

use crate::error::ImgprocError;

/// An immutable square convolution kernel with an odd side length.
///
/// The normalization scale is not part of the kernel; callers pass it to the
/// convolution. [`KernelKind::scale`] gives the expected scale of every
/// catalog kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    side: usize,
    data: Vec<f64>,
}

impl Kernel {
    /// Create a kernel from row-major coefficients.
    ///
    /// # Errors
    ///
    /// Fails with [`ImgprocError::InvalidParameter`] if `side` is zero or even,
    /// or if `data.len() != side * side`.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgeline_imgproc::filter::Kernel;
    ///
    /// let kernel = Kernel::new(3, vec![1.0; 9]).unwrap();
    /// assert_eq!(kernel.border(), 1);
    ///
    /// assert!(Kernel::new(2, vec![1.0; 4]).is_err());
    /// ```
    pub fn new(side: usize, data: Vec<f64>) -> Result<Self, ImgprocError> {
        if side == 0 || side % 2 == 0 {
            return Err(ImgprocError::InvalidParameter(format!(
                "kernel side length must be odd and positive, got {side}"
            )));
        }

        if data.len() != side * side {
            return Err(ImgprocError::InvalidParameter(format!(
                "kernel of side {side} needs {} coefficients, got {}",
                side * side,
                data.len()
            )));
        }

        Ok(Self { side, data })
    }

    /// Create a kernel from an array of rows.
    pub fn from_rows<const N: usize>(rows: [[f64; N]; N]) -> Result<Self, ImgprocError> {
        Self::new(N, rows.iter().flatten().copied().collect())
    }

    /// Side length of the kernel.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of pixels on each side of the center, `side / 2`.
    pub fn border(&self) -> usize {
        self.side / 2
    }

    /// Coefficient at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.side || col >= self.side {
            return None;
        }
        self.data.get(row * self.side + col).copied()
    }

    /// Row-major coefficients.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Sum of all coefficients.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// The named kernels shipped with the crate.
///
/// The Sobel and Prewitt "vertical" kernels respond to vertical edges
/// (intensity changing along x) and the "horizontal" ones to horizontal edges.
/// The Kirsch pair is named after its compass orientation instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// 3x3 Sobel responding to vertical edges.
    SobelVertical,
    /// 3x3 Sobel responding to horizontal edges.
    SobelHorizontal,
    /// 3x3 Prewitt responding to vertical edges.
    PrewittVertical,
    /// 3x3 Prewitt responding to horizontal edges.
    PrewittHorizontal,
    /// 3x3 Kirsch compass kernel, north orientation.
    KirschVertical,
    /// 3x3 Kirsch compass kernel, west orientation.
    KirschHorizontal,
    /// 3x3 Gaussian, scale 1/16.
    Gaussian3x3,
    /// 5x5 Gaussian, scale 1/159.
    Gaussian5x5,
    /// 3x3 box filter, scale 1/9.
    Mean3x3,
    /// 5x5 box filter, scale 1/25.
    Mean5x5,
    /// 7x7 box filter, scale 1/49.
    Mean7x7,
    /// 9x9 box filter, scale 1/81.
    Mean9x9,
    /// 3x3 eight-connected Laplacian.
    Laplacian3x3,
    /// 5x5 Laplacian.
    Laplacian5x5,
    /// 5x5 Laplacian of Gaussian.
    LaplacianOfGaussian,
    /// 5x5 motion blur along both diagonals, scale 1/10.
    MotionBlur5x5,
    /// 5x5 motion blur at 45 degrees, scale 1/5.
    MotionBlur5x5At45,
    /// 5x5 motion blur at 135 degrees, scale 1/5.
    MotionBlur5x5At135,
    /// 7x7 motion blur along both diagonals, scale 1/14.
    MotionBlur7x7,
    /// 7x7 motion blur at 45 degrees, scale 1/7.
    MotionBlur7x7At45,
    /// 7x7 motion blur at 135 degrees, scale 1/7.
    MotionBlur7x7At135,
    /// 9x9 motion blur along both diagonals, scale 1/18.
    MotionBlur9x9,
    /// 9x9 motion blur at 45 degrees, scale 1/9.
    MotionBlur9x9At45,
    /// 9x9 motion blur at 135 degrees, scale 1/9.
    MotionBlur9x9At135,
}

#[rustfmt::skip]
const SOBEL_VERTICAL: [f64; 9] = [
    -1.0, 0.0, 1.0,
    -2.0, 0.0, 2.0,
    -1.0, 0.0, 1.0,
];

#[rustfmt::skip]
const SOBEL_HORIZONTAL: [f64; 9] = [
    -1.0, -2.0, -1.0,
     0.0,  0.0,  0.0,
     1.0,  2.0,  1.0,
];

#[rustfmt::skip]
const PREWITT_VERTICAL: [f64; 9] = [
    -1.0, 0.0, 1.0,
    -1.0, 0.0, 1.0,
    -1.0, 0.0, 1.0,
];

#[rustfmt::skip]
const PREWITT_HORIZONTAL: [f64; 9] = [
    -1.0, -1.0, -1.0,
     0.0,  0.0,  0.0,
     1.0,  1.0,  1.0,
];

#[rustfmt::skip]
const KIRSCH_VERTICAL: [f64; 9] = [
     5.0,  5.0,  5.0,
    -3.0,  0.0, -3.0,
    -3.0, -3.0, -3.0,
];

#[rustfmt::skip]
const KIRSCH_HORIZONTAL: [f64; 9] = [
    5.0, -3.0, -3.0,
    5.0,  0.0, -3.0,
    5.0, -3.0, -3.0,
];

#[rustfmt::skip]
const GAUSSIAN_3X3: [f64; 9] = [
    1.0, 2.0, 1.0,
    2.0, 4.0, 2.0,
    1.0, 2.0, 1.0,
];

#[rustfmt::skip]
const GAUSSIAN_5X5: [f64; 25] = [
    2.0,  4.0,  5.0,  4.0, 2.0,
    4.0,  9.0, 12.0,  9.0, 4.0,
    5.0, 12.0, 15.0, 12.0, 5.0,
    4.0,  9.0, 12.0,  9.0, 4.0,
    2.0,  4.0,  5.0,  4.0, 2.0,
];

#[rustfmt::skip]
const LAPLACIAN_3X3: [f64; 9] = [
    -1.0, -1.0, -1.0,
    -1.0,  8.0, -1.0,
    -1.0, -1.0, -1.0,
];

#[rustfmt::skip]
const LAPLACIAN_5X5: [f64; 25] = [
    -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, 24.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0,
    -1.0, -1.0, -1.0, -1.0, -1.0,
];

#[rustfmt::skip]
const LAPLACIAN_OF_GAUSSIAN: [f64; 25] = [
     0.0,  0.0, -1.0,  0.0,  0.0,
     0.0, -1.0, -2.0, -1.0,  0.0,
    -1.0, -2.0, 16.0, -2.0, -1.0,
     0.0, -1.0, -2.0, -1.0,  0.0,
     0.0,  0.0, -1.0,  0.0,  0.0,
];

#[derive(Clone, Copy)]
enum Diagonal {
    Both,
    Rising,
    Falling,
}

/// Ones along the selected diagonals of a `side x side` matrix.
///
/// `Rising` runs from the bottom-left to the top-right corner (45 degrees),
/// `Falling` from the top-left to the bottom-right corner (135 degrees).
fn diagonal_kernel(side: usize, diagonal: Diagonal) -> Vec<f64> {
    let mut data = vec![0.0; side * side];
    for i in 0..side {
        let falling = i * side + i;
        let rising = i * side + (side - 1 - i);
        match diagonal {
            Diagonal::Both => {
                data[falling] = 1.0;
                data[rising] = 1.0;
            }
            Diagonal::Rising => data[rising] = 1.0,
            Diagonal::Falling => data[falling] = 1.0,
        }
    }
    data
}

impl KernelKind {
    /// Every catalog entry.
    pub const ALL: [KernelKind; 24] = [
        KernelKind::SobelVertical,
        KernelKind::SobelHorizontal,
        KernelKind::PrewittVertical,
        KernelKind::PrewittHorizontal,
        KernelKind::KirschVertical,
        KernelKind::KirschHorizontal,
        KernelKind::Gaussian3x3,
        KernelKind::Gaussian5x5,
        KernelKind::Mean3x3,
        KernelKind::Mean5x5,
        KernelKind::Mean7x7,
        KernelKind::Mean9x9,
        KernelKind::Laplacian3x3,
        KernelKind::Laplacian5x5,
        KernelKind::LaplacianOfGaussian,
        KernelKind::MotionBlur5x5,
        KernelKind::MotionBlur5x5At45,
        KernelKind::MotionBlur5x5At135,
        KernelKind::MotionBlur7x7,
        KernelKind::MotionBlur7x7At45,
        KernelKind::MotionBlur7x7At135,
        KernelKind::MotionBlur9x9,
        KernelKind::MotionBlur9x9At45,
        KernelKind::MotionBlur9x9At135,
    ];

    /// Side length of the kernel.
    pub fn side(self) -> usize {
        match self {
            KernelKind::Gaussian5x5
            | KernelKind::Mean5x5
            | KernelKind::Laplacian5x5
            | KernelKind::LaplacianOfGaussian
            | KernelKind::MotionBlur5x5
            | KernelKind::MotionBlur5x5At45
            | KernelKind::MotionBlur5x5At135 => 5,
            KernelKind::Mean7x7
            | KernelKind::MotionBlur7x7
            | KernelKind::MotionBlur7x7At45
            | KernelKind::MotionBlur7x7At135 => 7,
            KernelKind::Mean9x9
            | KernelKind::MotionBlur9x9
            | KernelKind::MotionBlur9x9At45
            | KernelKind::MotionBlur9x9At135 => 9,
            _ => 3,
        }
    }

    /// The normalization scale to pass alongside the kernel.
    pub fn scale(self) -> f64 {
        match self {
            KernelKind::Gaussian3x3 => 1.0 / 16.0,
            KernelKind::Gaussian5x5 => 1.0 / 159.0,
            KernelKind::Mean3x3 => 1.0 / 9.0,
            KernelKind::Mean5x5 => 1.0 / 25.0,
            KernelKind::Mean7x7 => 1.0 / 49.0,
            KernelKind::Mean9x9 => 1.0 / 81.0,
            KernelKind::MotionBlur5x5 => 1.0 / 10.0,
            KernelKind::MotionBlur5x5At45 | KernelKind::MotionBlur5x5At135 => 1.0 / 5.0,
            KernelKind::MotionBlur7x7 => 1.0 / 14.0,
            KernelKind::MotionBlur7x7At45 | KernelKind::MotionBlur7x7At135 => 1.0 / 7.0,
            KernelKind::MotionBlur9x9 => 1.0 / 18.0,
            KernelKind::MotionBlur9x9At45 | KernelKind::MotionBlur9x9At135 => 1.0 / 9.0,
            _ => 1.0,
        }
    }

    /// Build the kernel coefficients.
    pub fn kernel(self) -> Kernel {
        let side = self.side();
        let data = match self {
            KernelKind::SobelVertical => SOBEL_VERTICAL.to_vec(),
            KernelKind::SobelHorizontal => SOBEL_HORIZONTAL.to_vec(),
            KernelKind::PrewittVertical => PREWITT_VERTICAL.to_vec(),
            KernelKind::PrewittHorizontal => PREWITT_HORIZONTAL.to_vec(),
            KernelKind::KirschVertical => KIRSCH_VERTICAL.to_vec(),
            KernelKind::KirschHorizontal => KIRSCH_HORIZONTAL.to_vec(),
            KernelKind::Gaussian3x3 => GAUSSIAN_3X3.to_vec(),
            KernelKind::Gaussian5x5 => GAUSSIAN_5X5.to_vec(),
            KernelKind::Mean3x3
            | KernelKind::Mean5x5
            | KernelKind::Mean7x7
            | KernelKind::Mean9x9 => vec![1.0; side * side],
            KernelKind::Laplacian3x3 => LAPLACIAN_3X3.to_vec(),
            KernelKind::Laplacian5x5 => LAPLACIAN_5X5.to_vec(),
            KernelKind::LaplacianOfGaussian => LAPLACIAN_OF_GAUSSIAN.to_vec(),
            KernelKind::MotionBlur5x5 | KernelKind::MotionBlur7x7 | KernelKind::MotionBlur9x9 => {
                diagonal_kernel(side, Diagonal::Both)
            }
            KernelKind::MotionBlur5x5At45
            | KernelKind::MotionBlur7x7At45
            | KernelKind::MotionBlur9x9At45 => diagonal_kernel(side, Diagonal::Rising),
            KernelKind::MotionBlur5x5At135
            | KernelKind::MotionBlur7x7At135
            | KernelKind::MotionBlur9x9At135 => diagonal_kernel(side, Diagonal::Falling),
        };
        Kernel { side, data }
    }

    /// The kernel together with its normalization scale.
    pub fn with_scale(self) -> (Kernel, f64) {
        (self.kernel(), self.scale())
    }
}
