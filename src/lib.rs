//! Glow Filter Rust Extensions
//!
//! A Gaussian "glow" post-processing filter: the image is blurred with a
//! separable Gaussian kernel and the blur is added back onto the sharp
//! original, amplified by a tunable amount. Python bindings via PyO3 and
//! WASM bindings for JavaScript are available behind features.
//!
//! ## Image Format
//! The filter works on packed 32-bit ARGB pixels ([`ArgbImage`]), alpha in
//! the highest byte. Array entry points accept `(height, width, channels)`
//! u8 arrays:
//! - **Grayscale**: (height, width, 1)
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4)
//!
//! ## Pipeline
//! 1. Kernel builder ([`filters::core::gaussian_kernel`])
//! 2. Two convolve-and-transpose passes ([`filters::blur`])
//! 3. Glow composite against the original ([`filters::glow::composite`])

pub mod error;
pub mod filters;
pub mod image;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::GlowError;
pub use filters::blur::{EdgeMode, GaussianBlur};
pub use filters::core::MAX_RADIUS;
pub use filters::glow::{glow_u8, GlowConfig, GlowFilter};
pub use image::ArgbImage;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::GlowError;
    use crate::filters::glow::{glow_u8, GlowConfig};

    fn to_py_err(err: GlowError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    // ========================================================================
    // Glow Filter
    // ========================================================================

    /// Apply a Gaussian glow to a u8 image (1, 3, or 4 channels).
    ///
    /// # Arguments
    /// * `image` - Input image (height, width, channels)
    /// * `radius` - Blur radius in pixels (default: 2, 0 disables the glow)
    /// * `amount` - Glow strength, nominally 0.0-1.0 (default: 0.5)
    /// * `alpha` - Blur the alpha channel too (default: false)
    /// * `premultiply_alpha` - Blur premultiplied colour (default: false)
    #[pyfunction]
    #[pyo3(signature = (image, radius=2, amount=0.5, alpha=false, premultiply_alpha=false))]
    pub fn glow<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: i32,
        amount: f32,
        alpha: bool,
        premultiply_alpha: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        let config = GlowConfig {
            radius,
            amount,
            alpha,
            premultiply_alpha,
        };
        let result = glow_u8(input, &config).map_err(to_py_err)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Module Registration
    // ========================================================================

    #[pymodule]
    pub fn glow_filter_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(glow, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::glow_filter_rust;
