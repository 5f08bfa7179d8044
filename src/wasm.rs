//! WebAssembly exports for the glow filter.
//!
//! These functions are exposed to JavaScript via wasm-bindgen and work on
//! flat RGBA byte arrays (length = width * height * 4), the layout of
//! `ImageData.data` in a canvas.

use ndarray::ArrayView3;
use wasm_bindgen::prelude::*;

use crate::filters::glow::{glow_u8, GlowConfig};

// ============================================================================
// Glow Filter - u8 (8-bit)
// ============================================================================

/// Apply a Gaussian glow to an RGBA u8 image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `radius` - Blur radius in pixels (0 disables the glow)
/// * `amount` - Glow strength, nominally 0.0-1.0
/// * `alpha` - Blur the alpha channel too
/// * `premultiply_alpha` - Blur premultiplied colour
///
/// # Returns
/// Flat array of RGBA bytes, alpha unchanged
#[wasm_bindgen]
pub fn glow_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: i32,
    amount: f32,
    alpha: bool,
    premultiply_alpha: bool,
) -> Result<Vec<u8>, JsValue> {
    let input = ArrayView3::from_shape((height, width, 4), data)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let config = GlowConfig {
        radius,
        amount,
        alpha,
        premultiply_alpha,
    };

    let result = glow_u8(input, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(result.into_raw_vec_and_offset().0)
}
