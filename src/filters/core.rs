//! Core utilities for image processing filters.
//!
//! This module provides shared functionality used by the blur and glow stages:
//! - Gaussian kernel generation
//! - Packed ARGB channel access
//! - Channel clamping

use crate::error::GlowError;

/// Largest blur radius accepted by [`gaussian_kernel`].
pub const MAX_RADIUS: i32 = 1 << 15;

/// Generate a normalized 1D Gaussian kernel for an integer blur radius.
///
/// The kernel has `2 * radius + 1` taps centred on index `radius`. The curve
/// uses `sigma = radius / 2`, so the outermost taps sit at two standard
/// deviations and still carry enough weight to survive 8-bit rounding.
/// Taps further than `radius` from the centre are zeroed, then the whole
/// kernel is divided by its total.
///
/// # Arguments
/// * `radius` - Blur radius in pixels, `0..=MAX_RADIUS`
///
/// # Returns
/// Normalized kernel as `Vec<f32>`; `[1.0]` for a radius of zero
pub fn gaussian_kernel(radius: i32) -> Result<Vec<f32>, GlowError> {
    if radius < 0 {
        return Err(GlowError::InvalidArgument(format!(
            "blur radius must be non-negative, got {radius}"
        )));
    }
    if radius > MAX_RADIUS {
        return Err(GlowError::InvalidArgument(format!(
            "blur radius {radius} exceeds the maximum of {MAX_RADIUS}"
        )));
    }
    Ok(gaussian_weights(radius as usize))
}

/// Gaussian weights for a radius already known to be valid.
pub(crate) fn gaussian_weights(radius: usize) -> Vec<f32> {
    if radius == 0 {
        return vec![1.0];
    }

    let r = radius as isize;
    let radius_f = radius as f32;
    let sigma = radius_f / 2.0;
    let sigma22 = 2.0 * sigma * sigma;
    let sqrt_sigma_pi2 = (2.0 * std::f32::consts::PI * sigma).sqrt();
    let radius2 = radius_f * radius_f;

    let mut kernel: Vec<f32> = (-r..=r)
        .map(|row| {
            let distance = (row * row) as f32;
            if distance > radius2 {
                0.0
            } else {
                (-distance / sigma22).exp() / sqrt_sigma_pi2
            }
        })
        .collect();

    // Normalize
    let total: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= total);

    kernel
}

/// Split a packed ARGB pixel into `[a, r, g, b]`.
#[inline]
pub fn unpack_argb(pixel: u32) -> [u8; 4] {
    [
        (pixel >> 24) as u8,
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    ]
}

/// Pack `a, r, g, b` channels into one ARGB pixel.
#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Round a float accumulator to the nearest channel value and clamp to 0-255.
#[inline]
pub fn round_channel(v: f32) -> u8 {
    (v + 0.5).clamp(0.0, 255.0) as u8
}

/// Truncate a float channel value and clamp to 0-255.
#[inline]
pub fn clamp_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}
