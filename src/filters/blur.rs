//! Separable Gaussian blur for packed ARGB images.
//!
//! The blur runs one 1D convolution routine twice. Each pass convolves
//! along rows and writes its result transposed, so the second pass blurs
//! what was originally the vertical axis and restores the orientation.
//! Cost is O(width * height * kernel length).

use rayon::prelude::*;

use super::core::{gaussian_kernel, gaussian_weights, pack_argb, round_channel, unpack_argb};
use crate::error::GlowError;
use crate::image::ArgbImage;

/// How taps that fall outside the row are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeMode {
    /// Use the nearest pixel in the row.
    #[default]
    Clamp,
    /// Wrap around to the other end of the row.
    Wrap,
    /// Treat the outside as transparent black.
    Zero,
}

impl EdgeMode {
    /// Map a (possibly out of range) column to the column to sample.
    #[inline]
    fn sample(self, ix: isize, width: usize) -> Option<usize> {
        let w = width as isize;
        match self {
            EdgeMode::Clamp => Some(ix.clamp(0, w - 1) as usize),
            EdgeMode::Wrap => Some(ix.rem_euclid(w) as usize),
            EdgeMode::Zero => (0..w).contains(&ix).then_some(ix as usize),
        }
    }
}

/// Convolve each row of `input` with `kernel` and write the result transposed.
///
/// `input` is `width × height`; `output` receives a `height × width` image in
/// which the result for input position (x, y) lands at `x * height + y`.
///
/// # Arguments
/// * `kernel` - Odd-length 1D kernel, centre tap at `len / 2`
/// * `alpha` - Convolve the alpha channel; otherwise written alpha is 255
/// * `premultiply` - Scale colour by alpha when reading
/// * `unpremultiply` - Divide colour by the accumulated alpha when writing
/// * `edge_mode` - Sampling policy past the row ends
#[allow(clippy::too_many_arguments)]
pub fn convolve_and_transpose(
    kernel: &[f32],
    input: &[u32],
    output: &mut [u32],
    width: usize,
    height: usize,
    alpha: bool,
    premultiply: bool,
    unpremultiply: bool,
    edge_mode: EdgeMode,
) -> Result<(), GlowError> {
    if kernel.len() % 2 == 0 {
        return Err(GlowError::InvalidArgument(format!(
            "kernel length must be odd, got {}",
            kernel.len()
        )));
    }
    let len = width * height;
    if input.len() != len || output.len() != len {
        return Err(GlowError::InvalidArgument(format!(
            "buffers of {} and {} pixels do not fit a {}x{} image",
            input.len(),
            output.len(),
            width,
            height
        )));
    }
    if len == 0 {
        return Ok(());
    }

    log::trace!(
        "convolve_and_transpose {}x{} taps={} alpha={} premultiply={} unpremultiply={} edge={:?}",
        width,
        height,
        kernel.len(),
        alpha,
        premultiply,
        unpremultiply,
        edge_mode
    );

    let half = (kernel.len() / 2) as isize;

    // Output row x holds input column x, one entry per input row.
    output
        .par_chunks_mut(height)
        .enumerate()
        .for_each(|(x, column)| {
            for (y, out) in column.iter_mut().enumerate() {
                let row = &input[y * width..(y + 1) * width];
                let (mut a, mut r, mut g, mut b) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);

                for (ki, &f) in kernel.iter().enumerate() {
                    if f == 0.0 {
                        continue;
                    }
                    let Some(ix) = edge_mode.sample(x as isize + ki as isize - half, width) else {
                        continue;
                    };

                    let [pa, pr, pg, pb] = unpack_argb(row[ix]);
                    let (mut pr, mut pg, mut pb) = (pr as f32, pg as f32, pb as f32);
                    if premultiply {
                        let a255 = pa as f32 / 255.0;
                        pr *= a255;
                        pg *= a255;
                        pb *= a255;
                    }
                    a += f * pa as f32;
                    r += f * pr;
                    g += f * pg;
                    b += f * pb;
                }

                if unpremultiply && a != 0.0 && a != 255.0 {
                    let f = 255.0 / a;
                    r *= f;
                    g *= f;
                    b *= f;
                }

                let ia = if alpha { round_channel(a) } else { 0xff };
                *out = pack_argb(ia, round_channel(r), round_channel(g), round_channel(b));
            }
        });

    Ok(())
}

/// Two-pass Gaussian blur with a kernel cached for its radius.
#[derive(Debug, Clone)]
pub struct GaussianBlur {
    radius: i32,
    kernel: Vec<f32>,
    alpha: bool,
    premultiply_alpha: bool,
    edge_mode: EdgeMode,
}

impl Default for GaussianBlur {
    /// Radius 2, the glow filter's default.
    fn default() -> Self {
        Self {
            radius: 2,
            kernel: gaussian_weights(2),
            alpha: false,
            premultiply_alpha: false,
            edge_mode: EdgeMode::Clamp,
        }
    }
}

impl GaussianBlur {
    /// Create a blur of the given radius with alpha left out of the arithmetic.
    pub fn new(radius: i32) -> Result<Self, GlowError> {
        Ok(Self {
            radius,
            kernel: gaussian_kernel(radius)?,
            alpha: false,
            premultiply_alpha: false,
            edge_mode: EdgeMode::Clamp,
        })
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Change the radius, rebuilding the kernel.
    ///
    /// On error the previous radius and kernel are kept.
    pub fn set_radius(&mut self, radius: i32) -> Result<(), GlowError> {
        if radius != self.radius {
            self.kernel = gaussian_kernel(radius)?;
            self.radius = radius;
        }
        Ok(())
    }

    pub fn kernel(&self) -> &[f32] {
        &self.kernel
    }

    pub fn alpha(&self) -> bool {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: bool) {
        self.alpha = alpha;
    }

    pub fn premultiply_alpha(&self) -> bool {
        self.premultiply_alpha
    }

    pub fn set_premultiply_alpha(&mut self, premultiply_alpha: bool) {
        self.premultiply_alpha = premultiply_alpha;
    }

    pub fn edge_mode(&self) -> EdgeMode {
        self.edge_mode
    }

    pub fn with_edge_mode(mut self, edge_mode: EdgeMode) -> Self {
        self.edge_mode = edge_mode;
        self
    }

    /// Blur a `width × height` row-major buffer, returning a buffer of the same shape.
    ///
    /// Premultiplication only takes effect when alpha participates.
    pub fn blur_pixels(
        &self,
        pixels: &[u32],
        width: usize,
        height: usize,
    ) -> Result<Vec<u32>, GlowError> {
        let premultiply = self.alpha && self.premultiply_alpha;
        let mut transposed = vec![0u32; pixels.len()];
        let mut result = vec![0u32; pixels.len()];

        convolve_and_transpose(
            &self.kernel,
            pixels,
            &mut transposed,
            width,
            height,
            self.alpha,
            premultiply,
            false,
            self.edge_mode,
        )?;
        convolve_and_transpose(
            &self.kernel,
            &transposed,
            &mut result,
            height,
            width,
            self.alpha,
            false,
            premultiply,
            self.edge_mode,
        )?;

        Ok(result)
    }

    /// Blur an image into a newly allocated image of the same size.
    pub fn apply(&self, src: &ArgbImage) -> Result<ArgbImage, GlowError> {
        let (width, height) = src.dimensions();
        let blurred = self.blur_pixels(src.pixels(), width, height)?;
        ArgbImage::from_raw(width, height, blurred)
    }
}
