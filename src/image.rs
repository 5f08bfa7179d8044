//! Packed ARGB image container.
//!
//! Pixels are stored row-major as `u32` values with alpha in the highest
//! byte, followed by red, green and blue. Conversion helpers move between
//! this layout and the `(height, width, channels)` `ndarray` layout used by
//! the array entry points.

use ndarray::{Array3, ArrayView3};

use crate::error::GlowError;
use crate::filters::core::{pack_argb, unpack_argb};

/// A width × height grid of packed ARGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgbImage {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl ArgbImage {
    /// Create a zeroed (fully transparent black) image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Create an image from a row-major pixel buffer.
    ///
    /// Fails if the buffer does not hold exactly `width * height` pixels.
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self, GlowError> {
        if pixels.len() != width * height {
            return Err(GlowError::InvalidArgument(format!(
                "pixel buffer holds {} values, expected {}x{} = {}",
                pixels.len(),
                width,
                height,
                width * height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Row-major pixel buffer.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn into_raw(self) -> Vec<u32> {
        self.pixels
    }

    /// Pixel at (x, y), or `None` outside the image.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Overwrite the pixel at (x, y).
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: u32) -> Result<(), GlowError> {
        self.check_region(x, y, 1, 1)?;
        self.pixels[y * self.width + x] = pixel;
        Ok(())
    }

    /// Copy a `w × h` region starting at (x, y) into a new row-major buffer.
    pub fn get_rgb(&self, x: usize, y: usize, w: usize, h: usize) -> Result<Vec<u32>, GlowError> {
        self.check_region(x, y, w, h)?;
        let mut out = Vec::with_capacity(w * h);
        for row in y..y + h {
            let start = row * self.width + x;
            out.extend_from_slice(&self.pixels[start..start + w]);
        }
        Ok(out)
    }

    /// Write a row-major `w × h` block of pixels at (x, y).
    pub fn set_rgb(
        &mut self,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        pixels: &[u32],
    ) -> Result<(), GlowError> {
        self.check_region(x, y, w, h)?;
        if pixels.len() != w * h {
            return Err(GlowError::InvalidArgument(format!(
                "region {}x{} needs {} pixels, got {}",
                w,
                h,
                w * h,
                pixels.len()
            )));
        }
        if w == 0 {
            return Ok(());
        }
        for (row, src) in pixels.chunks_exact(w).enumerate() {
            let start = (y + row) * self.width + x;
            self.pixels[start..start + w].copy_from_slice(src);
        }
        Ok(())
    }

    fn check_region(&self, x: usize, y: usize, w: usize, h: usize) -> Result<(), GlowError> {
        let fits_x = x.checked_add(w).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(h).is_some_and(|end| end <= self.height);
        if fits_x && fits_y {
            Ok(())
        } else {
            Err(GlowError::InvalidArgument(format!(
                "region {}x{} at ({}, {}) exceeds image bounds {}x{}",
                w, h, x, y, self.width, self.height
            )))
        }
    }

    /// Build an image from a `(height, width, channels)` u8 array.
    ///
    /// - **1 channel**: gray, replicated to R, G and B; fully opaque
    /// - **3 channels**: RGB; fully opaque
    /// - **4 channels**: RGBA
    pub fn from_array(input: ArrayView3<u8>) -> Result<Self, GlowError> {
        let (height, width, channels) = input.dim();
        let mut pixels = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let pixel = match channels {
                    1 => {
                        let v = input[[y, x, 0]];
                        pack_argb(255, v, v, v)
                    }
                    3 => pack_argb(255, input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]),
                    4 => pack_argb(
                        input[[y, x, 3]],
                        input[[y, x, 0]],
                        input[[y, x, 1]],
                        input[[y, x, 2]],
                    ),
                    _ => return Err(GlowError::InvalidChannels(channels)),
                };
                pixels.push(pixel);
            }
        }

        Self::from_raw(width, height, pixels)
    }

    /// Convert to a `(height, width, channels)` u8 array.
    ///
    /// Gray output takes the red channel; RGB output drops alpha.
    pub fn to_array(&self, channels: usize) -> Result<Array3<u8>, GlowError> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(GlowError::InvalidChannels(channels));
        }

        let mut output = Array3::<u8>::zeros((self.height, self.width, channels));
        for y in 0..self.height {
            for x in 0..self.width {
                let [a, r, g, b] = unpack_argb(self.pixels[y * self.width + x]);
                match channels {
                    1 => output[[y, x, 0]] = r,
                    3 => {
                        output[[y, x, 0]] = r;
                        output[[y, x, 1]] = g;
                        output[[y, x, 2]] = b;
                    }
                    _ => {
                        output[[y, x, 0]] = r;
                        output[[y, x, 1]] = g;
                        output[[y, x, 2]] = b;
                        output[[y, x, 3]] = a;
                    }
                }
            }
        }
        Ok(output)
    }
}
