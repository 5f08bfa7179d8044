//! Glow filter: Gaussian blur added back onto the sharp image.
//!
//! The blurred copy is scaled by `4 * amount` and added to the original
//! channel values, so bright regions bleed a halo into their surroundings.
//! Alpha is always taken from the original pixel.
//!
//! ## Supported Formats
//!
//! - `ArgbImage` packed pixels via [`GlowFilter::apply`]
//! - `(height, width, channels)` u8 arrays with 1, 3 or 4 channels via [`glow_u8`]

use std::fmt;

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::blur::{EdgeMode, GaussianBlur};
use super::core::{clamp_channel, pack_argb, unpack_argb};
use crate::error::GlowError;
use crate::image::ArgbImage;

/// Settings for one glow filter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GlowConfig {
    /// Blur radius in pixels; 0 disables the glow.
    pub radius: i32,
    /// Glow strength, nominally 0.0-1.0.
    pub amount: f32,
    /// Include the alpha channel in the blur arithmetic.
    pub alpha: bool,
    /// Blur alpha-premultiplied colour (only when `alpha` is set).
    pub premultiply_alpha: bool,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            amount: 0.5,
            alpha: false,
            premultiply_alpha: false,
        }
    }
}

impl GlowConfig {
    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_amount(mut self, amount: f32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_premultiply_alpha(mut self, premultiply_alpha: bool) -> Self {
        self.premultiply_alpha = premultiply_alpha;
        self
    }
}

/// Add `4 * amount` times the blurred colour onto the original colour.
///
/// Red, green and blue are truncated and clamped to 0-255; alpha is copied
/// from `original`. `amount` is not range checked.
pub fn composite(
    original: &[u32],
    blurred: &[u32],
    output: &mut [u32],
    amount: f32,
) -> Result<(), GlowError> {
    if original.len() != blurred.len() || original.len() != output.len() {
        return Err(GlowError::InvalidArgument(format!(
            "composite buffers differ in size: {}, {}, {}",
            original.len(),
            blurred.len(),
            output.len()
        )));
    }

    let a = 4.0 * amount;

    for ((out, &rgb1), &rgb2) in output.iter_mut().zip(original).zip(blurred) {
        let [alpha, r1, g1, b1] = unpack_argb(rgb1);
        let [_, r2, g2, b2] = unpack_argb(rgb2);

        let r = clamp_channel(r1 as f32 + a * r2 as f32);
        let g = clamp_channel(g1 as f32 + a * g2 as f32);
        let b = clamp_channel(b1 as f32 + a * b2 as f32);

        *out = pack_argb(alpha, r, g, b);
    }

    Ok(())
}

/// Glow filter holding its blur stage and glow amount.
#[derive(Debug, Clone)]
pub struct GlowFilter {
    blur: GaussianBlur,
    amount: f32,
}

impl Default for GlowFilter {
    fn default() -> Self {
        Self {
            blur: GaussianBlur::default().with_edge_mode(Self::EDGE_MODE),
            amount: GlowConfig::default().amount,
        }
    }
}

impl GlowFilter {
    /// Only edge mode used by the glow.
    pub const EDGE_MODE: EdgeMode = EdgeMode::Clamp;

    /// Create a filter, building the blur kernel for `config.radius`.
    pub fn new(config: GlowConfig) -> Result<Self, GlowError> {
        let mut blur = GaussianBlur::new(config.radius)?.with_edge_mode(Self::EDGE_MODE);
        blur.set_alpha(config.alpha);
        blur.set_premultiply_alpha(config.premultiply_alpha);

        let filter = Self {
            blur,
            amount: config.amount,
        };
        filter.check_amount();
        Ok(filter)
    }

    /// Current settings.
    pub fn config(&self) -> GlowConfig {
        GlowConfig {
            radius: self.blur.radius(),
            amount: self.amount,
            alpha: self.blur.alpha(),
            premultiply_alpha: self.blur.premultiply_alpha(),
        }
    }

    pub fn radius(&self) -> i32 {
        self.blur.radius()
    }

    /// Set the blur radius. Radii outside `0..=MAX_RADIUS` are rejected and leave the filter unchanged.
    pub fn set_radius(&mut self, radius: i32) -> Result<(), GlowError> {
        self.blur.set_radius(radius)
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Set the amount of glow, nominally 0.0-1.0.
    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount;
        self.check_amount();
    }

    pub fn alpha(&self) -> bool {
        self.blur.alpha()
    }

    pub fn set_alpha(&mut self, alpha: bool) {
        self.blur.set_alpha(alpha);
    }

    pub fn premultiply_alpha(&self) -> bool {
        self.blur.premultiply_alpha()
    }

    pub fn set_premultiply_alpha(&mut self, premultiply_alpha: bool) {
        self.blur.set_premultiply_alpha(premultiply_alpha);
    }

    pub fn edge_mode(&self) -> EdgeMode {
        self.blur.edge_mode()
    }

    /// Kernel weights for the current radius.
    pub fn kernel(&self) -> &[f32] {
        self.blur.kernel()
    }

    fn check_amount(&self) {
        if !(0.0..=1.0).contains(&self.amount) {
            log::warn!("glow amount {} is outside 0.0-1.0", self.amount);
        }
    }

    /// Apply the glow into a newly allocated image of the same size.
    pub fn apply(&self, src: &ArgbImage) -> Result<ArgbImage, GlowError> {
        let mut dst = ArgbImage::new(src.width(), src.height());
        self.apply_into(src, &mut dst)?;
        Ok(dst)
    }

    /// Apply the glow, writing into a caller-supplied image.
    pub fn apply_into(&self, src: &ArgbImage, dst: &mut ArgbImage) -> Result<(), GlowError> {
        if src.dimensions() != dst.dimensions() {
            return Err(GlowError::DimensionMismatch {
                expected: src.dimensions(),
                actual: dst.dimensions(),
            });
        }

        let (width, height) = src.dimensions();
        log::debug!(
            "glow {}x{} radius={} amount={}",
            width,
            height,
            self.radius(),
            self.amount
        );

        if self.radius() > 0 {
            let blurred = self.blur.blur_pixels(src.pixels(), width, height)?;
            composite(src.pixels(), &blurred, dst.pixels_mut(), self.amount)
        } else {
            // Nothing to add without a blur
            dst.pixels_mut().copy_from_slice(src.pixels());
            Ok(())
        }
    }

    /// Apply the glow to independent images in parallel.
    pub fn apply_batch(&self, images: &[ArgbImage]) -> Result<Vec<ArgbImage>, GlowError> {
        images.par_iter().map(|img| self.apply(img)).collect()
    }
}

impl fmt::Display for GlowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Blur/Glow...")
    }
}

/// Apply the glow to a `(height, width, channels)` u8 image.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels
/// * `config` - Glow settings
///
/// # Returns
/// Glowing image with the same shape; alpha (if present) is preserved
pub fn glow_u8(input: ArrayView3<u8>, config: &GlowConfig) -> Result<Array3<u8>, GlowError> {
    let channels = input.dim().2;
    let filter = GlowFilter::new(*config)?;
    let src = ArgbImage::from_array(input)?;
    filter.apply(&src)?.to_array(channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, pixel: u32) -> ArgbImage {
        ArgbImage::from_raw(width, height, vec![pixel; width * height]).unwrap()
    }

    /// Deterministic mixed-colour, mixed-alpha test image.
    fn pattern(width: usize, height: usize) -> ArgbImage {
        let pixels = (0..width * height)
            .map(|i| {
                let i = i as u32;
                pack_argb(
                    (i * 37 % 256) as u8,
                    (i * 91 % 256) as u8,
                    (i * 53 % 256) as u8,
                    (i * 17 % 256) as u8,
                )
            })
            .collect();
        ArgbImage::from_raw(width, height, pixels).unwrap()
    }

    fn bright_center() -> ArgbImage {
        let mut img = solid(5, 5, pack_argb(255, 0, 0, 0));
        img.set_pixel(2, 2, pack_argb(255, 255, 255, 255)).unwrap();
        img
    }

    fn red(img: &ArgbImage, x: usize, y: usize) -> u8 {
        unpack_argb(img.get_pixel(x, y).unwrap())[1]
    }

    #[test]
    fn test_defaults() {
        let filter = GlowFilter::default();
        assert_eq!(filter.config(), GlowConfig::default());
        assert_eq!(filter.radius(), 2);
        assert_eq!(filter.amount(), 0.5);
        assert!(!filter.alpha());
        assert!(!filter.premultiply_alpha());
        assert_eq!(filter.edge_mode(), EdgeMode::Clamp);
        assert_eq!(filter.kernel().len(), 5);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(GlowFilter::default().to_string(), "Blur/Glow...");
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = GlowFilter::new(GlowConfig::default().with_radius(-1)).unwrap_err();
        assert!(matches!(err, GlowError::InvalidArgument(_)));

        let mut filter = GlowFilter::default();
        assert!(filter.set_radius(-5).is_err());
        assert_eq!(filter.radius(), 2);
    }

    #[test]
    fn test_oversized_radius_rejected() {
        let err = GlowFilter::new(GlowConfig::default().with_radius(i32::MAX)).unwrap_err();
        assert!(matches!(err, GlowError::InvalidArgument(_)));

        let mut filter = GlowFilter::default();
        assert!(filter.set_radius(i32::MAX).is_err());
        assert_eq!(filter.radius(), 2);
        assert_eq!(filter.kernel().len(), 5);
    }

    #[test]
    fn test_premultiply_stops_transparent_fringing() {
        // Opaque red surrounded by fully transparent white
        let mut img = solid(3, 3, pack_argb(0, 255, 255, 255));
        img.set_pixel(1, 1, pack_argb(255, 255, 0, 0)).unwrap();

        let config = GlowConfig::default()
            .with_radius(1)
            .with_amount(0.25)
            .with_alpha(true);

        let straight = GlowFilter::new(config).unwrap().apply(&img).unwrap();
        let premultiplied = GlowFilter::new(config.with_premultiply_alpha(true))
            .unwrap()
            .apply(&img)
            .unwrap();

        // Invisible white bleeds into the red pixel unless colour is weighted by alpha
        let [a, r, g, b] = unpack_argb(straight.get_pixel(1, 1).unwrap());
        assert_eq!((a, r), (255, 255));
        assert!(g > 0 && b > 0);

        assert_eq!(premultiplied.get_pixel(1, 1), Some(pack_argb(255, 255, 0, 0)));
    }

    #[test]
    fn test_solid_color_no_blur() {
        let img = solid(2, 2, pack_argb(255, 200, 100, 50));
        let filter = GlowFilter::new(GlowConfig::default().with_radius(0).with_amount(0.7)).unwrap();

        assert_eq!(filter.apply(&img).unwrap(), img);
    }

    #[test]
    fn test_zero_radius_is_noop_for_any_amount() {
        let img = pattern(7, 4);
        for amount in [-2.0, 0.0, 0.3, 1.0, 10.0] {
            let filter =
                GlowFilter::new(GlowConfig::default().with_radius(0).with_amount(amount)).unwrap();
            assert_eq!(filter.apply(&img).unwrap(), img);
        }
    }

    #[test]
    fn test_zero_amount_is_noop_for_any_radius() {
        let img = pattern(6, 5);
        for radius in 0..6 {
            for alpha in [false, true] {
                let config = GlowConfig::default()
                    .with_radius(radius)
                    .with_amount(0.0)
                    .with_alpha(alpha)
                    .with_premultiply_alpha(alpha);
                let filter = GlowFilter::new(config).unwrap();
                assert_eq!(filter.apply(&img).unwrap(), img);
            }
        }
    }

    #[test]
    fn test_alpha_preserved() {
        let img = pattern(9, 7);
        for (alpha, premultiply) in [(false, false), (true, false), (true, true), (false, true)] {
            let config = GlowConfig::default()
                .with_radius(3)
                .with_amount(0.8)
                .with_alpha(alpha)
                .with_premultiply_alpha(premultiply);
            let out = GlowFilter::new(config).unwrap().apply(&img).unwrap();

            for (&src, &dst) in img.pixels().iter().zip(out.pixels()) {
                assert_eq!(src >> 24, dst >> 24);
            }
        }
    }

    #[test]
    fn test_dimensions_preserved() {
        let filter = GlowFilter::default();
        for (w, h) in [(1, 1), (1, 9), (9, 1), (13, 4), (0, 3)] {
            let out = filter.apply(&pattern(w, h)).unwrap();
            assert_eq!(out.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_single_bright_pixel_halo() {
        let img = bright_center();
        let filter = GlowFilter::new(GlowConfig::default().with_radius(2).with_amount(1.0)).unwrap();
        let out = filter.apply(&img).unwrap();

        let center = red(&out, 2, 2);
        assert_eq!(center, 255);

        // Halo covers the whole image, corners included
        for (x, y) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
            let v = red(&out, x, y);
            assert!(v > 0, "no glow at corner ({x}, {y})");
            assert!(v < center, "corner ({x}, {y}) outshines the source");
        }

        for y in 0..5 {
            for x in 0..5 {
                if (x, y) != (2, 2) {
                    let v = red(&out, x, y);
                    assert!(v > 0 && v < center, "glow at ({x}, {y}) is {v}");
                }
            }
        }

        // Halo fades with distance from the source
        assert!(red(&out, 1, 2) > red(&out, 0, 2));
        assert!(red(&out, 1, 1) > red(&out, 0, 0));
    }

    #[test]
    fn test_monotonic_in_amount() {
        let img = pattern(8, 8);
        let mut filter = GlowFilter::new(GlowConfig::default().with_radius(2)).unwrap();

        let mut previous = img.clone();
        for amount in [0.0, 0.1, 0.25, 0.5, 0.75, 1.0, 2.0] {
            filter.set_amount(amount);
            let out = filter.apply(&img).unwrap();
            for (&p, &o) in previous.pixels().iter().zip(out.pixels()) {
                let (p, o) = (unpack_argb(p), unpack_argb(o));
                for c in 1..4 {
                    assert!(o[c] >= p[c]);
                }
            }
            previous = out;
        }
    }

    #[test]
    fn test_composite_formula() {
        let original = [pack_argb(10, 100, 50, 0)];
        let blurred = [pack_argb(255, 20, 100, 1)];
        let mut out = [0u32];

        composite(&original, &blurred, &mut out, 0.5).unwrap();

        // a = 2: 100 + 40, 50 + 200 -> clamped, 0 + 2
        assert_eq!(unpack_argb(out[0]), [10, 140, 250, 2]);

        composite(&original, &blurred, &mut out, 1.0).unwrap();
        assert_eq!(unpack_argb(out[0]), [10, 180, 255, 4]);

        // Negative amounts darken and clamp at zero
        composite(&original, &blurred, &mut out, -1.0).unwrap();
        assert_eq!(unpack_argb(out[0]), [10, 20, 0, 0]);
    }

    #[test]
    fn test_out_of_range_amount_is_accepted() {
        let _ = env_logger::builder().is_test(true).try_init();

        let img = bright_center();
        let mut filter = GlowFilter::new(GlowConfig::default().with_amount(3.0)).unwrap();
        assert_eq!(filter.amount(), 3.0);
        let strong = filter.apply(&img).unwrap();

        filter.set_amount(1.0);
        let normal = filter.apply(&img).unwrap();

        // Blur at (1, 2) is 25 and at (0, 2) is 6
        assert_eq!(red(&normal, 1, 2), 100);
        assert_eq!(red(&strong, 1, 2), 255);
        assert_eq!(red(&strong, 0, 2), 72);
    }

    #[test]
    fn test_composite_rejects_mismatched_buffers() {
        let mut out = [0u32; 2];
        assert!(composite(&[0; 2], &[0; 3], &mut out, 0.5).is_err());
    }

    #[test]
    fn test_apply_into_checks_dimensions() {
        let filter = GlowFilter::default();
        let src = pattern(4, 4);

        let mut wrong = ArgbImage::new(4, 3);
        assert!(matches!(
            filter.apply_into(&src, &mut wrong),
            Err(GlowError::DimensionMismatch {
                expected: (4, 4),
                actual: (4, 3)
            })
        ));

        let mut dst = ArgbImage::new(4, 4);
        filter.apply_into(&src, &mut dst).unwrap();
        assert_eq!(dst, filter.apply(&src).unwrap());
    }

    #[test]
    fn test_input_not_mutated() {
        let img = bright_center();
        let before = img.clone();
        let _ = GlowFilter::default().apply(&img).unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn test_setters_change_later_output_only() {
        let img = bright_center();
        let mut filter = GlowFilter::default();
        let first = filter.apply(&img).unwrap();
        let snapshot = first.clone();

        filter.set_radius(0).unwrap();
        filter.set_alpha(true);
        filter.set_premultiply_alpha(true);
        assert_eq!(filter.apply(&img).unwrap(), img);
        assert_eq!(first, snapshot);

        assert_eq!(
            filter.config(),
            GlowConfig {
                radius: 0,
                amount: 0.5,
                alpha: true,
                premultiply_alpha: true,
            }
        );
    }

    #[test]
    fn test_batch_matches_sequential() {
        let images: Vec<ArgbImage> = (1..6).map(|n| pattern(n * 3, n + 2)).collect();
        let filter = GlowFilter::new(GlowConfig::default().with_amount(0.3)).unwrap();

        let batch = filter.apply_batch(&images).unwrap();
        let sequential: Vec<ArgbImage> = images.iter().map(|i| filter.apply(i).unwrap()).collect();
        assert_eq!(batch, sequential);
    }

    #[test]
    fn test_glow_u8_rgba() {
        let mut img = Array3::<u8>::zeros((5, 5, 4));
        for y in 0..5 {
            for x in 0..5 {
                img[[y, x, 3]] = 200;
            }
        }
        img[[2, 2, 0]] = 255;

        let result = glow_u8(img.view(), &GlowConfig::default().with_amount(1.0)).unwrap();

        assert_eq!(result.dim(), (5, 5, 4));
        assert_eq!(result[[2, 2, 0]], 255);
        assert!(result[[2, 1, 0]] > 0);
        assert_eq!(result[[2, 1, 1]], 0);
        assert_eq!(result[[0, 0, 3]], 200); // Alpha preserved
    }

    #[test]
    fn test_glow_u8_grayscale() {
        let mut img = Array3::<u8>::zeros((3, 3, 1));
        img[[1, 1, 0]] = 100;

        let result = glow_u8(img.view(), &GlowConfig::default()).unwrap();

        assert_eq!(result.dim().2, 1); // Still 1 channel
        assert!(result[[1, 1, 0]] > 100);
    }

    #[test]
    fn test_glow_u8_rejects_bad_input() {
        let img = Array3::<u8>::zeros((2, 2, 2));
        assert!(matches!(
            glow_u8(img.view(), &GlowConfig::default()),
            Err(GlowError::InvalidChannels(2))
        ));

        let img = Array3::<u8>::zeros((2, 2, 4));
        assert!(glow_u8(img.view(), &GlowConfig::default().with_radius(-1)).is_err());
    }
}
