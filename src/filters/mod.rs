//! Filter stages of the glow effect.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Packed ARGB | width × height | u32 | Alpha in the highest byte, row-major |
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! ## Architecture
//!
//! - **core** - Gaussian kernel and packed pixel helpers
//! - **blur** - Separable convolve-and-transpose engine and the two-pass blur
//! - **glow** - Glow composite and the configurable filter
//!
//! Alpha is always preserved by the glow. Convolution rows and batches of
//! images run in parallel with rayon.

pub mod blur;
pub mod core;
pub mod glow;
