//! Error type shared by every filter stage.

/// An error type for the glow filter.
#[derive(thiserror::Error, Debug)]
pub enum GlowError {
    /// A parameter or buffer was rejected before any pixel was touched.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Destination image does not have the source image's dimensions.
    #[error("Image dimensions ({actual:?}) do not match the expected ({expected:?})")]
    DimensionMismatch {
        /// Expected (width, height).
        expected: (usize, usize),
        /// Actual (width, height).
        actual: (usize, usize),
    },

    /// Array input with a channel count other than 1, 3 or 4.
    #[error("Unsupported channel count: {0}")]
    InvalidChannels(usize),

    /// Error when the array shape is not valid.
    #[error("Invalid shape")]
    InvalidShape(#[from] ndarray::ShapeError),
}
