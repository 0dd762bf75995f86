use core::{error::Error, fmt};

/// The error returned when attempting to convert an out of range integer into a
/// [`PaletteSize`](crate::PaletteSize).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PaletteSizeFromIntError(pub(crate) ());

impl fmt::Display for PaletteSizeFromIntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("palette size must be in the range 1..=256")
    }
}

impl Error for PaletteSizeFromIntError {}

/// The error returned when quantization could not be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizeError {
    /// The working storage (histograms, box list, or variance cache) could not be allocated.
    OutOfMemory,
    /// The input byte buffer does not consist of whole RGB triples.
    PixelBufferLength {
        /// The length of the provided byte buffer.
        len: usize,
    },
    /// The input has more than [`MAX_PIXELS`](crate::MAX_PIXELS) pixels.
    TooManyPixels {
        /// The number of pixels in the input.
        len: usize,
    },
    /// The output buffer cannot hold the requested number of palette colors.
    OutputTooSmall {
        /// The length of the provided output buffer.
        len: usize,
        /// The minimum length needed for the requested palette size.
        required: usize,
    },
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OutOfMemory => f.write_str("out of memory"),
            Self::PixelBufferLength { len } => {
                write!(f, "pixel buffer length of {len} is not a multiple of 3")
            }
            Self::TooManyPixels { len } => write!(
                f,
                "got {len} pixels which is above the maximum of {}",
                crate::MAX_PIXELS,
            ),
            Self::OutputTooSmall { len, required } => write!(
                f,
                "output buffer has length {len} but at least {required} bytes are required",
            ),
        }
    }
}

impl Error for QuantizeError {}
