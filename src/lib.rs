//! An implementation of Wu's color quantizer (greedy orthogonal bipartitioning of RGB space).
//!
//! The input is a 24-bit RGB image and the output is a palette of at most 256 colors.
//! Each color channel is reduced to 5 bits and accumulated into a 3-dimensional histogram,
//! which is then converted into cumulative moments. The moments allow the statistics of any
//! axis-aligned box of the histogram to be calculated in constant time, and the quantizer
//! repeatedly splits the box with the greatest variance along the axis and position that
//! minimizes the summed variance of the two halves.
//!
//! # Examples
//!
//! Quantizing a buffer of interleaved RGB bytes into a caller provided palette buffer:
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wuquant::{PaletteSize, quantize_into};
//!
//! let image = [255, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0, 255];
//! let k = PaletteSize::try_from(4u16)?;
//! let mut palette = [0u8; 4 * 3];
//!
//! let len = quantize_into(&image, k, &mut palette)?;
//! assert_eq!(len, 2);
//! assert_eq!(palette[..6], [0, 0, 255, 255, 0, 0]);
//! # Ok(())
//! # }
//! ```
//!
//! Using the typed API to also get the pixel count of each palette color:
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use palette::Srgb;
//! use wuquant::{PaletteSize, quantize};
//!
//! let pixels = vec![Srgb::new(10, 20, 30); 8];
//! let quantized = quantize(&pixels, PaletteSize::MAX)?;
//! assert_eq!(quantized.palette(), [Srgb::new(10, 20, 30)]);
//! assert_eq!(quantized.counts(), [8]);
//! # Ok(())
//! # }
//! ```
//!
//! # Diagnostics
//!
//! Diagnostics are reported through the [`log`] facade. A warning is logged when fewer colors
//! than requested could be produced, and errors are logged for allocation failures.
//!
//! # Features
//!
//! - `image`: adds [`WuRgb::run_rgb_image`] for [`image::RgbImage`] inputs.

#![no_std]
#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::unreadable_literal
)]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod api;
mod types;

pub mod wu;

pub use api::{quantize, quantize_into};
pub use types::*;
pub use wu::{Quantized, WuRgb};

#[cfg(feature = "image")]
pub use image;
pub use palette;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;
