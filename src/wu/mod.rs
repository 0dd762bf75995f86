//! Wu's color quantization method (Greedy Orthogonal Bipartitioning).
//!
//! The colors are first binned into a 33x33x33 histogram, where each channel keeps its top 5 bits
//! and index 0 of each axis is reserved as an all zero plane. The histogram is then converted in
//! place into cumulative moments, so that the pixel count, channel sums, and sum of squared
//! magnitudes of any box of bins can be found from 8 lookups.
//!
//! Starting from the box covering the whole histogram, the box with the greatest variance is
//! repeatedly split in two along the axis and position that maximizes the sum of `|sum|^2 / count`
//! over the two halves. Splitting stops once the requested number of boxes is reached or no box
//! can be split any further. Each box then becomes one palette color: the mean of its pixels.
//!
//! See [`WuRgb`] for the reusable entry point.

pub(crate) mod cube;
pub(crate) mod histogram;
pub(crate) mod partition;

mod rgb;

pub use rgb::*;
