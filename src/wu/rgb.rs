use super::{
    histogram::{Histogram3, MAX_BIN, Stats, bin},
    partition::{CubeSet, Wu},
};
use crate::{MAX_PIXELS, PaletteSize, QuantizeError};
use alloc::vec::Vec;
use palette::{
    Srgb,
    cast::{self, AsArrays as _},
};

/// Wu's color quantization method for 24-bit RGB colors.
///
/// Creating a [`WuRgb`] builds the histogram and its cumulative moments.
/// Afterwards, [`quantize`](WuRgb::quantize) can be called any number of times
/// with different [`PaletteSize`]s.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), wuquant::QuantizeError> {
/// use palette::Srgb;
/// use wuquant::{PaletteSize, WuRgb};
///
/// let pixels = [Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)];
/// let wu = WuRgb::run_slice(&pixels)?;
/// assert_eq!(wu.quantize(PaletteSize::MIN)?.palette(), [Srgb::new(127, 127, 127)]);
/// assert_eq!(wu.quantize(PaletteSize::MAX)?.len(), 2);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct WuRgb {
    /// The histogram after conversion to cumulative moments.
    moments: Histogram3<Stats>,
}

impl WuRgb {
    /// Build the histogram moments for a slice of colors.
    ///
    /// # Errors
    ///
    /// Returns an error if there are more than [`MAX_PIXELS`] colors
    /// or if the histogram could not be allocated.
    pub fn run_slice(pixels: &[Srgb<u8>]) -> Result<Self, QuantizeError> {
        if u32::try_from(pixels.len()).is_err() {
            return Err(QuantizeError::TooManyPixels { len: pixels.len() });
        }
        debug_assert!(pixels.len() <= MAX_PIXELS as usize);

        let mut moments = Histogram3::try_new()?;
        moments.add_pixels(pixels.as_arrays());
        moments.calc_cumulative_moments();
        Ok(Self { moments })
    }

    /// Build the histogram moments for a buffer of interleaved RGB bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the length of `bytes` is not a multiple of 3, if there are more than
    /// [`MAX_PIXELS`] pixels, or if the histogram could not be allocated.
    pub fn run_bytes(bytes: &[u8]) -> Result<Self, QuantizeError> {
        let pixels = cast::try_from_component_slice::<Srgb<u8>>(bytes)
            .map_err(|_| QuantizeError::PixelBufferLength { len: bytes.len() })?;
        Self::run_slice(pixels)
    }

    /// Build the histogram moments for an [`image::RgbImage`].
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram could not be allocated.
    #[cfg(feature = "image")]
    pub fn run_rgb_image(image: &image::RgbImage) -> Result<Self, QuantizeError> {
        Self::run_bytes(image.as_raw())
    }

    /// Returns the number of pixels the histogram was built from.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn pixel_count(&self) -> u32 {
        self.moments[[MAX_BIN; 3]].count as u32
    }

    /// Compute a palette with at most `k` colors.
    ///
    /// Fewer than `k` colors are returned if the histogram cannot be split any further,
    /// for example if the image has fewer than `k` distinct colors.
    ///
    /// # Errors
    ///
    /// Returns [`QuantizeError::OutOfMemory`] if the working storage could not be allocated.
    pub fn quantize(&self, k: PaletteSize) -> Result<Quantized, QuantizeError> {
        let wu = Wu::new(&self.moments);
        let cubes = wu.partition(k)?;
        Quantized::extract(&wu, &cubes)
    }
}

/// The output of [`WuRgb::quantize`]: the palette, the number of pixels assigned to each
/// palette color, and the histogram bin labels.
#[derive(Debug, Clone)]
pub struct Quantized {
    /// The palette colors, one per cube.
    palette: Vec<Srgb<u8>>,
    /// The number of pixels in each cube.
    counts: Vec<u32>,
    /// The palette index of each histogram bin.
    labels: Histogram3<u8>,
}

impl Quantized {
    /// Average the colors of each cube and label each histogram bin with its cube index.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn extract(wu: &Wu<'_>, cubes: &CubeSet) -> Result<Self, QuantizeError> {
        let len = cubes.len();
        let mut palette = Vec::new();
        let mut counts = Vec::new();
        palette
            .try_reserve_exact(len)
            .and_then(|()| counts.try_reserve_exact(len))
            .map_err(|err| {
                log::error!("failed to allocate a palette of {len} colors: {err}");
                QuantizeError::OutOfMemory
            })?;

        let mut labels = Histogram3::try_new()?;

        for (k, &cube) in cubes.as_slice().iter().enumerate() {
            // at most 256 cubes
            labels.mark(cube, k as u8);

            let Stats { count, components, .. } = wu.volume(cube);
            let color = if count == 0 {
                log::error!("cube {k} has no pixels");
                [0; 3]
            } else {
                components.map(|c| (c / count) as u8)
            };

            palette.push(cast::from_array(color));
            counts.push(count as u32);
        }

        Ok(Self { palette, counts, labels })
    }

    /// Returns the palette colors.
    #[must_use]
    #[inline]
    pub fn palette(&self) -> &[Srgb<u8>] {
        &self.palette
    }

    /// Returns the number of pixels assigned to each palette color.
    #[must_use]
    #[inline]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Returns the number of palette colors that were produced.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.palette.len()
    }

    /// Returns whether the palette is empty. This is never the case.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }

    /// Returns the number of palette colors as a [`PaletteSize`].
    #[must_use]
    #[inline]
    pub fn size(&self) -> PaletteSize {
        PaletteSize::try_from_usize(self.len()).unwrap_or(PaletteSize::MIN)
    }

    /// Returns the index of the palette color whose histogram box contains `color`.
    #[must_use]
    #[inline]
    pub fn palette_index(&self, color: Srgb<u8>) -> u8 {
        self.labels[bin(cast::into_array(color))]
    }

    /// Consume the [`Quantized`] and return the palette.
    #[must_use]
    #[inline]
    pub fn into_palette(self) -> Vec<Srgb<u8>> {
        self.palette
    }
}
