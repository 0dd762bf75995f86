use crate::{PaletteSize, QuantizeError, Quantized, WuRgb};
use palette::{Srgb, cast};

/// Quantize a slice of colors into a palette of at most `k` colors.
///
/// This is a shorthand for [`WuRgb::run_slice`] followed by [`WuRgb::quantize`].
///
/// # Errors
///
/// Returns an error if there are more than [`MAX_PIXELS`](crate::MAX_PIXELS) colors
/// or if the working storage could not be allocated.
pub fn quantize(pixels: &[Srgb<u8>], k: PaletteSize) -> Result<Quantized, QuantizeError> {
    WuRgb::run_slice(pixels)?.quantize(k)
}

/// Quantize a buffer of interleaved RGB bytes and write the palette into `output`.
///
/// `output` must hold at least `3 * k` bytes. The first `3 * M` bytes are overwritten with the
/// `M <= k` palette colors as `[r, g, b]` triples and the number of colors `M` is returned.
/// The remaining bytes of `output` are left untouched.
///
/// An empty `image` yields a single black color.
///
/// # Errors
///
/// Returns an error if:
/// - `output` is shorter than `3 * k` bytes.
/// - the length of `image` is not a multiple of 3.
/// - `image` has more than [`MAX_PIXELS`](crate::MAX_PIXELS) pixels.
/// - the working storage could not be allocated.
pub fn quantize_into(
    image: &[u8],
    k: PaletteSize,
    output: &mut [u8],
) -> Result<usize, QuantizeError> {
    let required = k.as_usize() * 3;
    if output.len() < required {
        return Err(QuantizeError::OutputTooSmall { len: output.len(), required });
    }

    let quantized = WuRgb::run_bytes(image)?.quantize(k)?;
    let colors: &[u8] = cast::into_component_slice(quantized.palette());
    output[..colors.len()].copy_from_slice(colors);

    Ok(quantized.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use alloc::vec;

    #[test]
    fn uniform_image_writes_one_color() {
        let image = [17, 99, 203].repeat(100);
        let mut output = [0xAA; 256 * 3];

        let len = quantize_into(&image, PaletteSize::MAX, &mut output).unwrap();
        assert_eq!(len, 1);
        assert_eq!(output[..3], [17, 99, 203]);
        assert!(output[3..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn distinct_colors_are_preserved() {
        let colors = test_data_256();
        let image: &[u8] = cast::into_component_slice(&colors);
        let mut output = vec![0; 256 * 3];

        let len = quantize_into(image, PaletteSize::MAX, &mut output).unwrap();
        assert_eq!(len, colors.len());

        let mut palette = cast::from_component_slice::<Srgb<u8>>(&output).to_vec();
        let mut expected = colors;
        palette.sort_by_key(|c| c.into_components());
        expected.sort_by_key(|c| c.into_components());
        assert_eq!(palette, expected);
    }

    #[test]
    fn only_len_colors_are_written() {
        let image = [255, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0, 255];
        let k = PaletteSize::try_from(4u16).unwrap();
        let mut output = [1; 4 * 3];

        let len = quantize_into(&image, k, &mut output).unwrap();
        assert_eq!(len, 2);
        assert_eq!(output[..6], [0, 0, 255, 255, 0, 0]);
        assert_eq!(output[6..], [1; 6]);
    }

    #[test]
    fn empty_image_is_black() {
        let mut output = [9; 3];
        let len = quantize_into(&[], PaletteSize::MIN, &mut output).unwrap();
        assert_eq!(len, 1);
        assert_eq!(output, [0, 0, 0]);
    }

    #[test]
    fn output_too_small() {
        let k = PaletteSize::try_from(16u16).unwrap();
        let mut output = [0; 16 * 3 - 1];
        assert_eq!(
            quantize_into(&[1, 2, 3], k, &mut output),
            Err(QuantizeError::OutputTooSmall { len: 47, required: 48 }),
        );
    }

    #[test]
    fn bad_image_length() {
        let mut output = [0; 3];
        assert_eq!(
            quantize_into(&[1, 2, 3, 4], PaletteSize::MIN, &mut output),
            Err(QuantizeError::PixelBufferLength { len: 4 }),
        );
    }

    #[test]
    fn slice_matches_bytes() {
        let colors = test_data_1024();
        let k = PaletteSize::try_from(32u16).unwrap();
        let quantized = quantize(&colors, k).unwrap();

        let mut output = [0; 32 * 3];
        let len = quantize_into(cast::into_component_slice(&colors), k, &mut output).unwrap();
        assert_eq!(len, quantized.len());
        assert_eq!(
            output[..len * 3],
            *cast::into_component_slice(quantized.palette()),
        );
        assert_eq!(quantized.counts().iter().sum::<u32>(), 1024);
    }
}
