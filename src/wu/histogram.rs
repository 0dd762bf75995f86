// Referenced code: https://www.ece.mcmaster.ca/~xwu/cq.c
// and Graphics Gems vol. II, pp. 126-133.

use super::cube::{Axis, Cube};
use crate::QuantizeError;
use alloc::boxed::Box;
use bytemuck::Zeroable;
use core::ops::{Add, AddAssign, Index, IndexMut, Sub};
use num_traits::Zero;

/// The number of bins along each axis of the histogram, including the zero sentinel plane.
pub const BINS: usize = 33;

/// The largest bin index along each axis.
pub const MAX_BIN: u8 = 32;

/// Squares of every possible `u8` channel value.
const SQUARES: [u32; 256] = {
    let mut table = [0; 256];
    let mut i = 0;
    while i < table.len() {
        #[allow(clippy::cast_possible_truncation)]
        {
            table[i] = (i * i) as u32;
        }
        i += 1;
    }
    table
};

/// Returns the histogram bin of each channel of the given color.
///
/// Channels are reduced to 5 bits and offset by one, since bin `0` is reserved for the
/// sentinel plane used by the inclusion-exclusion lookups.
#[inline]
pub fn bin(color: [u8; 3]) -> [u8; 3] {
    color.map(|c| (c >> 3) + 1)
}

/// Returns the offset of the given bin within a flattened histogram.
#[inline]
pub const fn voxel_offset([r, g, b]: [u8; 3]) -> usize {
    (r as usize) * BINS * BINS + (g as usize) * BINS + b as usize
}

/// Statistics for a histogram bin.
#[derive(Debug, Clone, Copy, PartialEq, Zeroable)]
pub struct Stats {
    /// The number of pixels assigned to the bin.
    pub count: i64,
    /// The channel-wise sum of the pixels assigned to the bin.
    pub components: [i64; 3],
    /// The sum of the squared channels of the pixels assigned to the bin.
    pub sum_squared: f32,
}

impl Add for Stats {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        let [r, g, b] = self.components;
        let [r2, g2, b2] = rhs.components;
        Self {
            count: self.count + rhs.count,
            components: [r + r2, g + g2, b + b2],
            sum_squared: self.sum_squared + rhs.sum_squared,
        }
    }
}

impl Sub for Stats {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        let [r, g, b] = self.components;
        let [r2, g2, b2] = rhs.components;
        Self {
            count: self.count - rhs.count,
            components: [r - r2, g - g2, b - b2],
            sum_squared: self.sum_squared - rhs.sum_squared,
        }
    }
}

impl AddAssign for Stats {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Zero for Stats {
    #[inline]
    fn zero() -> Self {
        Self::zeroed()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.count == 0
    }
}

/// A new type wrapper around a 33x33x33 array of histogram bins.
///
/// Bins are indexed by `[r, g, b]`. The planes where any index is `0` are never written by
/// [`add_pixels`](Histogram3::add_pixels) and stay zero.
///
/// After [`calc_cumulative_moments`](Histogram3::calc_cumulative_moments) the same storage
/// holds cumulative sums instead of per-bin statistics:
/// bin `[r, g, b]` becomes the total over all bins in `[0, r] x [0, g] x [0, b]`.
#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct Histogram3<T>(Box<[[[T; BINS]; BINS]; BINS]>);

impl<T> Index<[u8; 3]> for Histogram3<T> {
    type Output = T;

    #[inline]
    fn index(&self, bin: [u8; 3]) -> &Self::Output {
        &self.as_flattened()[voxel_offset(bin)]
    }
}

impl<T> IndexMut<[u8; 3]> for Histogram3<T> {
    #[inline]
    fn index_mut(&mut self, bin: [u8; 3]) -> &mut Self::Output {
        &mut self.0.as_flattened_mut().as_flattened_mut()[voxel_offset(bin)]
    }
}

impl<T: Zeroable> Histogram3<T> {
    /// Create a new [`Histogram3`] from zeroed memory.
    ///
    /// # Errors
    ///
    /// Returns [`QuantizeError::OutOfMemory`] if the histogram could not be allocated.
    pub fn try_new() -> Result<Self, QuantizeError> {
        bytemuck::try_zeroed_box().map(Self).map_err(|()| {
            log::error!("failed to allocate a {BINS}x{BINS}x{BINS} histogram");
            QuantizeError::OutOfMemory
        })
    }
}

impl<T> Histogram3<T> {
    /// Returns a flat slice of histogram bins, see [`voxel_offset`].
    #[inline]
    pub fn as_flattened(&self) -> &[T] {
        self.0.as_flattened().as_flattened()
    }
}

impl Histogram3<Stats> {
    /// Add the given pixels to the histogram.
    pub fn add_pixels(&mut self, pixels: &[[u8; 3]]) {
        for &color in pixels {
            let Stats { count, components, sum_squared } = &mut self[bin(color)];
            let [r, g, b] = color;

            *count += 1;
            for (sum, c) in components.iter_mut().zip(color) {
                *sum += i64::from(c);
            }

            let squared =
                SQUARES[usize::from(r)] + SQUARES[usize::from(g)] + SQUARES[usize::from(b)];
            #[allow(clippy::cast_precision_loss)] // at most 3 * 255^2, which is exact in an f32
            {
                *sum_squared += squared as f32;
            }
        }
    }

    /// Convert the histogram bins into cumulative moments to allow inclusion-exclusion lookups.
    pub fn calc_cumulative_moments(&mut self) {
        for r in 1..=MAX_BIN {
            let area = &mut [Stats::zero(); BINS];

            for g in 1..=MAX_BIN {
                let mut line = Stats::zero();

                for b in 1..=MAX_BIN {
                    let area = &mut area[usize::from(b)];
                    line += self[[r, g, b]];
                    *area += line;
                    self[[r, g, b]] = self[[r - 1, g, b]] + *area;
                }
            }
        }
    }
}

impl Histogram3<u8> {
    /// Assign `label` to every bin inside the given cube.
    pub fn mark(&mut self, Cube { min, max }: Cube, label: u8) {
        for r in (min[0] + 1)..=max[0] {
            for g in (min[1] + 1)..=max[1] {
                for b in (min[2] + 1)..=max[2] {
                    self[[r, g, b]] = label;
                }
            }
        }
    }
}

/// Trait for cumulative tables that allow inclusion-exclusion lookups over a [`Cube`].
pub trait InclusionExclusion<T> {
    /// Returns the sum of the histogram bins inside the given cube.
    fn volume(&self, cube: Cube) -> T;

    /// Returns the part of [`volume`](InclusionExclusion::volume) that does not depend on the
    /// upper bound of the cube along `axis`.
    fn bottom(&self, cube: Cube, axis: Axis) -> T;

    /// Returns the rest of [`volume`](InclusionExclusion::volume) with the upper bound of the
    /// cube along `axis` replaced by `pos`.
    ///
    /// `bottom(cube, axis) + top(cube, axis, pos)` is the sum over the part of the cube
    /// at or below `pos` along `axis`.
    fn top(&self, cube: Cube, axis: Axis, pos: u8) -> T;
}

impl<T> Histogram3<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T>,
{
    /// Returns the sum over the 2-dimensional cross section of `cube` at `pos` along `axis`.
    fn face(&self, Cube { min, max }: Cube, axis: Axis, pos: u8) -> T {
        let [u, v] = axis.others();
        let corner = |cu: u8, cv: u8| {
            let mut index = [0; 3];
            index[axis.index()] = pos;
            index[u] = cu;
            index[v] = cv;
            self[index]
        };
        corner(max[u], max[v]) - corner(max[u], min[v]) - corner(min[u], max[v])
            + corner(min[u], min[v])
    }
}

impl<T> InclusionExclusion<T> for Histogram3<T>
where
    T: Copy + Zero + Add<Output = T> + Sub<Output = T>,
{
    fn volume(&self, Cube { min, max }: Cube) -> T {
        let [r0, g0, b0] = min;
        let [r1, g1, b1] = max;
        // the term order is kept fixed, since it affects rounding of the f32 moments
        self[[r1, g1, b1]] - self[[r1, g1, b0]] - self[[r1, g0, b1]] + self[[r1, g0, b0]]
            - self[[r0, g1, b1]]
            + self[[r0, g1, b0]]
            + self[[r0, g0, b1]]
            - self[[r0, g0, b0]]
    }

    fn bottom(&self, cube: Cube, axis: Axis) -> T {
        T::zero() - self.face(cube, axis, cube.min[axis.index()])
    }

    fn top(&self, cube: Cube, axis: Axis, pos: u8) -> T {
        self.face(cube, axis, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use alloc::vec::Vec;
    use palette::cast::AsArrays as _;

    fn raw_histogram(pixels: &[[u8; 3]]) -> Histogram3<Stats> {
        let mut hist = Histogram3::try_new().unwrap();
        hist.add_pixels(pixels);
        hist
    }

    fn brute_force_volume(raw: &Histogram3<Stats>, Cube { min, max }: Cube) -> Stats {
        let mut sum = Stats::zero();
        for r in (min[0] + 1)..=max[0] {
            for g in (min[1] + 1)..=max[1] {
                for b in (min[2] + 1)..=max[2] {
                    sum += raw[[r, g, b]];
                }
            }
        }
        sum
    }

    fn test_cubes() -> Vec<Cube> {
        let mut cubes = alloc::vec![Cube::WHOLE];
        for lo in [0, 3, 9, 20] {
            for hi in [10, 21, 32] {
                if lo < hi {
                    cubes.push(Cube { min: [lo, 0, lo / 2], max: [hi, hi, 32] });
                    cubes.push(Cube { min: [0, lo, lo], max: [32, hi, hi] });
                }
            }
        }
        cubes.push(Cube { min: [4, 5, 6], max: [5, 6, 7] });
        cubes
    }

    #[test]
    fn bin_offsets_channels_by_one() {
        assert_eq!(bin([0, 7, 8]), [1, 1, 2]);
        assert_eq!(bin([255, 248, 247]), [32, 32, 31]);
        assert_eq!(voxel_offset([1, 2, 3]), 1089 + 66 + 3);
        assert_eq!(voxel_offset([32, 32, 32]), BINS * BINS * BINS - 1);
    }

    #[test]
    fn raw_histogram_counts_pixels() {
        let colors = test_data_1024();
        let hist = raw_histogram(colors.as_arrays());

        let total = hist.as_flattened().iter().map(|s| s.count).sum::<i64>();
        assert_eq!(total, 1024);

        for i in 0..BINS {
            #[allow(clippy::cast_possible_truncation)]
            let i = i as u8;
            for j in 0..BINS {
                #[allow(clippy::cast_possible_truncation)]
                let j = j as u8;
                assert!(hist[[0, i, j]].is_zero());
                assert!(hist[[i, 0, j]].is_zero());
                assert!(hist[[i, j, 0]].is_zero());
            }
        }

        let color = colors[0];
        let stats = hist[bin([color.red, color.green, color.blue])];
        assert!(stats.count >= 1);
        assert!(stats.components[0] >= i64::from(color.red));
    }

    #[test]
    fn flattened_layout_matches_voxel_offset() {
        let hist = raw_histogram(&[[16, 40, 200]]);
        let offset = voxel_offset(bin([16, 40, 200]));
        assert_eq!(hist.as_flattened()[offset].count, 1);
        assert_eq!(hist.as_flattened()[offset].components, [16, 40, 200]);
        #[allow(clippy::float_cmp)]
        {
            assert_eq!(hist.as_flattened()[offset].sum_squared, 256.0 + 1600.0 + 40000.0);
        }
    }

    #[test]
    fn cumulative_moments_total() {
        let colors = test_data_1024();
        let mut hist = raw_histogram(colors.as_arrays());
        hist.calc_cumulative_moments();

        let total = hist[[MAX_BIN; 3]];
        assert_eq!(total.count, 1024);
        for (i, sum) in total.components.into_iter().enumerate() {
            let expected = colors
                .as_arrays()
                .iter()
                .map(|c| i64::from(c[i]))
                .sum::<i64>();
            assert_eq!(sum, expected);
        }
    }

    #[test]
    fn volume_matches_brute_force() {
        let colors = test_data_1024();
        let raw = raw_histogram(colors.as_arrays());
        let mut moments = raw.clone();
        moments.calc_cumulative_moments();

        // the f32 moments accumulate rounding error relative to the total
        let tolerance = moments[[MAX_BIN; 3]].sum_squared * 1e-4;

        for cube in test_cubes() {
            let expected = brute_force_volume(&raw, cube);
            let actual = moments.volume(cube);
            assert_eq!(actual.count, expected.count);
            assert_eq!(actual.components, expected.components);
            assert!((actual.sum_squared - expected.sum_squared).abs() <= tolerance);
        }
    }

    #[test]
    fn bottom_plus_top_is_sub_volume() {
        let colors = test_data_1024();
        let mut moments = raw_histogram(colors.as_arrays());
        moments.calc_cumulative_moments();

        for cube in test_cubes() {
            for axis in Axis::ALL {
                let a = axis.index();
                let base = moments.bottom(cube, axis);
                for pos in (cube.min[a] + 1)..=cube.max[a] {
                    let mut lower = cube;
                    lower.max[a] = pos;
                    let actual = base + moments.top(cube, axis, pos);
                    let expected = moments.volume(lower);
                    assert_eq!(actual.count, expected.count);
                    assert_eq!(actual.components, expected.components);
                }
                assert_eq!(
                    (base + moments.top(cube, axis, cube.max[a])).count,
                    moments.volume(cube).count,
                );
            }
        }
    }

    #[test]
    fn mark_labels_exactly_the_cube() {
        let mut labels = Histogram3::<u8>::try_new().unwrap();
        let cube = Cube { min: [2, 0, 30], max: [4, 1, 32] };
        labels.mark(cube, 7);

        let marked = labels.as_flattened().iter().filter(|&&l| l == 7).count();
        assert_eq!(marked, 4);
        assert_eq!(labels[[3, 1, 31]], 7);
        assert_eq!(labels[[2, 1, 31]], 0);
        assert_eq!(labels[[4, 1, 32]], 7);
    }
}
