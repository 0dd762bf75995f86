use super::{
    cube::{Axis, Cube},
    histogram::{Histogram3, InclusionExclusion, Stats},
};
use crate::{PaletteSize, QuantizeError};
use alloc::vec::Vec;

/// Returns the sum of the squares of the given channel sums.
#[inline]
#[allow(clippy::cast_precision_loss)]
fn sum_of_squares(components: [i64; 3]) -> f32 {
    let [r, g, b] = components.map(|c| c as f32);
    r * r + g * g + b * b
}

/// The result of searching for the best cut along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    /// The new upper bound of the lower half (and lower bound of the upper half).
    pub pos: u8,
    /// The sum of `|sum|^2 / count` over both halves.
    pub score: f32,
}

/// A bounded list of cubes together with the cached variance of each cube.
#[derive(Debug, Clone)]
pub struct CubeSet {
    /// The cubes in creation order.
    cubes: Vec<Cube>,
    /// The cached variance of each cube, `0.0` for cubes that should not be cut again.
    variance: Vec<f32>,
    /// The maximum number of cubes.
    capacity: usize,
}

impl CubeSet {
    /// Allocate an empty [`CubeSet`] holding at most `k` cubes.
    fn try_new(k: PaletteSize) -> Result<Self, QuantizeError> {
        let capacity = k.as_usize();
        let mut cubes = Vec::new();
        let mut variance = Vec::new();
        cubes
            .try_reserve_exact(capacity)
            .and_then(|()| variance.try_reserve_exact(capacity))
            .map_err(|err| {
                log::error!("failed to allocate space for {capacity} cubes: {err}");
                QuantizeError::OutOfMemory
            })?;
        Ok(Self { cubes, variance, capacity })
    }

    /// Append a cube. The set must not be full.
    fn push(&mut self, cube: Cube, variance: f32) {
        debug_assert!(!self.is_full());
        self.cubes.push(cube);
        self.variance.push(variance);
    }

    /// Returns the index and variance of the first cube with the greatest variance.
    fn max_variance(&self) -> (usize, f32) {
        let mut max = (0, self.variance[0]);
        for (i, &v) in self.variance.iter().enumerate().skip(1) {
            if v > max.1 {
                max = (i, v);
            }
        }
        max
    }

    /// Returns whether no more cubes can be added.
    #[inline]
    fn is_full(&self) -> bool {
        self.cubes.len() >= self.capacity
    }

    /// Returns the number of cubes.
    #[inline]
    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    /// Returns the cubes in creation order.
    #[inline]
    pub fn as_slice(&self) -> &[Cube] {
        &self.cubes
    }
}

/// Greedy orthogonal bipartitioning over a histogram of cumulative moments.
pub struct Wu<'a> {
    /// The cumulative moments.
    moments: &'a Histogram3<Stats>,
}

impl<'a> Wu<'a> {
    /// Create a new [`Wu`] from a histogram that has been converted to cumulative moments.
    #[inline]
    pub fn new(moments: &'a Histogram3<Stats>) -> Self {
        Self { moments }
    }

    /// Returns the statistics of all bins inside the given cube.
    #[inline]
    pub fn volume(&self, cube: Cube) -> Stats {
        self.moments.volume(cube)
    }

    /// Compute the variance of the given cube, scaled by its pixel count.
    ///
    /// Returns `0.0` for a cube without pixels.
    #[allow(clippy::cast_precision_loss)]
    pub fn variance(&self, cube: Cube) -> f32 {
        let Stats { count, components, sum_squared } = self.volume(cube);
        if count == 0 {
            0.0
        } else {
            sum_squared - sum_of_squares(components) / count as f32
        }
    }

    /// Returns the variance of a newly cut cube, or `0.0` if it is a single bin.
    #[inline]
    fn cut_variance(&self, cube: Cube) -> f32 {
        if cube.cell_count() > 1 {
            self.variance(cube)
        } else {
            0.0
        }
    }

    /// Find the cut along `axis` that maximizes the separation between the two halves.
    ///
    /// `whole` must be the volume of `cube`. Candidates leaving either half without pixels
    /// are skipped. Returns `None` if no candidate has a positive score.
    #[allow(clippy::cast_precision_loss)]
    pub fn maximize(&self, cube: Cube, axis: Axis, whole: Stats) -> Option<Split> {
        let a = axis.index();
        let base = self.moments.bottom(cube, axis);

        let mut best = None;
        let mut max = 0.0;
        for pos in (cube.min[a] + 1)..cube.max[a] {
            let lower = base + self.moments.top(cube, axis, pos);
            if lower.count == 0 {
                continue;
            }
            let upper = whole - lower;
            if upper.count == 0 {
                continue;
            }

            let score = sum_of_squares(lower.components) / lower.count as f32
                + sum_of_squares(upper.components) / upper.count as f32;

            if score > max {
                max = score;
                best = Some(Split { pos, score });
            }
        }
        best
    }

    /// Attempt to cut `cube` in two.
    ///
    /// On success, `cube` becomes the lower half and the upper half is returned.
    /// Otherwise, `cube` is left unchanged.
    pub fn cut(&self, cube: &mut Cube) -> Option<Cube> {
        let whole = self.volume(*cube);
        let [red, green, blue] = Axis::ALL.map(|axis| self.maximize(*cube, axis, whole));

        let score = |split: Option<Split>| split.map_or(0.0, |s| s.score);
        let (r, g, b) = (score(red), score(green), score(blue));

        // ties go to red, then green
        let (axis, split) = if r >= g && r >= b {
            (Axis::Red, red)
        } else if g >= r && g >= b {
            (Axis::Green, green)
        } else {
            (Axis::Blue, blue)
        };

        let Split { pos, .. } = split?;
        let a = axis.index();
        let mut upper = *cube;
        upper.min[a] = pos;
        cube.max[a] = pos;

        log::trace!("cut along axis {a} at bin {pos}");

        Some(upper)
    }

    /// Split the histogram into at most `k` cubes, each time cutting the cube with the greatest
    /// variance.
    ///
    /// # Errors
    ///
    /// Returns [`QuantizeError::OutOfMemory`] if the cube list could not be allocated.
    pub fn partition(&self, k: PaletteSize) -> Result<CubeSet, QuantizeError> {
        let mut set = CubeSet::try_new(k)?;
        set.push(Cube::WHOLE, 0.0);

        let mut next = 0;
        while !set.is_full() {
            let mut cube = set.cubes[next];
            if let Some(upper) = self.cut(&mut cube) {
                set.cubes[next] = cube;
                set.variance[next] = self.cut_variance(cube);
                set.push(upper, self.cut_variance(upper));
            } else {
                // don't try to cut this cube again
                set.variance[next] = 0.0;
            }

            let (i, max) = set.max_variance();
            if max <= 0.0 {
                break;
            }
            next = i;
        }

        log::debug!("split the histogram into {} cubes", set.len());
        if set.len() < k.as_usize() {
            log::warn!("only got {} colors out of the {k} requested", set.len());
        }

        Ok(set)
    }
}
