use super::histogram::MAX_BIN;

/// One of the three color axes of the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The red channel.
    Red,
    /// The green channel.
    Green,
    /// The blue channel.
    Blue,
}

impl Axis {
    /// All axes, in the order they are tried when cutting.
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Returns the index of the axis into a `[r, g, b]` array.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    /// Returns the indices of the two other axes.
    #[inline]
    pub const fn others(self) -> [usize; 2] {
        match self {
            Self::Red => [1, 2],
            Self::Green => [0, 2],
            Self::Blue => [0, 1],
        }
    }
}

/// A box over a range of histogram bins.
///
/// A cube covers the bins `min[i] + 1..=max[i]` along each axis `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube {
    /// The lower bin indices (exclusive).
    pub min: [u8; 3],
    /// The upper bin indices (inclusive).
    pub max: [u8; 3],
}

impl Cube {
    /// The cube covering the whole histogram.
    pub const WHOLE: Self = Self { min: [0; 3], max: [MAX_BIN; 3] };

    /// Returns the number of histogram bins inside the cube.
    #[inline]
    pub fn cell_count(&self) -> u32 {
        let [r, g, b] = [0, 1, 2].map(|i| u32::from(self.max[i] - self.min[i]));
        r * g * b
    }

    /// Returns whether the given histogram bin lies inside the cube.
    #[cfg(test)]
    #[inline]
    pub fn contains(&self, bin: [u8; 3]) -> bool {
        (0..3).all(|i| self.min[i] < bin[i] && bin[i] <= self.max[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_cube_cells() {
        assert_eq!(Cube::WHOLE.cell_count(), 32 * 32 * 32);
        assert!(Cube::WHOLE.contains([1, 1, 1]));
        assert!(Cube::WHOLE.contains([32, 32, 32]));
        assert!(!Cube::WHOLE.contains([0, 5, 5]));
    }

    #[test]
    fn single_cell_cube() {
        let cube = Cube { min: [3, 4, 5], max: [4, 5, 6] };
        assert_eq!(cube.cell_count(), 1);
        assert!(cube.contains([4, 5, 6]));
        assert!(!cube.contains([3, 5, 6]));
    }

    #[test]
    fn other_axes() {
        for axis in Axis::ALL {
            let [u, v] = axis.others();
            assert_ne!(u, axis.index());
            assert_ne!(v, axis.index());
            assert!(u < v);
        }
    }
}
