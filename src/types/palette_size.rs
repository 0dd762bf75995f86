use crate::PaletteSizeFromIntError;
use core::{fmt, num::NonZeroU16};

/// The number of colors requested for a palette.
///
/// This is a new type wrapper around [`NonZeroU16`] with the invariant that it lies
/// in the range `1..=256` given by [`PaletteSize::MIN`] and [`PaletteSize::MAX`].
///
/// # Examples
///
/// ```
/// # use wuquant::{PaletteSize, PaletteSizeFromIntError};
/// # fn main() -> Result<(), PaletteSizeFromIntError> {
/// let size = PaletteSize::try_from(16u16)?;
/// assert_eq!(size.as_usize(), 16);
/// assert_eq!(PaletteSize::try_from_u16(256), Some(PaletteSize::MAX));
/// assert_eq!(PaletteSize::try_from_u16(0), None);
/// assert_eq!(PaletteSize::from_u16_clamped(1000), PaletteSize::MAX);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PaletteSize(NonZeroU16);

impl PaletteSize {
    /// The smallest palette size, which is `1`.
    pub const MIN: Self = Self(NonZeroU16::MIN);

    /// The largest palette size, which is `256`.
    pub const MAX: Self = match NonZeroU16::new(u8::MAX as u16 + 1) {
        Some(max) => Self(max),
        None => Self::MIN,
    };

    /// Returns the palette size as a `u16`.
    #[must_use]
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0.get()
    }

    /// Returns the palette size as a `usize`.
    #[must_use]
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.as_u16() as usize
    }

    /// Create a [`PaletteSize`] from a `u16`, returning `None` if `value` is not in `1..=256`.
    #[must_use]
    #[inline]
    pub const fn try_from_u16(value: u16) -> Option<Self> {
        match NonZeroU16::new(value) {
            Some(value) if value.get() <= Self::MAX.as_u16() => Some(Self(value)),
            _ => None,
        }
    }

    /// Create a [`PaletteSize`] from a `usize`, returning `None` if `value` is not in `1..=256`.
    #[must_use]
    #[inline]
    pub const fn try_from_usize(value: usize) -> Option<Self> {
        if value <= Self::MAX.as_usize() {
            #[allow(clippy::cast_possible_truncation)]
            Self::try_from_u16(value as u16)
        } else {
            None
        }
    }

    /// Create a [`PaletteSize`] from a `u16`, clamping `value` to `1..=256`.
    #[must_use]
    #[inline]
    pub const fn from_u16_clamped(value: u16) -> Self {
        if let Some(size) = Self::try_from_u16(value) {
            size
        } else if value == 0 {
            Self::MIN
        } else {
            Self::MAX
        }
    }
}

impl From<PaletteSize> for u16 {
    #[inline]
    fn from(size: PaletteSize) -> Self {
        size.as_u16()
    }
}

impl From<PaletteSize> for usize {
    #[inline]
    fn from(size: PaletteSize) -> Self {
        size.as_usize()
    }
}

impl TryFrom<u16> for PaletteSize {
    type Error = PaletteSizeFromIntError;

    #[inline]
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::try_from_u16(value).ok_or(PaletteSizeFromIntError(()))
    }
}

impl TryFrom<u32> for PaletteSize {
    type Error = PaletteSizeFromIntError;

    #[inline]
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::try_from_u16)
            .ok_or(PaletteSizeFromIntError(()))
    }
}

impl TryFrom<usize> for PaletteSize {
    type Error = PaletteSizeFromIntError;

    #[inline]
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::try_from_usize(value).ok_or(PaletteSizeFromIntError(()))
    }
}

impl fmt::Display for PaletteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
