//! Flap sets and the box that holds them.
//!
//! Flap numbers are `1..=MAX_FLAPS`. A [`FlapSet`] stores them as a bitmask where
//! bit `n` is set iff flap `n` is in the set (bit 0 is never used).

use std::fmt;

use thiserror::Error;

/// Largest supported box (bits 1..=15 of a `u16`).
pub const MAX_FLAPS: u8 = 15;

/// Default number of flaps on a box.
pub const DEFAULT_NUM_FLAPS: u8 = 9;

/// A set of distinct flap numbers in `1..=MAX_FLAPS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlapSet {
    mask: u16,
}

impl FlapSet {
    pub const EMPTY: FlapSet = FlapSet { mask: 0 };

    /// All flaps `1..=n`.
    pub fn full(n: u8) -> Self {
        assert!(n <= MAX_FLAPS, "n out of range: {}", n);
        FlapSet {
            mask: ((1u32 << (n as u32 + 1)) - 2) as u16,
        }
    }

    /// Build a set from flap numbers. Duplicates collapse.
    ///
    /// # Panics
    /// Panics if a flap is 0 or greater than `MAX_FLAPS`.
    pub fn from_flaps(flaps: &[u8]) -> Self {
        let mut s = FlapSet::EMPTY;
        for &f in flaps {
            s.insert(f);
        }
        s
    }

    /// Raw bitmask (bit `n` = flap `n`).
    #[inline]
    pub fn mask(self) -> u16 {
        self.mask
    }

    #[inline]
    pub fn from_mask(mask: u16) -> Self {
        FlapSet { mask: mask & !1 }
    }

    #[inline]
    pub fn contains(self, flap: u8) -> bool {
        flap >= 1 && flap <= MAX_FLAPS && (self.mask >> flap) & 1 != 0
    }

    pub fn insert(&mut self, flap: u8) {
        assert!(
            (1..=MAX_FLAPS).contains(&flap),
            "flap out of range: {}",
            flap
        );
        self.mask |= 1 << flap;
    }

    pub fn remove(&mut self, flap: u8) {
        if (1..=MAX_FLAPS).contains(&flap) {
            self.mask &= !(1 << flap);
        }
    }

    /// This set minus every flap in `other`.
    #[inline]
    pub fn without(self, other: FlapSet) -> FlapSet {
        FlapSet {
            mask: self.mask & !other.mask,
        }
    }

    /// Flaps of this set that are `<= limit`.
    #[inline]
    pub fn at_most(self, limit: u32) -> FlapSet {
        if limit >= MAX_FLAPS as u32 {
            return self;
        }
        let keep = ((1u32 << (limit + 1)) - 1) as u16;
        FlapSet {
            mask: self.mask & keep,
        }
    }

    #[inline]
    pub fn is_subset_of(self, other: FlapSet) -> bool {
        self.mask & !other.mask == 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.mask == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Sum of the flap numbers in the set.
    pub fn sum(self) -> u32 {
        self.iter().map(u32::from).sum()
    }

    /// Flap numbers in ascending order; `.rev()` gives them descending.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = u8> {
        (1..=MAX_FLAPS).filter(move |&f| (self.mask >> f) & 1 != 0)
    }

    pub fn to_vec(self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl FromIterator<u8> for FlapSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut s = FlapSet::EMPTY;
        for f in iter {
            s.insert(f);
        }
        s
    }
}

impl fmt::Display for FlapSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for flap in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", flap)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlapError {
    #[error("num_flaps must be in 1..={max}, got {got}")]
    InvalidBoxSize { got: u8, max: u8 },
    #[error("{0} is not a valid flap number")]
    NoSuchFlap(u8),
    #[error("flap {0} is already down")]
    AlreadyDown(u8),
}

/// The box: flaps `1..=num_flaps`, each either up (open) or down (closed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlapBox {
    num_flaps: u8,
    open: FlapSet,
}

impl FlapBox {
    /// A box with every flap up.
    pub fn new(num_flaps: u8) -> Result<Self, FlapError> {
        if num_flaps == 0 || num_flaps > MAX_FLAPS {
            return Err(FlapError::InvalidBoxSize {
                got: num_flaps,
                max: MAX_FLAPS,
            });
        }
        Ok(Self {
            num_flaps,
            open: FlapSet::full(num_flaps),
        })
    }

    pub fn num_flaps(&self) -> u8 {
        self.num_flaps
    }

    /// Flaps currently up.
    pub fn open_flaps(&self) -> FlapSet {
        self.open
    }

    /// Flaps currently down.
    pub fn closed_flaps(&self) -> FlapSet {
        FlapSet::full(self.num_flaps).without(self.open)
    }

    pub fn sum_open(&self) -> u32 {
        self.open.sum()
    }

    pub fn is_shut(&self) -> bool {
        self.open.is_empty()
    }

    pub fn is_open(&self, flap: u8) -> bool {
        self.open.contains(flap)
    }

    pub fn lower(&mut self, flap: u8) -> Result<(), FlapError> {
        if flap == 0 || flap > self.num_flaps {
            return Err(FlapError::NoSuchFlap(flap));
        }
        if !self.open.contains(flap) {
            return Err(FlapError::AlreadyDown(flap));
        }
        self.open.remove(flap);
        Ok(())
    }

    /// Lower every flap in `flaps`. Either all are lowered or none are.
    pub fn lower_all(&mut self, flaps: &[u8]) -> Result<(), FlapError> {
        let mut next = self.open;
        for &flap in flaps {
            if flap == 0 || flap > self.num_flaps {
                return Err(FlapError::NoSuchFlap(flap));
            }
            if !next.contains(flap) {
                return Err(FlapError::AlreadyDown(flap));
            }
            next.remove(flap);
        }
        self.open = next;
        Ok(())
    }

    /// Lower every flap except those in `keep` (which stay as they are).
    pub fn lower_except(&mut self, keep: FlapSet) {
        self.open = FlapSet::from_mask(self.open.mask() & keep.mask());
    }

    /// Raise every flap again.
    pub fn reset(&mut self) {
        self.open = FlapSet::full(self.num_flaps);
    }
}

impl Default for FlapBox {
    fn default() -> Self {
        Self {
            num_flaps: DEFAULT_NUM_FLAPS,
            open: FlapSet::full(DEFAULT_NUM_FLAPS),
        }
    }
}

impl fmt::Display for FlapBox {
    /// Two rows, each flap number in the row matching its state:
    ///
    /// ```text
    ///   UP: 1 2 3 4 5 6   8 9
    /// DOWN:             7
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut up = String::from("  UP: ");
        let mut down = String::from("DOWN: ");
        for flap in 1..=self.num_flaps {
            let label = flap.to_string();
            let blank = " ".repeat(label.len());
            if self.open.contains(flap) {
                up.push_str(&label);
                down.push_str(&blank);
            } else {
                up.push_str(&blank);
                down.push_str(&label);
            }
            if flap != self.num_flaps {
                up.push(' ');
                down.push(' ');
            }
        }
        write!(f, "{}\n{}", up, down)
    }
}
