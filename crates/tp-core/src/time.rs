//! Search time model.
//!
//! # Design
//!
//! Every instant is stored canonically as whole **epoch seconds** (`i64`).
//! The millisecond view is derived (`secs * 1000`), never stored, so
//!
//! ```text
//! instant.millis() / 1000 == instant.secs()
//! ```
//!
//! holds for every value, including instants before the epoch.  Converting
//! from milliseconds truncates toward zero, matching Rust's integer division.
//!
//! Seconds are confined to [`Instant::MIN`]`..=`[`Instant::MAX`], the range
//! whose millisecond view fits an `i64`.  Constructors and arithmetic clamp
//! to that range; [`Instant::checked_from_secs`] rejects out-of-range input.
//!
//! Using integer seconds as the canonical unit means all path-time
//! arithmetic is exact: a child state's time is always its parent's time
//! plus a whole number of seconds.

use std::fmt;

/// An absolute point in time, in whole seconds since the Unix epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "i64", into = "i64"))]
pub struct Instant(i64);

impl Instant {
    pub const EPOCH: Instant = Instant(0);
    pub const MIN: Instant = Instant(i64::MIN / 1000);
    pub const MAX: Instant = Instant(i64::MAX / 1000);

    /// Clamps `secs` into `MIN..=MAX`.
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        if secs < Self::MIN.0 {
            Self::MIN
        } else if secs > Self::MAX.0 {
            Self::MAX
        } else {
            Instant(secs)
        }
    }

    /// `None` if `secs` has no exact millisecond view.
    #[inline]
    pub const fn checked_from_secs(secs: i64) -> Option<Self> {
        if secs < Self::MIN.0 || secs > Self::MAX.0 {
            None
        } else {
            Some(Instant(secs))
        }
    }

    /// Build from epoch milliseconds; sub-second precision is dropped
    /// (truncation toward zero).
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Instant(millis / 1000)
    }

    /// Epoch seconds.
    #[inline]
    pub const fn secs(self) -> i64 {
        self.0
    }

    /// Epoch milliseconds.  Always a multiple of 1000.
    #[inline]
    pub const fn millis(self) -> i64 {
        self.0 * 1000
    }

    /// The instant `delta` seconds after `self` (`delta` may be negative),
    /// saturating at `MIN` and `MAX`.
    #[inline]
    pub fn plus_secs(self, delta: i64) -> Instant {
        Instant::from_secs(self.0.saturating_add(delta))
    }

    /// Signed seconds from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Instant) -> i64 {
        self.0 - earlier.0
    }

    /// Seconds elapsed since local midnight (UTC based).
    #[inline]
    pub fn secs_of_day(self) -> u32 {
        self.0.rem_euclid(86_400) as u32
    }
}

impl std::ops::Add<i64> for Instant {
    type Output = Instant;
    #[inline]
    fn add(self, rhs: i64) -> Instant {
        self.plus_secs(rhs)
    }
}

impl From<i64> for Instant {
    fn from(secs: i64) -> Self {
        Instant::from_secs(secs)
    }
}

impl From<Instant> for i64 {
    fn from(t: Instant) -> i64 {
        t.0
    }
}

impl std::ops::Sub for Instant {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: Instant) -> i64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sod = self.secs_of_day();
        write!(
            f,
            "@{} ({:02}:{:02}:{:02})",
            self.0,
            sod / 3_600,
            (sod % 3_600) / 60,
            sod % 60
        )
    }
}
