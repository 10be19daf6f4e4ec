//! Which street modes may use an edge.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, TraverseMode};

const PED: u8  = 0b001;
const BIKE: u8 = 0b010;
const CAR: u8  = 0b100;

/// Permission set of a street edge: any combination of pedestrian, bicycle
/// and car access.
///
/// `CustomMotorVehicle` travels under the car bit.  Transit modes never
/// travel on streets, so no permission allows them.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetTraversalPermission(u8);

impl StreetTraversalPermission {
    pub const NONE: Self                   = Self(0);
    pub const PEDESTRIAN: Self             = Self(PED);
    pub const BICYCLE: Self                = Self(BIKE);
    pub const PEDESTRIAN_AND_BICYCLE: Self = Self(PED | BIKE);
    pub const CAR: Self                    = Self(CAR);
    pub const PEDESTRIAN_AND_CAR: Self     = Self(PED | CAR);
    pub const BICYCLE_AND_CAR: Self        = Self(BIKE | CAR);
    pub const ALL: Self                    = Self(PED | BIKE | CAR);

    const NAMED: [(Self, &'static str); 8] = [
        (Self::NONE, "NONE"),
        (Self::PEDESTRIAN, "PEDESTRIAN"),
        (Self::BICYCLE, "BICYCLE"),
        (Self::PEDESTRIAN_AND_BICYCLE, "PEDESTRIAN_AND_BICYCLE"),
        (Self::CAR, "CAR"),
        (Self::PEDESTRIAN_AND_CAR, "PEDESTRIAN_AND_CAR"),
        (Self::BICYCLE_AND_CAR, "BICYCLE_AND_CAR"),
        (Self::ALL, "ALL"),
    ];

    fn mode_bit(mode: TraverseMode) -> u8 {
        match mode {
            TraverseMode::Walk => PED,
            TraverseMode::Bicycle => BIKE,
            TraverseMode::Car | TraverseMode::CustomMotorVehicle => CAR,
            _ => 0,
        }
    }

    /// `true` if `mode` may traverse an edge carrying this permission.
    #[inline]
    pub fn allows(self, mode: TraverseMode) -> bool {
        let bit = Self::mode_bit(mode);
        bit != 0 && self.0 & bit != 0
    }

    /// `true` if any of the given permissions is granted.
    #[inline]
    pub fn allows_any(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub fn remove(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn as_str(self) -> &'static str {
        Self::NAMED[self.0 as usize].1
    }
}

impl Default for StreetTraversalPermission {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Debug for StreetTraversalPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StreetTraversalPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreetTraversalPermission {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::NAMED
            .iter()
            .find(|(_, name)| *name == upper)
            .map(|(p, _)| *p)
            .ok_or_else(|| CoreError::UnknownPermission(s.to_string()))
    }
}
