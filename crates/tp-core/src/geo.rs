//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Turn angles are derived from
//! bearings between consecutive points, and street segments in dense grids
//! can be only a few metres long, so single precision is not enough here.

use crate::{CoreError, CoreResult};

/// Mean Earth radius, metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Like [`GeoPoint::new`] but rejects non-finite or out-of-range values.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
            return Err(CoreError::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial great-circle bearing from `self` towards `other`, in degrees
    /// clockwise from north, normalised to `[0, 360)`.
    ///
    /// Returns `0.0` for coincident points.
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        if self == other {
            return 0.0;
        }
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        y.atan2(x).to_degrees().rem_euclid(360.0)
    }

    /// Approximate bounding-box check, much cheaper than `distance_m`.
    #[inline]
    pub fn within_bbox(self, center: GeoPoint, half_deg: f64) -> bool {
        (self.lat - center.lat).abs() <= half_deg
            && (self.lon - center.lon).abs() <= half_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Signed turn angle from an arriving bearing to a departing bearing, in
/// degrees within `(-180, 180]`.  Positive is clockwise (a right turn).
pub fn normalize_turn_deg(arrive_bearing: f64, depart_bearing: f64) -> f64 {
    let d = (depart_bearing - arrive_bearing).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}
