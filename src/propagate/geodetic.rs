use chrono::{DateTime, Utc};
use serde::Serialize;

// WGS-84 ellipsoid
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_B_KM: f64 = 6356.752_314_2;
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

const LATITUDE_ITERATIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geodetic {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub height_km: f64,
}

impl Geodetic {
    /// Height as a fraction of the mean Earth radius.
    pub fn normalized_altitude(&self) -> f64 {
        self.height_km / EARTH_MEAN_RADIUS_KM
    }

    pub fn is_finite(&self) -> bool {
        self.latitude_deg.is_finite() && self.longitude_deg.is_finite() && self.height_km.is_finite()
    }
}

/// Greenwich sidereal angle (radians) for the given instant.
pub fn sidereal_angle(at: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// Iterative ECEF to geodetic conversion on the WGS-84 ellipsoid.
///
/// Longitude comes straight from `atan2` and is therefore already in
/// [-180, 180]; latitude is in [-90, 90] because the horizontal distance is
/// never negative.
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> Geodetic {
    let [x, y, z] = ecef;
    let f = (WGS84_A_KM - WGS84_B_KM) / WGS84_A_KM;
    let e2 = 2.0 * f - f * f;
    let r = x.hypot(y);

    let longitude = y.atan2(x);
    let mut latitude = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..LATITUDE_ITERATIONS {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        latitude = (z + WGS84_A_KM * c * e2 * sin_lat).atan2(r);
    }
    let height_km = r / latitude.cos() - WGS84_A_KM * c;

    Geodetic {
        latitude_deg: latitude.to_degrees(),
        longitude_deg: longitude.to_degrees(),
        height_km,
    }
}
