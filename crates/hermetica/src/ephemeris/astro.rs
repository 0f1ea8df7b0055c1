//! Time scales and the rotating-sky quantities that depend only on time and place.

use crate::zodiac::normalize_degrees;
use chrono::{DateTime, Utc};

/// Julian Day of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// J2000.0
pub const J2000: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert UTC datetime to Julian Day
pub fn julian_day(dt: DateTime<Utc>) -> f64 {
    let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Julian centuries since J2000.0
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000) / 36_525.0
}

/// Mean obliquity of the ecliptic in degrees.
pub fn mean_obliquity(t: f64) -> f64 {
    23.439_291_1 - (46.8150 * t + 0.00059 * t * t - 0.001_813 * t * t * t) / 3600.0
}

/// Greenwich mean sidereal time in degrees (IAU 1982 polynomial).
pub fn greenwich_sidereal_time(jd: f64) -> f64 {
    let t = centuries_since_j2000(jd);
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * (jd - J2000) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Right ascension of the meridian for an east-positive longitude.
pub fn ramc(jd: f64, longitude: f64) -> f64 {
    normalize_degrees(greenwich_sidereal_time(jd) + longitude)
}

/// Ecliptic longitude of the ascendant.
pub fn ascendant(ramc_deg: f64, obliquity_deg: f64, latitude_deg: f64) -> f64 {
    let ramc = ramc_deg.to_radians();
    let eps = obliquity_deg.to_radians();
    let phi = latitude_deg.to_radians();
    let y = ramc.cos();
    let x = -(ramc.sin() * eps.cos() + phi.tan() * eps.sin());
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Ecliptic longitude of the midheaven. Always in the same half of the
/// zodiac as the RAMC, so no quadrant correction is needed.
pub fn midheaven(ramc_deg: f64, obliquity_deg: f64) -> f64 {
    let ramc = ramc_deg.to_radians();
    let eps = obliquity_deg.to_radians();
    normalize_degrees(ramc.sin().atan2(ramc.cos() * eps.cos()).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_julian_day_j2000() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_day(dt) - J2000).abs() < 1e-9);
    }

    #[test]
    fn test_obliquity_at_j2000() {
        assert!((mean_obliquity(0.0) - 23.4392911).abs() < 1e-9);
    }

    #[test]
    fn test_gmst_at_j2000() {
        // 18h 41m 50.55s
        assert!((greenwich_sidereal_time(J2000) - 280.46061837).abs() < 1e-6);
    }

    #[test]
    fn test_midheaven_at_equinox_points() {
        let eps = 23.44;
        assert!(midheaven(0.0, eps).abs() < 1e-9);
        assert!((midheaven(90.0, eps) - 90.0).abs() < 1e-9);
        assert!((midheaven(180.0, eps) - 180.0).abs() < 1e-9);
        assert!((midheaven(270.0, eps) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_ascendant_on_equator_is_ninety_from_mc() {
        // With RAMC 0 at the equator the ascendant is 0 Cancer.
        let asc = ascendant(0.0, 23.44, 0.0);
        assert!((asc - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_ascendant_ahead_of_midheaven() {
        for ramc_deg in [10.0, 100.0, 200.0, 300.0] {
            for lat in [-50.0, 0.0, 40.4, 60.0] {
                let asc = ascendant(ramc_deg, 23.44, lat);
                let mc = midheaven(ramc_deg, 23.44);
                let arc = normalize_degrees(asc - mc);
                assert!(arc > 0.0 && arc < 180.0, "ramc {ramc_deg} lat {lat} arc {arc}");
            }
        }
    }
}
