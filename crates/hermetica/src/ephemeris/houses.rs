//! House cusp construction from the angles.

use crate::ephemeris::types::{HouseCusps, HouseSystem};
use crate::error::EphemerisError;
use crate::zodiac::normalize_degrees;

/// Build the 12 cusps for the systems that can be derived from the ascendant
/// and midheaven alone.
pub fn cusps_from_angles(
    system: HouseSystem,
    ascendant: f64,
    midheaven: f64,
) -> Result<HouseCusps, EphemerisError> {
    let cusps = match system {
        HouseSystem::WholeSign => whole_sign_cusps(ascendant),
        HouseSystem::Equal => equal_cusps(ascendant),
        HouseSystem::Porphyry => porphyry_cusps(ascendant, midheaven),
        other => {
            return Err(EphemerisError::InvalidHouseSystem {
                system: other.name().to_string(),
                valid: supported_systems(),
            })
        }
    };
    Ok(HouseCusps {
        system,
        cusps,
        ascendant: normalize_degrees(ascendant),
        midheaven: normalize_degrees(midheaven),
    })
}

/// Systems [`cusps_from_angles`] can build.
pub fn supported_systems() -> Vec<String> {
    [HouseSystem::WholeSign, HouseSystem::Equal, HouseSystem::Porphyry]
        .iter()
        .map(|s| s.name().to_string())
        .collect()
}

fn whole_sign_cusps(ascendant: f64) -> [f64; 12] {
    let first = (normalize_degrees(ascendant) / 30.0).floor() * 30.0;
    std::array::from_fn(|i| normalize_degrees(first + 30.0 * i as f64))
}

fn equal_cusps(ascendant: f64) -> [f64; 12] {
    std::array::from_fn(|i| normalize_degrees(ascendant + 30.0 * i as f64))
}

/// Each quadrant between consecutive angles is trisected.
fn porphyry_cusps(ascendant: f64, midheaven: f64) -> [f64; 12] {
    let asc = normalize_degrees(ascendant);
    let ic = normalize_degrees(midheaven + 180.0);
    let dsc = normalize_degrees(ascendant + 180.0);
    let mc = normalize_degrees(midheaven);

    let mut cusps = [0.0; 12];
    for (quadrant, (start, end)) in [(asc, ic), (ic, dsc), (dsc, mc), (mc, asc)]
        .into_iter()
        .enumerate()
    {
        let span = normalize_degrees(end - start);
        for step in 0..3 {
            cusps[quadrant * 3 + step] = normalize_degrees(start + span * step as f64 / 3.0);
        }
    }
    cusps
}
