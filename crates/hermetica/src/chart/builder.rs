//! Raw positions to [`NatalChart`].

use crate::chart::types::{NatalChart, PlanetPosition};
use crate::ephemeris::types::{BodyPosition, HouseCusps};
use crate::error::EphemerisError;
use crate::zodiac::{normalize_degrees, Body, Sign};
use std::collections::BTreeMap;

/// House (1..=12) whose cusp-to-cusp interval contains `longitude`.
///
/// The house is the one whose cusp lies the shortest forward arc behind the
/// longitude, so the wrap across 0/360 needs no special case and a body
/// exactly on a cusp belongs to the house that cusp opens.
pub fn house_of(longitude: f64, cusps: &[f64; 12]) -> u8 {
    let lon = normalize_degrees(longitude);
    let mut best = 0usize;
    let mut best_arc = f64::INFINITY;
    for (i, cusp) in cusps.iter().enumerate() {
        let arc = normalize_degrees(lon - cusp);
        if arc < best_arc {
            best_arc = arc;
            best = i;
        }
    }
    best as u8 + 1
}

fn validate_cusps(houses: &HouseCusps) -> Result<(), EphemerisError> {
    if houses.cusps.iter().any(|c| !c.is_finite())
        || !houses.ascendant.is_finite()
        || !houses.midheaven.is_finite()
    {
        return Err(EphemerisError::HouseCalculationFailed {
            message: "non-finite cusp or angle".to_string(),
        });
    }

    let mut total = 0.0;
    for i in 0..12 {
        let span = normalize_degrees(houses.cusps[(i + 1) % 12] - houses.cusps[i]);
        if span <= 0.0 {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!("cusps {} and {} coincide", i + 1, (i + 1) % 12 + 1),
            });
        }
        total += span;
    }
    // Out-of-order cusps wrap the circle more than once.
    if (total - 360.0).abs() > 1e-6 {
        return Err(EphemerisError::HouseCalculationFailed {
            message: format!("cusps are not in zodiacal order (span {:.3})", total),
        });
    }
    Ok(())
}

/// Build the immutable chart from provider output.
pub fn build_chart(
    bodies: &BTreeMap<Body, BodyPosition>,
    houses: &HouseCusps,
) -> Result<NatalChart, EphemerisError> {
    validate_cusps(houses)?;

    let mut placed = Vec::with_capacity(bodies.len());
    // BTreeMap iterates in Body declaration order, which is the canonical order.
    for (&body, pos) in bodies {
        // a non-finite longitude is no position at all
        if !pos.lon.is_finite() {
            return Err(EphemerisError::MissingBody {
                body: body.key().to_string(),
            });
        }
        let longitude = normalize_degrees(pos.lon);
        placed.push(PlanetPosition {
            body,
            longitude,
            latitude: pos.lat,
            speed: pos.speed_lon,
            retrograde: pos.is_retrograde(),
            sign: Sign::from_longitude(longitude),
            house: house_of(longitude, &houses.cusps),
            degree_in_sign: longitude % 30.0,
        });
    }

    let sun_house = placed
        .iter()
        .find(|p| p.body == Body::Sun)
        .map(|p| p.house)
        .ok_or_else(|| EphemerisError::MissingBody {
            body: Body::Sun.key().to_string(),
        })?;

    Ok(NatalChart {
        bodies: placed,
        house_system: houses.system,
        cusps: houses.cusps,
        ascendant: normalize_degrees(houses.ascendant),
        midheaven: normalize_degrees(houses.midheaven),
        diurnal: (7..=12).contains(&sun_house),
    })
}
