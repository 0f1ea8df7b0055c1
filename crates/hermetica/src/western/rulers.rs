//! Sign rulers for Western astrology.
//!
//! Maps zodiac signs to their planetary rulers (traditional and modern).

use crate::chart::NatalChart;
use crate::zodiac::{Body, Sign};

/// Traditional (seven-planet) ruler of a sign
pub const fn traditional_ruler(sign: Sign) -> Body {
    match sign {
        Sign::Aries => Body::Mars,
        Sign::Taurus => Body::Venus,
        Sign::Gemini => Body::Mercury,
        Sign::Cancer => Body::Moon,
        Sign::Leo => Body::Sun,
        Sign::Virgo => Body::Mercury,
        Sign::Libra => Body::Venus,
        Sign::Scorpio => Body::Mars,
        Sign::Sagittarius => Body::Jupiter,
        Sign::Capricorn => Body::Saturn,
        Sign::Aquarius => Body::Saturn,
        Sign::Pisces => Body::Jupiter,
    }
}

/// Modern co-ruler, for the three signs given to the outer planets
pub const fn modern_ruler(sign: Sign) -> Option<Body> {
    match sign {
        Sign::Scorpio => Some(Body::Pluto),
        Sign::Aquarius => Some(Body::Uranus),
        Sign::Pisces => Some(Body::Neptune),
        _ => None,
    }
}

/// Get sign ruler, preferring the modern co-ruler when `modern` is set
pub fn sign_ruler(sign: Sign, modern: bool) -> Body {
    if modern {
        if let Some(body) = modern_ruler(sign) {
            return body;
        }
    }
    traditional_ruler(sign)
}

/// Traditional ruler of the sign on a house cusp, `None` outside 1..=12
pub fn ruler_of_house(chart: &NatalChart, house: u8) -> Option<Body> {
    chart.house_sign(house).map(traditional_ruler)
}
