//! Swiss Ephemeris backend (feature `swiss-ephemeris`).

use crate::ephemeris::astro::julian_day;
use crate::ephemeris::types::{
    BodyPosition, EphemerisSettings, GeoLocation, HouseCusps, HouseSystem, RawPositions,
};
use crate::ephemeris::EphemerisProvider;
use crate::error::EphemerisError;
use crate::zodiac::{normalize_degrees, Body};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use swisseph::swe::{calc_ut, houses_ex, set_ephe_path};

/// FLG_SWIEPH | FLG_SPEED
const CALC_FLAGS: i32 = 2 | 256;
/// FLG_SWIEPH
const HOUSE_FLAGS: i32 = 2;

// Swiss Ephemeris body ids. The south node is derived from the true node.
fn swiss_id(body: Body) -> Option<i32> {
    match body {
        Body::Sun => Some(0),
        Body::Moon => Some(1),
        Body::Mercury => Some(2),
        Body::Venus => Some(3),
        Body::Mars => Some(4),
        Body::Jupiter => Some(5),
        Body::Saturn => Some(6),
        Body::Uranus => Some(7),
        Body::Neptune => Some(8),
        Body::Pluto => Some(9),
        Body::NorthNode => Some(11), // TRUE_NODE
        Body::Chiron => Some(15),
        Body::SouthNode => None,
    }
}

// The C library keeps one global data path. Every call runs under this lock,
// which also records the path last handed to the library.
static ACTIVE_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);

fn lock_library() -> Result<MutexGuard<'static, Option<PathBuf>>, String> {
    ACTIVE_PATH
        .lock()
        .map_err(|_| "Swiss Ephemeris lock poisoned".to_string())
}

/// Point the library at `path` unless it already reads from there.
fn activate(active: &mut Option<PathBuf>, path: &Path) -> Result<(), EphemerisError> {
    if active.as_deref() == Some(path) {
        return Ok(());
    }
    let text = path.to_str().ok_or_else(|| EphemerisError::FileNotFound {
        path: path.display().to_string(),
        message: "Ephemeris path is not valid UTF-8".to_string(),
    })?;
    set_ephe_path(text);
    log::info!("Swiss Ephemeris data path set to {}", text);
    *active = Some(path.to_path_buf());
    Ok(())
}

/// Data path the library is currently reading from, if any adapter set one.
pub fn active_ephemeris_path() -> Option<PathBuf> {
    lock_library().ok().and_then(|active| active.clone())
}

/// Swiss Ephemeris adapter implementation
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        let mut active = lock_library().map_err(|message| EphemerisError::FileNotFound {
            path: path.display().to_string(),
            message,
        })?;
        activate(&mut active, &path)?;

        Ok(Self { ephemeris_path: path })
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }

    fn calc_body(&self, body: Body, jd: f64, instant: DateTime<Utc>) -> Result<BodyPosition, EphemerisError> {
        let code = swiss_id(body).ok_or_else(|| EphemerisError::CalculationFailed {
            body: body.key().to_string(),
            instant,
            message: "no Swiss Ephemeris id".to_string(),
        })?;

        let result = calc_ut(jd, code as u32, CALC_FLAGS as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                body: body.key().to_string(),
                instant,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        Ok(BodyPosition {
            lon: normalize_degrees(result.out[0]),
            lat: result.out[1],
            speed_lon: result.out[3],
        })
    }

    fn calc_houses(&self, jd: f64, location: GeoLocation, system: HouseSystem) -> Result<HouseCusps, EphemerisError> {
        use swisseph::{AscMc, Cusp};

        let (c, a) = houses_ex(jd, HOUSE_FLAGS, location.lat, location.lon, system.swiss_code() as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let values = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!("{} cusps undefined at latitude {}", system, location.lat),
            });
        }

        Ok(HouseCusps {
            system,
            cusps: values.map(normalize_degrees),
            ascendant: normalize_degrees(ascmc.ascendant),
            midheaven: normalize_degrees(ascmc.mc),
        })
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn name(&self) -> &'static str {
        "swiss"
    }

    // Span of the standard semo/sepl data files shipped with the library.
    fn valid_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(1800, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            Utc.with_ymd_and_hms(2399, 12, 31, 23, 59, 59)
                .single()
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    fn positions_at(
        &self,
        instant: DateTime<Utc>,
        location: GeoLocation,
        settings: &EphemerisSettings,
    ) -> Result<RawPositions, EphemerisError> {
        let jd = julian_day(instant);
        let mut active = lock_library().map_err(|message| EphemerisError::CalculationFailed {
            body: "all".to_string(),
            instant,
            message,
        })?;
        // another adapter may have switched the library to its own data
        activate(&mut active, &self.ephemeris_path)?;

        let mut bodies = BTreeMap::new();
        for &body in &settings.bodies {
            if body == Body::SouthNode {
                let north = self.calc_body(Body::NorthNode, jd, instant)?;
                bodies.insert(
                    Body::SouthNode,
                    BodyPosition {
                        lon: normalize_degrees(north.lon + 180.0),
                        lat: -north.lat,
                        speed_lon: north.speed_lon,
                    },
                );
                continue;
            }
            bodies.insert(body, self.calc_body(body, jd, instant)?);
        }

        let houses = self.calc_houses(jd, location, settings.house_system)?;
        Ok(RawPositions { bodies, houses })
    }
}
