use crate::error::EphemerisError;
use crate::zodiac::Body;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees, north positive
    pub lat: f64,
    /// Longitude in degrees, east positive
    pub lon: f64,
}

impl GeoLocation {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Raw ecliptic position of one body as reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    /// Longitude in degrees (0-360)
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Speed in longitude (degrees per day)
    pub speed_lon: f64,
}

impl BodyPosition {
    pub fn is_retrograde(&self) -> bool {
        self.speed_lon < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    WholeSign,
    Equal,
    Porphyry,
    Placidus,
    Koch,
    Regiomontanus,
    Campanus,
    Alcabitius,
    Morinus,
}

impl HouseSystem {
    pub const ALL: [HouseSystem; 9] = [
        HouseSystem::WholeSign,
        HouseSystem::Equal,
        HouseSystem::Porphyry,
        HouseSystem::Placidus,
        HouseSystem::Koch,
        HouseSystem::Regiomontanus,
        HouseSystem::Campanus,
        HouseSystem::Alcabitius,
        HouseSystem::Morinus,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            HouseSystem::WholeSign => "whole_sign",
            HouseSystem::Equal => "equal",
            HouseSystem::Porphyry => "porphyry",
            HouseSystem::Placidus => "placidus",
            HouseSystem::Koch => "koch",
            HouseSystem::Regiomontanus => "regiomontanus",
            HouseSystem::Campanus => "campanus",
            HouseSystem::Alcabitius => "alcabitius",
            HouseSystem::Morinus => "morinus",
        }
    }

    /// Swiss Ephemeris house system byte
    pub const fn swiss_code(self) -> u8 {
        match self {
            HouseSystem::WholeSign => b'W',
            HouseSystem::Equal => b'E',
            HouseSystem::Porphyry => b'O',
            HouseSystem::Placidus => b'P',
            HouseSystem::Koch => b'K',
            HouseSystem::Regiomontanus => b'R',
            HouseSystem::Campanus => b'C',
            HouseSystem::Alcabitius => b'A',
            HouseSystem::Morinus => b'M',
        }
    }

    pub fn parse(name: &str) -> Result<Self, EphemerisError> {
        let wanted = name.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.name() == wanted)
            .ok_or_else(|| EphemerisError::InvalidHouseSystem {
                system: name.to_string(),
                valid: Self::ALL.iter().map(|s| s.name().to_string()).collect(),
            })
    }
}

impl Default for HouseSystem {
    fn default() -> Self {
        HouseSystem::WholeSign
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// House cusps and angles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCusps {
    pub system: HouseSystem,
    /// Cusp longitudes for houses 1..=12, in house order
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Everything a provider reports for one instant and place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPositions {
    pub bodies: BTreeMap<Body, BodyPosition>,
    pub houses: HouseCusps,
}

/// Settings for ephemeris calculations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSettings {
    pub house_system: HouseSystem,
    /// Bodies to compute; nodes and Chiron included by default
    pub bodies: Vec<Body>,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            house_system: HouseSystem::default(),
            bodies: Body::ALL.to_vec(),
        }
    }
}
