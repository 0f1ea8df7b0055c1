//! Zodiac primitives shared by every engine.
//!
//! Signs, bodies and sect are closed sets, so they are plain enums with
//! `const` lookups instead of string ids.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Shortest arc between two longitudes, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = normalize_degrees(a - b);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    /// 0 = Aries .. 11 = Pisces.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Wraps, so `from_index(12)` is Aries again.
    pub const fn from_index(index: usize) -> Sign {
        Self::ALL[index % 12]
    }

    /// `floor(longitude / 30) mod 12`, invariant under whole turns.
    pub fn from_longitude(longitude: f64) -> Sign {
        let normalized = normalize_degrees(longitude);
        Self::from_index((normalized / 30.0).floor() as usize)
    }

    /// The sign `steps` signs further along the zodiac (negative steps go back).
    pub fn offset(self, steps: i32) -> Sign {
        let idx = (self.index() as i32 + steps).rem_euclid(12);
        Self::from_index(idx as usize)
    }

    /// Whole-sign distance from `self` forward to `other`, in `0..12`.
    pub fn distance_to(self, other: Sign) -> u8 {
        ((other.index() as i32 - self.index() as i32).rem_euclid(12)) as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Sign::Aries => "aries",
            Sign::Taurus => "taurus",
            Sign::Gemini => "gemini",
            Sign::Cancer => "cancer",
            Sign::Leo => "leo",
            Sign::Virgo => "virgo",
            Sign::Libra => "libra",
            Sign::Scorpio => "scorpio",
            Sign::Sagittarius => "sagittarius",
            Sign::Capricorn => "capricorn",
            Sign::Aquarius => "aquarius",
            Sign::Pisces => "pisces",
        }
    }

    /// Key used by the interpretation corpus tables.
    pub const fn corpus_name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Tauro",
            Sign::Gemini => "Géminis",
            Sign::Cancer => "Cáncer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Escorpio",
            Sign::Sagittarius => "Sagitario",
            Sign::Capricorn => "Capricornio",
            Sign::Aquarius => "Acuario",
            Sign::Pisces => "Piscis",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Sign::Aries => "♈",
            Sign::Taurus => "♉",
            Sign::Gemini => "♊",
            Sign::Cancer => "♋",
            Sign::Leo => "♌",
            Sign::Virgo => "♍",
            Sign::Libra => "♎",
            Sign::Scorpio => "♏",
            Sign::Sagittarius => "♐",
            Sign::Capricorn => "♑",
            Sign::Aquarius => "♒",
            Sign::Pisces => "♓",
        }
    }

    pub const fn element(self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }

    pub const fn modality(self) -> Modality {
        match self.index() % 3 {
            0 => Modality::Cardinal,
            1 => Modality::Fixed,
            _ => Modality::Mutable,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracked celestial bodies, in canonical chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    SouthNode,
    Chiron,
}

impl Body {
    pub const ALL: [Body; 13] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::NorthNode,
        Body::SouthNode,
        Body::Chiron,
    ];

    /// The seven visible planets, in hierarchy order (Saturn first).
    pub const CLASSICAL: [Body; 7] = [
        Body::Saturn,
        Body::Jupiter,
        Body::Mars,
        Body::Sun,
        Body::Venus,
        Body::Mercury,
        Body::Moon,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::NorthNode => "north_node",
            Body::SouthNode => "south_node",
            Body::Chiron => "chiron",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::NorthNode => "North Node",
            Body::SouthNode => "South Node",
            Body::Chiron => "Chiron",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Body::Sun => "☉",
            Body::Moon => "☽",
            Body::Mercury => "☿",
            Body::Venus => "♀",
            Body::Mars => "♂",
            Body::Jupiter => "♃",
            Body::Saturn => "♄",
            Body::Uranus => "♅",
            Body::Neptune => "♆",
            Body::Pluto => "♇",
            Body::NorthNode => "☊",
            Body::SouthNode => "☋",
            Body::Chiron => "⚷",
        }
    }

    pub fn from_key(key: &str) -> Option<Body> {
        let key = key.to_lowercase();
        Self::ALL.iter().copied().find(|b| b.key() == key)
    }

    pub const fn is_classical(self) -> bool {
        self.hierarchy_rank().is_some()
    }

    /// Position in the traditional planetary hierarchy
    /// Saturn > Jupiter > Mars > Sun > Venus > Mercury > Moon (0 = Saturn).
    pub const fn hierarchy_rank(self) -> Option<u8> {
        match self {
            Body::Saturn => Some(0),
            Body::Jupiter => Some(1),
            Body::Mars => Some(2),
            Body::Sun => Some(3),
            Body::Venus => Some(4),
            Body::Mercury => Some(5),
            Body::Moon => Some(6),
            _ => None,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Day or night chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sect {
    Day,
    Night,
}

impl Sect {
    pub const fn from_diurnal(is_diurnal: bool) -> Sect {
        if is_diurnal {
            Sect::Day
        } else {
            Sect::Night
        }
    }

    /// Suffix used by sect-keyed corpus entries (`Tauro_Day`).
    pub const fn corpus_suffix(self) -> &'static str {
        match self {
            Sect::Day => "Day",
            Sect::Night => "Night",
        }
    }

    /// The luminary that leads the sect.
    pub const fn light(self) -> Body {
        match self {
            Sect::Day => Body::Sun,
            Sect::Night => Body::Moon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        let tiny = normalize_degrees(-1e-15);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_sign_from_longitude_wraps() {
        for lon in [0.0, 29.999, 30.0, 123.4, 359.99] {
            assert_eq!(Sign::from_longitude(lon), Sign::from_longitude(lon + 360.0));
            assert_eq!(Sign::from_longitude(lon), Sign::from_longitude(lon - 720.0));
        }
        assert_eq!(Sign::from_longitude(30.0), Sign::Taurus);
        assert_eq!(Sign::from_longitude(-0.5), Sign::Pisces);
    }

    #[test]
    fn test_sign_elements_and_modalities() {
        assert_eq!(Sign::Leo.element(), Element::Fire);
        assert_eq!(Sign::Capricorn.element(), Element::Earth);
        assert_eq!(Sign::Aquarius.element(), Element::Air);
        assert_eq!(Sign::Pisces.element(), Element::Water);
        assert_eq!(Sign::Libra.modality(), Modality::Cardinal);
        assert_eq!(Sign::Scorpio.modality(), Modality::Fixed);
        assert_eq!(Sign::Gemini.modality(), Modality::Mutable);
    }

    #[test]
    fn test_sign_offset_and_distance() {
        assert_eq!(Sign::Pisces.offset(1), Sign::Aries);
        assert_eq!(Sign::Aries.offset(-1), Sign::Pisces);
        assert_eq!(Sign::Aries.distance_to(Sign::Capricorn), 9);
        assert_eq!(Sign::Capricorn.distance_to(Sign::Aries), 3);
    }

    #[test]
    fn test_angular_distance() {
        assert!((angular_distance(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((angular_distance(0.0, 180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_hierarchy_covers_classical_only() {
        for (i, body) in Body::CLASSICAL.iter().enumerate() {
            assert_eq!(body.hierarchy_rank(), Some(i as u8));
        }
        assert!(!Body::Pluto.is_classical());
        assert_eq!(Body::from_key("North_Node"), Some(Body::NorthNode));
    }
}
