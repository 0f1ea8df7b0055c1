//! The seven Hermetic lots.
//!
//! Day and night charts use mirrored formulas. Each sect has one pure
//! function computing all seven longitudes; [`LotFormula::for_sect`] picks
//! it once and callers never branch on sect themselves.

use crate::chart::NatalChart;
use crate::error::EphemerisError;
use crate::zodiac::{normalize_degrees, Body, Sect, Sign};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotKind {
    Fortune,
    Spirit,
    Eros,
    Necessity,
    Courage,
    Victory,
    Nemesis,
}

impl LotKind {
    pub const ALL: [LotKind; 7] = [
        LotKind::Fortune,
        LotKind::Spirit,
        LotKind::Eros,
        LotKind::Necessity,
        LotKind::Courage,
        LotKind::Victory,
        LotKind::Nemesis,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            LotKind::Fortune => "fortune",
            LotKind::Spirit => "spirit",
            LotKind::Eros => "eros",
            LotKind::Necessity => "necessity",
            LotKind::Courage => "courage",
            LotKind::Victory => "victory",
            LotKind::Nemesis => "nemesis",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            LotKind::Fortune => "Fortune",
            LotKind::Spirit => "Spirit",
            LotKind::Eros => "Eros",
            LotKind::Necessity => "Necessity",
            LotKind::Courage => "Courage",
            LotKind::Victory => "Victory",
            LotKind::Nemesis => "Nemesis",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            LotKind::Fortune => "⊗",
            LotKind::Spirit => "⊙",
            LotKind::Eros => "♥",
            LotKind::Necessity => "⚗",
            LotKind::Courage => "⚔",
            LotKind::Victory => "♛",
            LotKind::Nemesis => "⚖",
        }
    }

    pub const fn meaning(self) -> &'static str {
        match self {
            LotKind::Fortune => "Health, body, prosperity and material circumstances.",
            LotKind::Spirit => "Will, action, career and what one actively pursues.",
            LotKind::Eros => "Desires, appetites, love and social bonds.",
            LotKind::Necessity => "Limitations, obligations and unavoidable struggles.",
            LotKind::Courage => "Boldness, daring action and risk-taking.",
            LotKind::Victory => "Success, achievement and overcoming obstacles.",
            LotKind::Nemesis => "Causes of misfortune, obstacles and hidden enemies.",
        }
    }

    pub fn from_key(key: &str) -> Option<LotKind> {
        LotKind::ALL.into_iter().find(|k| k.key() == key)
    }
}

/// Chart longitudes the formulas read
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LotInputs {
    pub ascendant: f64,
    pub sun: f64,
    pub moon: f64,
    pub mercury: f64,
    pub venus: f64,
    pub mars: f64,
    pub jupiter: f64,
    pub saturn: f64,
}

impl LotInputs {
    pub fn from_chart(chart: &NatalChart) -> Result<Self, EphemerisError> {
        let lon = |body: Body| {
            chart.longitude_of(body).ok_or_else(|| EphemerisError::MissingBody {
                body: body.key().to_string(),
            })
        };
        Ok(Self {
            ascendant: chart.ascendant(),
            sun: lon(Body::Sun)?,
            moon: lon(Body::Moon)?,
            mercury: lon(Body::Mercury)?,
            venus: lon(Body::Venus)?,
            mars: lon(Body::Mars)?,
            jupiter: lon(Body::Jupiter)?,
            saturn: lon(Body::Saturn)?,
        })
    }
}

/// `from + plus - minus`, normalized
fn project(from: f64, plus: f64, minus: f64) -> f64 {
    normalize_degrees(from + plus - minus)
}

/// Day formulas, in [`LotKind::ALL`] order.
pub fn diurnal(i: &LotInputs) -> [f64; 7] {
    let fortune = project(i.ascendant, i.moon, i.sun);
    let spirit = project(i.ascendant, i.sun, i.moon);
    [
        fortune,
        spirit,
        project(i.ascendant, i.venus, spirit),
        project(i.ascendant, fortune, i.mercury),
        project(i.ascendant, fortune, i.mars),
        project(i.ascendant, i.jupiter, spirit),
        project(i.ascendant, fortune, i.saturn),
    ]
}

/// Night formulas, in [`LotKind::ALL`] order.
pub fn nocturnal(i: &LotInputs) -> [f64; 7] {
    let fortune = project(i.ascendant, i.sun, i.moon);
    let spirit = project(i.ascendant, i.moon, i.sun);
    [
        fortune,
        spirit,
        project(i.ascendant, spirit, i.venus),
        project(i.ascendant, i.mercury, fortune),
        project(i.ascendant, i.mars, fortune),
        project(i.ascendant, spirit, i.jupiter),
        project(i.ascendant, i.saturn, fortune),
    ]
}

/// Formula set for one sect
#[derive(Clone, Copy)]
pub struct LotFormula {
    pub sect: Sect,
    compute: fn(&LotInputs) -> [f64; 7],
}

impl LotFormula {
    pub fn for_sect(sect: Sect) -> Self {
        match sect {
            Sect::Day => Self { sect, compute: diurnal },
            Sect::Night => Self { sect, compute: nocturnal },
        }
    }

    pub fn longitudes(&self, inputs: &LotInputs) -> [f64; 7] {
        (self.compute)(inputs)
    }
}

impl std::fmt::Debug for LotFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LotFormula").field("sect", &self.sect).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub kind: LotKind,
    pub name: String,
    pub symbol: String,
    pub meaning: String,
    pub longitude: f64,
    pub sign: Sign,
    pub house: u8,
    pub degree_in_sign: f64,
}

/// All seven lots in [`LotKind::ALL`] order.
pub fn compute_lots(chart: &NatalChart) -> Result<Vec<Lot>, EphemerisError> {
    let inputs = LotInputs::from_chart(chart)?;
    let formula = LotFormula::for_sect(chart.sect());

    Ok(LotKind::ALL
        .into_iter()
        .zip(formula.longitudes(&inputs))
        .map(|(kind, longitude)| Lot {
            kind,
            name: kind.name().to_string(),
            symbol: kind.symbol().to_string(),
            meaning: kind.meaning().to_string(),
            longitude,
            sign: Sign::from_longitude(longitude),
            house: chart.house_of_longitude(longitude),
            degree_in_sign: longitude % 30.0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> LotInputs {
        LotInputs {
            ascendant: 10.0,
            sun: 100.0,
            moon: 220.0,
            mercury: 80.0,
            venus: 130.0,
            mars: 300.0,
            jupiter: 45.0,
            saturn: 275.0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_day_fortune_and_spirit() {
        let lots = diurnal(&inputs());
        assert!(close(lots[0], 130.0)); // 10 + 220 - 100
        assert!(close(lots[1], 250.0)); // 10 + 100 - 220
    }

    #[test]
    fn test_night_swaps_luminaries() {
        let day = diurnal(&inputs());
        let night = nocturnal(&inputs());
        assert!(close(night[0], day[1]));
        assert!(close(night[1], day[0]));
    }

    #[test]
    fn test_derived_lots_use_their_base() {
        let i = inputs();
        let day = diurnal(&i);
        let (fortune, spirit) = (day[0], day[1]);
        assert!(close(day[2], normalize_degrees(i.ascendant + i.venus - spirit)));
        assert!(close(day[3], normalize_degrees(i.ascendant + fortune - i.mercury)));
        assert!(close(day[4], normalize_degrees(i.ascendant + fortune - i.mars)));
        assert!(close(day[5], normalize_degrees(i.ascendant + i.jupiter - spirit)));
        assert!(close(day[6], normalize_degrees(i.ascendant + fortune - i.saturn)));

        let night = nocturnal(&i);
        let (fortune, spirit) = (night[0], night[1]);
        assert!(close(night[2], normalize_degrees(i.ascendant + spirit - i.venus)));
        assert!(close(night[3], normalize_degrees(i.ascendant + i.mercury - fortune)));
        assert!(close(night[6], normalize_degrees(i.ascendant + i.saturn - fortune)));
    }

    #[test]
    fn test_longitudes_stay_in_range() {
        for lots in [diurnal(&inputs()), nocturnal(&inputs())] {
            for lon in lots {
                assert!((0.0..360.0).contains(&lon));
            }
        }
    }

    #[test]
    fn test_formula_selected_by_sect() {
        assert_eq!(LotFormula::for_sect(Sect::Night).longitudes(&inputs()), nocturnal(&inputs()));
        assert_eq!(LotKind::from_key("victory"), Some(LotKind::Victory));
    }
}
