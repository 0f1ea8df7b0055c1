//! Composite keys into the interpretation corpus.

use crate::western::lots::LotKind;
use crate::zodiac::{Body, Sect, Sign};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    /// The 24 `<Sign>_<Day|Night>` keys every profection house file must carry.
    pub static ref PROFECTION_ENTRY_KEYS: Vec<String> = Sign::ALL
        .iter()
        .flat_map(|sign| {
            [Sect::Day, Sect::Night]
                .into_iter()
                .map(move |sect| profection_entry_key(*sign, sect))
        })
        .collect();
}

/// `Tauro_Day`, `Escorpio_Night`, ...
pub fn profection_entry_key(sign: Sign, sect: Sect) -> String {
    format!("{}_{}", sign.corpus_name(), sect.corpus_suffix())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Point {
    Ascendant,
    Midheaven,
}

impl Point {
    pub const ALL: [Point; 2] = [Point::Ascendant, Point::Midheaven];

    pub const fn key(self) -> &'static str {
        match self {
            Point::Ascendant => "ascendant",
            Point::Midheaven => "midheaven",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    /// Body in a sign and house
    Planet(Body),
    /// Angle in a sign
    Point(Point),
    /// Ruler of `source_house` placed in the key's house
    Ruler { source_house: u8 },
    /// Lot in a sign and house
    Lot(LotKind),
    /// Profected year: house, sign and sect
    Profection,
    /// Theme of a house
    HouseTheme,
}

/// (sign, sect, house?, topic)
///
/// Topics ignore the axes they are not keyed by: only profections read the
/// sect, and rulers and house themes ignore the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationKey {
    pub sign: Sign,
    pub sect: Sect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<u8>,
    pub topic: Topic,
}

impl InterpretationKey {
    pub fn planet(body: Body, sign: Sign, house: u8, sect: Sect) -> Self {
        Self { sign, sect, house: Some(house), topic: Topic::Planet(body) }
    }

    pub fn point(point: Point, sign: Sign, sect: Sect) -> Self {
        Self { sign, sect, house: None, topic: Topic::Point(point) }
    }

    /// Ruler of `source_house` sitting in `target_house`.
    pub fn ruler(source_house: u8, target_house: u8, sign: Sign, sect: Sect) -> Self {
        Self {
            sign,
            sect,
            house: Some(target_house),
            topic: Topic::Ruler { source_house },
        }
    }

    pub fn lot(lot: LotKind, sign: Sign, house: u8, sect: Sect) -> Self {
        Self { sign, sect, house: Some(house), topic: Topic::Lot(lot) }
    }

    pub fn profection(house: u8, sign: Sign, sect: Sect) -> Self {
        Self { sign, sect, house: Some(house), topic: Topic::Profection }
    }

    pub fn house_theme(house: u8, sign: Sign, sect: Sect) -> Self {
        Self { sign, sect, house: Some(house), topic: Topic::HouseTheme }
    }

    fn house_label(&self) -> String {
        self.house.map(|h| h.to_string()).unwrap_or_else(|| "-".to_string())
    }
}

/// Corpus path of the entry, used in miss markers and logs.
impl fmt::Display for InterpretationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = self.sign.corpus_name();
        match self.topic {
            Topic::Planet(body) => write!(f, "planets/{}/{}/{}", body.key(), sign, self.house_label()),
            Topic::Point(point) => write!(f, "points/{}/{}", point.key(), sign),
            Topic::Ruler { source_house } => {
                write!(f, "rulers/ruler_{}/{}", source_house, self.house_label())
            }
            Topic::Lot(lot) => write!(f, "lots/{}/{}/{}", lot.key(), sign, self.house_label()),
            Topic::Profection => write!(
                f,
                "profections/profection_house_{}/{}",
                self.house_label(),
                profection_entry_key(self.sign, self.sect)
            ),
            Topic::HouseTheme => write!(f, "definitions/house_themes/{}", self.house_label()),
        }
    }
}
