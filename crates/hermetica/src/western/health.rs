//! Medical astrology correspondences for the Reiki/health section.

use crate::chart::NatalChart;
use crate::error::EphemerisError;
use crate::interpretation::Corpus;
use crate::zodiac::{Body, Sign};
use serde::{Deserialize, Serialize};

/// Corpus entry for one sign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEntry {
    pub body_part: String,
    pub chakra: String,
    #[serde(default)]
    pub crystals: Vec<String>,
    pub affirmation: String,
    pub health_risk: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthPlacement {
    Ascendant,
    Sun,
    Moon,
    /// Sign on the 6th house cusp
    SixthHouse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum HealthLookup {
    Entry(HealthEntry),
    Unavailable { key: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCorrespondence {
    pub placement: HealthPlacement,
    pub sign: Sign,
    pub lookup: HealthLookup,
}

/// Correspondences for the ascendant, Sun, Moon and 6th house signs.
pub fn health_correspondences(
    chart: &NatalChart,
    corpus: &Corpus,
) -> Result<Vec<HealthCorrespondence>, EphemerisError> {
    let sign_of = |body: Body| {
        chart
            .body(body)
            .map(|p| p.sign)
            .ok_or_else(|| EphemerisError::MissingBody {
                body: body.key().to_string(),
            })
    };

    let placements = [
        (HealthPlacement::Ascendant, chart.ascendant_sign()),
        (HealthPlacement::Sun, sign_of(Body::Sun)?),
        (HealthPlacement::Moon, sign_of(Body::Moon)?),
        (HealthPlacement::SixthHouse, Sign::from_longitude(chart.cusps()[5])),
    ];

    Ok(placements
        .into_iter()
        .map(|(placement, sign)| HealthCorrespondence {
            placement,
            sign,
            lookup: match corpus.health(sign) {
                Ok(entry) => HealthLookup::Entry(entry.clone()),
                Err(miss) => HealthLookup::Unavailable { key: miss.key },
            },
        })
        .collect())
}
