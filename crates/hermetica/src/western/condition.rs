//! Hellenistic planetary condition and the sect benefic/malefic analysis.

use crate::chart::{NatalChart, PlanetPosition};
use crate::error::EphemerisError;
use crate::western::dignities::DignityTable;
use crate::western::rulers::traditional_ruler;
use crate::zodiac::{angular_distance, Body, Sect};
use serde::{Deserialize, Serialize};

pub const BASE_SCORE: i32 = 50;

/// Orb for whole-sign aspects to count as testimony
const ASPECT_ORB: f64 = 3.0;
/// 17 arc minutes
const CAZIMI_ORB: f64 = 17.0 / 60.0;
const COMBUST_ORB: f64 = 8.0;
const BEAMS_ORB: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionDetail {
    pub description: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPlanet {
    pub planet: Body,
    pub base_score: i32,
    pub total_score: i32,
    pub summary: String,
    pub details: Vec<ConditionDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectAnalysis {
    pub sect: Sect,
    /// Benefic of the sect (Jupiter by day, Venus by night)
    pub most_positive: ScoredPlanet,
    /// Malefic contrary to the sect (Mars by day, Saturn by night)
    pub most_negative: ScoredPlanet,
    pub other_benefic: ScoredPlanet,
    pub other_malefic: ScoredPlanet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WholeSignAspect {
    Conjunction,
    Opposition,
    Trine,
    /// The other body sits in the 10th sign from the subject
    OvercomingSquare,
}

fn aspects(subject: &PlanetPosition, other: &PlanetPosition, aspect: WholeSignAspect) -> bool {
    let signs = subject.sign.distance_to(other.sign);
    let by_sign = match aspect {
        WholeSignAspect::Conjunction => signs == 0,
        WholeSignAspect::Opposition => signs == 6,
        WholeSignAspect::Trine => signs == 4 || signs == 8,
        WholeSignAspect::OvercomingSquare => signs == 9,
    };
    by_sign && angular_distance(subject.longitude, other.longitude) <= ASPECT_ORB
}

fn joy(body: Body) -> Option<u8> {
    match body {
        Body::Mercury => Some(1),
        Body::Moon => Some(3),
        Body::Venus => Some(5),
        Body::Mars => Some(6),
        Body::Sun => Some(9),
        Body::Jupiter => Some(11),
        Body::Saturn => Some(12),
        _ => None,
    }
}

struct Tally {
    score: i32,
    details: Vec<ConditionDetail>,
}

impl Tally {
    fn add(&mut self, description: impl Into<String>, points: i32) {
        self.score += points;
        self.details.push(ConditionDetail {
            description: description.into(),
            score: points,
        });
    }
}

/// Condition of one body on the 50-point base.
pub fn condition_score(
    chart: &NatalChart,
    body: Body,
    table: &DignityTable,
) -> Result<ScoredPlanet, EphemerisError> {
    let planet = chart.body(body).ok_or_else(|| EphemerisError::MissingBody {
        body: body.key().to_string(),
    })?;
    let mut tally = Tally {
        score: BASE_SCORE,
        details: Vec::new(),
    };

    // Essential
    let domicile = traditional_ruler(planet.sign) == body;
    let mut reception = false;
    if domicile {
        tally.add("Domicile", 15);
    } else if let Some(ruler) = chart.body(traditional_ruler(planet.sign)) {
        if traditional_ruler(ruler.sign) == body {
            reception = true;
            tally.add("Mutual reception", 5);
        }
    }
    let exalted = table.is_exalted(body, planet.sign);
    if exalted {
        tally.add("Exaltation", 10);
    }
    if let Some(d) = table.planet(body) {
        if d.fall == Some(planet.sign) {
            tally.add("Fall", -15);
        }
        if d.detriments.contains(&planet.sign) {
            tally.add("Detriment", -10);
        }
    }
    if !(domicile || exalted || reception) {
        tally.add("Peregrine", -5);
    }

    // Accidental
    match planet.house {
        1 | 4 | 7 | 10 => tally.add("Angular house", 10),
        9 => tally.add("9th house (joy of the Sun)", 5),
        3 | 6 | 12 => tally.add("Cadent house", -5),
        _ => {}
    }
    if joy(body) == Some(planet.house) {
        tally.add("Planetary joy", 10);
    }

    if body != Body::Sun {
        if let Some(sun) = chart.body(Body::Sun) {
            let distance = angular_distance(planet.longitude, sun.longitude);
            if distance < CAZIMI_ORB {
                tally.add("Cazimi", 15);
            } else if distance < COMBUST_ORB {
                tally.add("Combust", -15);
            } else if distance < BEAMS_ORB {
                tally.add("Under the beams", -5);
            }
        }
    }

    if matches!(
        body,
        Body::Mercury | Body::Venus | Body::Mars | Body::Jupiter | Body::Saturn
    ) && planet.retrograde
    {
        tally.add("Retrograde", -10);
    }

    // Testimony
    for malefic in [Body::Mars, Body::Saturn] {
        if malefic == body {
            continue;
        }
        let Some(other) = chart.body(malefic) else {
            continue;
        };
        if aspects(planet, other, WholeSignAspect::OvercomingSquare) {
            tally.add(format!("Overcome by {}", malefic), -15);
        } else if aspects(planet, other, WholeSignAspect::Opposition) {
            tally.add(format!("Opposed by {}", malefic), -10);
        } else if aspects(planet, other, WholeSignAspect::Conjunction) {
            tally.add(format!("Conjunct {}", malefic), -10);
        }
    }

    if body != Body::Mars && body != Body::Saturn {
        if let (Some(mars), Some(saturn)) = (chart.body(Body::Mars), chart.body(Body::Saturn)) {
            let before = planet.sign.offset(-1);
            let after = planet.sign.offset(1);
            if (mars.sign == before && saturn.sign == after)
                || (saturn.sign == before && mars.sign == after)
            {
                tally.add("Enclosed by the malefics", -20);
            }
        }
    }

    for benefic in [Body::Venus, Body::Jupiter] {
        if benefic == body {
            continue;
        }
        let Some(other) = chart.body(benefic) else {
            continue;
        };
        if aspects(planet, other, WholeSignAspect::Conjunction) {
            tally.add(format!("Conjunct {}", benefic), 10);
        } else if aspects(planet, other, WholeSignAspect::Trine) {
            tally.add(format!("Trine from {}", benefic), 5);
        } else if aspects(planet, other, WholeSignAspect::OvercomingSquare) {
            tally.add(format!("Overcome by {}", benefic), 8);
        }
    }

    Ok(ScoredPlanet {
        planet: body,
        base_score: BASE_SCORE,
        total_score: tally.score,
        summary: String::new(),
        details: tally.details,
    })
}

fn benefic_summary(score: i32) -> &'static str {
    if score < 40 {
        "Impeded"
    } else if score > 60 {
        "Highly dignified"
    } else {
        "Favourable"
    }
}

fn malefic_summary(score: i32) -> &'static str {
    if score > 60 {
        "Constructive"
    } else if score < 40 {
        "Difficult"
    } else {
        "Moderate"
    }
}

/// Benefic of the sect and malefic contrary to it, each scored.
pub fn analyze_sect(chart: &NatalChart, table: &DignityTable) -> Result<SectAnalysis, EphemerisError> {
    let sect = chart.sect();
    let (benefic, malefic, other_benefic, other_malefic) = match sect {
        Sect::Day => (Body::Jupiter, Body::Mars, Body::Venus, Body::Saturn),
        Sect::Night => (Body::Venus, Body::Saturn, Body::Jupiter, Body::Mars),
    };

    let scored = |body: Body, summary: fn(i32) -> &'static str| {
        condition_score(chart, body, table).map(|mut s| {
            s.summary = summary(s.total_score).to_string();
            s
        })
    };

    Ok(SectAnalysis {
        sect,
        most_positive: scored(benefic, benefic_summary)?,
        most_negative: scored(malefic, malefic_summary)?,
        other_benefic: scored(other_benefic, benefic_summary)?,
        other_malefic: scored(other_malefic, malefic_summary)?,
    })
}
