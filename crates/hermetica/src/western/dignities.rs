//! Essential dignities and the dignity ranking.
//!
//! Rule tables live in a [`DignityTable`] value that callers build once and
//! pass in; point values come from [`DignityWeights`].

use crate::chart::{NatalChart, PlanetPosition};
use crate::zodiac::{Body, Element, Sect, Sign};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EssentialDignity {
    Domicile,
    Exaltation,
    Triplicity,
    Detriment,
    Fall,
}

/// Sign assignments for one body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetDignities {
    pub domiciles: Vec<Sign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exaltation: Option<Sign>,
    pub detriments: Vec<Sign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fall: Option<Sign>,
}

impl PlanetDignities {
    fn new(domiciles: &[Sign], exaltation: Option<Sign>, detriments: &[Sign], fall: Option<Sign>) -> Self {
        Self {
            domiciles: domiciles.to_vec(),
            exaltation,
            detriments: detriments.to_vec(),
            fall,
        }
    }
}

/// Triplicity rulers of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriplicityRulers {
    pub day: Body,
    pub night: Body,
    pub participating: Body,
}

impl TriplicityRulers {
    pub fn sect_ruler(&self, sect: Sect) -> Body {
        match sect {
            Sect::Day => self.day,
            Sect::Night => self.night,
        }
    }
}

/// Classical rule tables, plus the common modern assignments for the outer
/// planets and nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DignityTable {
    planets: BTreeMap<Body, PlanetDignities>,
    triplicities: BTreeMap<Element, TriplicityRulers>,
}

impl Default for DignityTable {
    fn default() -> Self {
        Self::classical()
    }
}

impl DignityTable {
    /// Ptolemaic domiciles and exaltations with Dorothean triplicities.
    pub fn classical() -> Self {
        use Sign::*;

        let mut planets = BTreeMap::new();
        planets.insert(Body::Sun, PlanetDignities::new(&[Leo], Some(Aries), &[Aquarius], Some(Libra)));
        planets.insert(Body::Moon, PlanetDignities::new(&[Cancer], Some(Taurus), &[Capricorn], Some(Scorpio)));
        planets.insert(
            Body::Mercury,
            PlanetDignities::new(&[Gemini, Virgo], Some(Virgo), &[Sagittarius, Pisces], Some(Pisces)),
        );
        planets.insert(
            Body::Venus,
            PlanetDignities::new(&[Taurus, Libra], Some(Pisces), &[Aries, Scorpio], Some(Virgo)),
        );
        planets.insert(
            Body::Mars,
            PlanetDignities::new(&[Aries, Scorpio], Some(Capricorn), &[Taurus, Libra], Some(Cancer)),
        );
        planets.insert(
            Body::Jupiter,
            PlanetDignities::new(&[Sagittarius, Pisces], Some(Cancer), &[Gemini, Virgo], Some(Capricorn)),
        );
        planets.insert(
            Body::Saturn,
            PlanetDignities::new(&[Capricorn, Aquarius], Some(Libra), &[Cancer, Leo], Some(Aries)),
        );

        // Modern assignments; used for natal tags only, never ranked.
        planets.insert(Body::Uranus, PlanetDignities::new(&[Aquarius], Some(Scorpio), &[Leo], Some(Taurus)));
        planets.insert(Body::Neptune, PlanetDignities::new(&[Pisces], None, &[Virgo], None));
        planets.insert(Body::Pluto, PlanetDignities::new(&[Scorpio], None, &[Taurus], None));
        planets.insert(Body::NorthNode, PlanetDignities::new(&[], Some(Gemini), &[], Some(Sagittarius)));
        planets.insert(Body::SouthNode, PlanetDignities::new(&[], Some(Sagittarius), &[], Some(Gemini)));

        let mut triplicities = BTreeMap::new();
        triplicities.insert(
            Element::Fire,
            TriplicityRulers { day: Body::Sun, night: Body::Jupiter, participating: Body::Saturn },
        );
        triplicities.insert(
            Element::Earth,
            TriplicityRulers { day: Body::Venus, night: Body::Moon, participating: Body::Mars },
        );
        triplicities.insert(
            Element::Air,
            TriplicityRulers { day: Body::Saturn, night: Body::Mercury, participating: Body::Jupiter },
        );
        triplicities.insert(
            Element::Water,
            TriplicityRulers { day: Body::Venus, night: Body::Mars, participating: Body::Moon },
        );

        Self { planets, triplicities }
    }

    /// Replace the assignments for one body.
    pub fn with_planet(mut self, body: Body, dignities: PlanetDignities) -> Self {
        self.planets.insert(body, dignities);
        self
    }

    pub fn planet(&self, body: Body) -> Option<&PlanetDignities> {
        self.planets.get(&body)
    }

    pub fn triplicity(&self, element: Element) -> Option<&TriplicityRulers> {
        self.triplicities.get(&element)
    }

    /// Domicile, exaltation, detriment and fall tags for a body in a sign.
    pub fn sign_dignities(&self, body: Body, sign: Sign) -> Vec<EssentialDignity> {
        let mut tags = Vec::new();
        let Some(d) = self.planets.get(&body) else {
            return tags;
        };
        if d.domiciles.contains(&sign) {
            tags.push(EssentialDignity::Domicile);
        }
        if d.exaltation == Some(sign) {
            tags.push(EssentialDignity::Exaltation);
        }
        if d.detriments.contains(&sign) {
            tags.push(EssentialDignity::Detriment);
        }
        if d.fall == Some(sign) {
            tags.push(EssentialDignity::Fall);
        }
        tags
    }

    /// True when `body` is the sect ruler or participating ruler of the sign's triplicity.
    pub fn has_triplicity(&self, body: Body, sign: Sign, sect: Sect) -> bool {
        self.triplicities
            .get(&sign.element())
            .map(|t| t.sect_ruler(sect) == body || t.participating == body)
            .unwrap_or(false)
    }

    pub fn is_domicile(&self, body: Body, sign: Sign) -> bool {
        self.planets
            .get(&body)
            .map(|d| d.domiciles.contains(&sign))
            .unwrap_or(false)
    }

    pub fn is_exalted(&self, body: Body, sign: Sign) -> bool {
        self.planets
            .get(&body)
            .map(|d| d.exaltation == Some(sign))
            .unwrap_or(false)
    }
}

/// Point values for the dignity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DignityWeights {
    pub domicile: i32,
    pub exaltation: i32,
    pub triplicity: i32,
    pub detriment: i32,
    pub fall: i32,
    /// Bonus for houses 1, 4, 7 and 10
    pub angular: i32,
}

impl Default for DignityWeights {
    fn default() -> Self {
        Self {
            domicile: 5,
            exaltation: 4,
            triplicity: 3,
            detriment: -4,
            fall: -5,
            angular: 2,
        }
    }
}

impl DignityWeights {
    fn points(&self, dignity: EssentialDignity) -> i32 {
        match dignity {
            EssentialDignity::Domicile => self.domicile,
            EssentialDignity::Exaltation => self.exaltation,
            EssentialDignity::Triplicity => self.triplicity,
            EssentialDignity::Detriment => self.detriment,
            EssentialDignity::Fall => self.fall,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreFactor {
    Essential(EssentialDignity),
    AngularHouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub factor: ScoreFactor,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DignityScore {
    pub planet: Body,
    pub score: i32,
    pub sign: Sign,
    pub house: u8,
    pub factors: Vec<Contribution>,
}

pub fn is_angular(house: u8) -> bool {
    matches!(house, 1 | 4 | 7 | 10)
}

/// Score one placed planet.
pub fn score_planet(
    position: &PlanetPosition,
    sect: Sect,
    table: &DignityTable,
    weights: &DignityWeights,
) -> DignityScore {
    let mut factors: Vec<Contribution> = table
        .sign_dignities(position.body, position.sign)
        .into_iter()
        .map(|d| Contribution {
            factor: ScoreFactor::Essential(d),
            points: weights.points(d),
        })
        .collect();

    if table.has_triplicity(position.body, position.sign, sect) {
        factors.push(Contribution {
            factor: ScoreFactor::Essential(EssentialDignity::Triplicity),
            points: weights.triplicity,
        });
    }
    if is_angular(position.house) {
        factors.push(Contribution {
            factor: ScoreFactor::AngularHouse,
            points: weights.angular,
        });
    }

    DignityScore {
        planet: position.body,
        score: factors.iter().map(|c| c.points).sum(),
        sign: position.sign,
        house: position.house,
        factors,
    }
}

/// Hierarchy position; bodies outside the hierarchy sort last.
fn rank(body: Body) -> u8 {
    body.hierarchy_rank().unwrap_or(u8::MAX)
}

/// Descending score, ties to the planet higher in the hierarchy.
fn ranking_order(a: &DignityScore, b: &DignityScore) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| rank(a.planet).cmp(&rank(b.planet)))
}

/// Scores of the classical planets, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DignityRanking {
    pub scores: Vec<DignityScore>,
}

impl DignityRanking {
    pub fn new(mut scores: Vec<DignityScore>) -> Self {
        scores.sort_by(ranking_order);
        Self { scores }
    }

    pub fn most_positive(&self) -> Option<&DignityScore> {
        self.scores.first()
    }

    /// Lowest score. Ties go to the planet higher in the hierarchy, the same
    /// tie-break as [`Self::most_positive`].
    pub fn most_negative(&self) -> Option<&DignityScore> {
        self.scores.iter().min_by(|a, b| {
            a.score
                .cmp(&b.score)
                .then_with(|| rank(a.planet).cmp(&rank(b.planet)))
        })
    }

    pub fn get(&self, planet: Body) -> Option<&DignityScore> {
        self.scores.iter().find(|s| s.planet == planet)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Score and rank the seven classical planets present in the chart.
pub fn score_dignities(chart: &NatalChart, table: &DignityTable, weights: &DignityWeights) -> DignityRanking {
    let sect = chart.sect();
    let scores = Body::CLASSICAL
        .iter()
        .filter_map(|&body| chart.body(body))
        .map(|position| score_planet(position, sect, table, weights))
        .collect();
    DignityRanking::new(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(body: Body, sign: Sign, house: u8) -> PlanetPosition {
        let longitude = f64::from(sign.index()) * 30.0 + 10.0;
        PlanetPosition {
            body,
            longitude,
            latitude: 0.0,
            speed: 1.0,
            retrograde: false,
            sign,
            house,
            degree_in_sign: 10.0,
        }
    }

    #[test]
    fn test_sun_falls_in_libra() {
        let table = DignityTable::default();
        assert_eq!(table.sign_dignities(Body::Sun, Sign::Libra), vec![EssentialDignity::Fall]);
        assert!(table.sign_dignities(Body::Sun, Sign::Virgo).is_empty());
    }

    #[test]
    fn test_mercury_in_virgo_is_domicile_and_exalted() {
        let table = DignityTable::default();
        assert_eq!(
            table.sign_dignities(Body::Mercury, Sign::Virgo),
            vec![EssentialDignity::Domicile, EssentialDignity::Exaltation]
        );
    }

    #[test]
    fn test_triplicity_depends_on_sect() {
        let table = DignityTable::default();
        assert!(table.has_triplicity(Body::Sun, Sign::Leo, Sect::Day));
        assert!(!table.has_triplicity(Body::Sun, Sign::Leo, Sect::Night));
        assert!(table.has_triplicity(Body::Jupiter, Sign::Aries, Sect::Night));
        // participating ruler counts in either sect
        assert!(table.has_triplicity(Body::Saturn, Sign::Sagittarius, Sect::Day));
        assert!(table.has_triplicity(Body::Saturn, Sign::Sagittarius, Sect::Night));
    }

    #[test]
    fn test_score_sums_contributions() {
        let table = DignityTable::default();
        let weights = DignityWeights::default();
        // Sun in Leo, day, angular: domicile + triplicity + angular
        let score = score_planet(&placed(Body::Sun, Sign::Leo, 10), Sect::Day, &table, &weights);
        assert_eq!(score.score, 5 + 3 + 2);
        assert_eq!(score.factors.len(), 3);

        // Saturn in Aries, night, cadent: fall; participating triplicity ruler of fire
        let score = score_planet(&placed(Body::Saturn, Sign::Aries, 3), Sect::Night, &table, &weights);
        assert_eq!(score.score, -5 + 3);
    }

    #[test]
    fn test_ties_follow_hierarchy() {
        let mk = |planet, score| DignityScore {
            planet,
            score,
            sign: Sign::Aries,
            house: 2,
            factors: Vec::new(),
        };
        let ranking = DignityRanking::new(vec![
            mk(Body::Moon, 0),
            mk(Body::Mars, 4),
            mk(Body::Venus, 4),
            mk(Body::Mercury, -5),
            mk(Body::Saturn, -5),
        ]);
        let order: Vec<Body> = ranking.scores.iter().map(|s| s.planet).collect();
        assert_eq!(order, vec![Body::Mars, Body::Venus, Body::Moon, Body::Saturn, Body::Mercury]);
        assert_eq!(ranking.most_positive().unwrap().planet, Body::Mars);
        // not the reverse of the positive tie-break
        assert_eq!(ranking.most_negative().unwrap().planet, Body::Saturn);
    }

    #[test]
    fn test_custom_weights() {
        let table = DignityTable::default();
        let weights = DignityWeights { angular: 0, ..DignityWeights::default() };
        let score = score_planet(&placed(Body::Moon, Sign::Capricorn, 1), Sect::Night, &table, &weights);
        // detriment; Moon rules earth by night
        assert_eq!(score.score, -4 + 3);
    }
}
