//! Report assembly.
//!
//! One chart feeds the profection, lot and dignity engines, which run in
//! parallel over a shared `&NatalChart`; their results are then resolved
//! against the corpus into a report with four sections.

use crate::chart::{BirthInput, HouseInfo, NatalChart, PlanetPosition};
use crate::ephemeris::EphemerisAdapter;
use crate::error::ReportError;
use crate::interpretation::{Corpus, Fragment, InterpretationKey, Point, Topic};
use crate::western::{
    age_at, analyze_sect, compute_lots, health_correspondences, profect, profection_timeline,
    score_dignities, DignityRanking, DignityScore, DignityTable, DignityWeights,
    EssentialDignity, HealthCorrespondence, HealthLookup, Lot, ProfectionResult, SectAnalysis,
};
use crate::zodiac::Sect;
use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Years listed in the profection timeline
pub const TIMELINE_YEARS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyReading {
    pub position: PlanetPosition,
    pub dignities: Vec<EssentialDignity>,
    pub interpretation: Fragment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseReading {
    pub house: HouseInfo,
    pub theme: Fragment,
    /// Ruler of this house read in the house it occupies
    pub ruler_interpretation: Fragment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatalSection {
    pub chart: NatalChart,
    pub bodies: Vec<BodyReading>,
    pub ascendant: Fragment,
    pub midheaven: Fragment,
    pub houses: Vec<HouseReading>,
}

/// One year of the profection timeline with its own reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineYear {
    pub profection: ProfectionResult,
    pub interpretation: Fragment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfectionSection {
    pub current: ProfectionResult,
    pub interpretation: Fragment,
    pub theme: Fragment,
    pub timeline: Vec<TimelineYear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotReading {
    pub lot: Lot,
    pub interpretation: Fragment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotsSection {
    pub sect: Sect,
    pub lots: Vec<LotReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DignitiesHealthSection {
    pub ranking: DignityRanking,
    pub most_positive: Option<DignityScore>,
    pub most_negative: Option<DignityScore>,
    pub sect_analysis: SectAnalysis,
    pub health: Vec<HealthCorrespondence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub name: String,
    pub instant: DateTime<Utc>,
    pub as_of: NaiveDate,
    pub natal: NatalSection,
    pub profections: ProfectionSection,
    pub lots: LotsSection,
    pub dignities_health: DignitiesHealthSection,
}

impl Report {
    /// Keys of every fragment the corpus could not supply.
    pub fn missing(&self) -> Vec<String> {
        let mut fragments: Vec<&Fragment> = Vec::new();
        fragments.extend(self.natal.bodies.iter().map(|b| &b.interpretation));
        fragments.push(&self.natal.ascendant);
        fragments.push(&self.natal.midheaven);
        for house in &self.natal.houses {
            fragments.push(&house.theme);
            fragments.push(&house.ruler_interpretation);
        }
        fragments.push(&self.profections.interpretation);
        fragments.push(&self.profections.theme);
        fragments.extend(self.profections.timeline.iter().map(|y| &y.interpretation));
        fragments.extend(self.lots.lots.iter().map(|l| &l.interpretation));

        let mut keys: Vec<String> = fragments
            .into_iter()
            .filter_map(|f| match f {
                Fragment::Unavailable { key } => Some(key.clone()),
                Fragment::Text(_) => None,
            })
            .collect();
        keys.extend(
            self.dignities_health
                .health
                .iter()
                .filter_map(|h| match &h.lookup {
                    HealthLookup::Unavailable { key } => Some(key.clone()),
                    HealthLookup::Entry(_) => None,
                }),
        );
        keys
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Builds reports from birth input against a shared corpus and rule tables.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    adapter: EphemerisAdapter,
    corpus: Arc<Corpus>,
    table: DignityTable,
    weights: DignityWeights,
}

impl ReportEngine {
    pub fn new(
        adapter: EphemerisAdapter,
        corpus: Arc<Corpus>,
        table: DignityTable,
        weights: DignityWeights,
    ) -> Self {
        Self {
            adapter,
            corpus,
            table,
            weights,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn adapter(&self) -> &EphemerisAdapter {
        &self.adapter
    }

    /// Natal chart only.
    pub fn chart(&self, input: &BirthInput) -> Result<NatalChart, ReportError> {
        let instant = input.instant()?;
        let location = input.geo()?;
        Ok(self.adapter.compute_positions(instant, location)?)
    }

    /// Full report, with the profected year taken at `as_of`.
    pub fn generate(&self, input: &BirthInput, as_of: NaiveDate) -> Result<Report, ReportError> {
        let started = Instant::now();
        let instant = input.instant()?;
        let chart = self.adapter.compute_positions(instant, input.geo()?)?;
        let age = age_at(input.date, as_of)?;

        let (profection, (lots, dignities)) = rayon::join(
            || profect(&chart, i64::from(age)),
            || {
                rayon::join(
                    || compute_lots(&chart),
                    || {
                        (
                            score_dignities(&chart, &self.table, &self.weights),
                            analyze_sect(&chart, &self.table),
                        )
                    },
                )
            },
        );
        let profection = profection?;
        let lots = lots?;
        let (ranking, sect_analysis) = dignities;
        let sect_analysis = sect_analysis?;
        let health = health_correspondences(&chart, &self.corpus)?;

        let report = Report {
            name: input.name.clone(),
            instant,
            as_of,
            natal: self.natal_section(&chart),
            profections: self.profection_section(&chart, profection),
            lots: self.lots_section(&chart, lots),
            dignities_health: DignitiesHealthSection {
                most_positive: ranking.most_positive().cloned(),
                most_negative: ranking.most_negative().cloned(),
                ranking,
                sect_analysis,
                health,
            },
        };

        log::debug!(
            "Report for {:?} at {} assembled in {:?} ({} gaps)",
            input.name,
            instant,
            started.elapsed(),
            report.missing().len()
        );
        Ok(report)
    }

    /// Reports for many inputs in parallel, in input order.
    pub fn generate_batch(
        &self,
        inputs: &[BirthInput],
        as_of: NaiveDate,
    ) -> Vec<Result<Report, ReportError>> {
        log::info!("Generating {} reports", inputs.len());
        inputs
            .par_iter()
            .map(|input| self.generate(input, as_of))
            .collect()
    }

    fn natal_section(&self, chart: &NatalChart) -> NatalSection {
        let sect = chart.sect();
        let bodies = chart
            .bodies()
            .iter()
            .map(|p| BodyReading {
                position: p.clone(),
                dignities: self.table.sign_dignities(p.body, p.sign),
                interpretation: self
                    .corpus
                    .fragment(&InterpretationKey::planet(p.body, p.sign, p.house, sect)),
            })
            .collect();

        let houses = chart
            .houses()
            .into_iter()
            .map(|house| {
                let theme = self
                    .corpus
                    .fragment(&InterpretationKey::house_theme(house.number, house.sign, sect));
                let ruler_key = InterpretationKey {
                    sign: house.sign,
                    sect,
                    house: house.ruler_house,
                    topic: Topic::Ruler {
                        source_house: house.number,
                    },
                };
                HouseReading {
                    theme,
                    ruler_interpretation: self.corpus.fragment(&ruler_key),
                    house,
                }
            })
            .collect();

        NatalSection {
            chart: chart.clone(),
            bodies,
            ascendant: self.corpus.fragment(&InterpretationKey::point(
                Point::Ascendant,
                chart.ascendant_sign(),
                sect,
            )),
            midheaven: self.corpus.fragment(&InterpretationKey::point(
                Point::Midheaven,
                chart.midheaven_sign(),
                sect,
            )),
            houses,
        }
    }

    fn profection_section(&self, chart: &NatalChart, current: ProfectionResult) -> ProfectionSection {
        let sect = chart.sect();
        let reading = |p: &ProfectionResult| {
            self.corpus
                .fragment(&InterpretationKey::profection(p.house, p.sign, sect))
        };
        ProfectionSection {
            interpretation: reading(&current),
            theme: self.corpus.fragment(&InterpretationKey::house_theme(
                current.house,
                current.sign,
                sect,
            )),
            timeline: profection_timeline(chart, current.age, TIMELINE_YEARS)
                .into_iter()
                .map(|profection| TimelineYear {
                    interpretation: reading(&profection),
                    profection,
                })
                .collect(),
            current,
        }
    }

    fn lots_section(&self, chart: &NatalChart, lots: Vec<Lot>) -> LotsSection {
        let sect = chart.sect();
        LotsSection {
            sect,
            lots: lots
                .into_iter()
                .map(|lot| LotReading {
                    interpretation: self
                        .corpus
                        .fragment(&InterpretationKey::lot(lot.kind, lot.sign, lot.house, sect)),
                    lot,
                })
                .collect(),
        }
    }
}
