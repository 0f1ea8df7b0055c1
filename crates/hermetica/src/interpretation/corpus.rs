//! The loaded interpretation corpus.

use crate::error::{ConfigurationError, LookupMiss};
use crate::interpretation::key::{profection_entry_key, InterpretationKey, Point, Topic, PROFECTION_ENTRY_KEYS};
use crate::interpretation::loader::{
    read_optional, read_profection_house, FlatTable, NestedTable, ProfectionCheck,
};
use crate::western::health::HealthEntry;
use crate::western::lots::LotKind;
use crate::zodiac::{Body, Sign};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub const PROFECTIONS_DIR: &str = "profections";
pub const PLANETS_DIR: &str = "planets";
pub const POINTS_DIR: &str = "points";
pub const RULERS_DIR: &str = "rulers";
pub const LOTS_DIR: &str = "lots";
pub const DEFINITIONS_FILE: &str = "definitions.json";
pub const HEALTH_FILE: &str = "health.json";

/// Resolved text, or an explicit marker for a gap in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum Fragment {
    Text(String),
    Unavailable { key: String },
}

impl Fragment {
    pub fn is_available(&self) -> bool {
        matches!(self, Fragment::Text(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Fragment::Text(text) => Some(text),
            Fragment::Unavailable { .. } => None,
        }
    }
}

impl From<Result<&str, LookupMiss>> for Fragment {
    fn from(result: Result<&str, LookupMiss>) -> Self {
        match result {
            Ok(text) => Fragment::Text(text.to_string()),
            Err(miss) => Fragment::Unavailable { key: miss.key },
        }
    }
}

#[derive(Debug, Deserialize)]
struct Definitions {
    #[serde(default, rename = "HOUSE_THEMES", alias = "house_themes")]
    house_themes: FlatTable,
}

/// Read-only corpus, loaded once and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    root: PathBuf,
    profections: BTreeMap<u8, FlatTable>,
    planets: HashMap<Body, NestedTable>,
    points: HashMap<Point, FlatTable>,
    rulers: BTreeMap<u8, FlatTable>,
    lots: HashMap<LotKind, NestedTable>,
    house_themes: FlatTable,
    health: HashMap<String, HealthEntry>,
}

fn profection_path(dir: &Path, house: u8) -> PathBuf {
    dir.join(PROFECTIONS_DIR)
        .join(format!("profection_house_{}.json", house))
}

impl Corpus {
    /// Load every topic under `dir`.
    ///
    /// The twelve profection files are mandatory and validated; every other
    /// file is optional and its lookups miss when absent.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let dir = dir.as_ref();
        let check = Self::validate_profections(dir)?;
        log::info!("Loaded {} profection house files from {}", check.entries.len(), dir.display());

        let mut planets = HashMap::new();
        for body in Body::ALL {
            let path = dir.join(PLANETS_DIR).join(format!("{}.json", body.key()));
            if let Some(table) = read_optional::<NestedTable>(&path)? {
                planets.insert(body, table);
            }
        }

        let mut points = HashMap::new();
        for point in Point::ALL {
            let path = dir.join(POINTS_DIR).join(format!("{}.json", point.key()));
            if let Some(table) = read_optional::<FlatTable>(&path)? {
                points.insert(point, table);
            }
        }

        let mut rulers = BTreeMap::new();
        for house in 1..=12u8 {
            let path = dir.join(RULERS_DIR).join(format!("ruler_{}.json", house));
            if let Some(table) = read_optional::<FlatTable>(&path)? {
                rulers.insert(house, table);
            }
        }

        let mut lots = HashMap::new();
        for lot in LotKind::ALL {
            let path = dir.join(LOTS_DIR).join(format!("{}.json", lot.key()));
            if let Some(table) = read_optional::<NestedTable>(&path)? {
                lots.insert(lot, table);
            }
        }

        let house_themes = read_optional::<Definitions>(&dir.join(DEFINITIONS_FILE))?
            .map(|d| d.house_themes)
            .unwrap_or_default();
        let health = read_optional::<HashMap<String, HealthEntry>>(&dir.join(HEALTH_FILE))?
            .unwrap_or_default();

        log::info!(
            "Corpus {}: {} planet tables, {} point tables, {} ruler tables, {} lot tables, {} house themes, {} health entries",
            dir.display(),
            planets.len(),
            points.len(),
            rulers.len(),
            lots.len(),
            house_themes.len(),
            health.len()
        );

        Ok(Self {
            root: dir.to_path_buf(),
            profections: check.entries,
            planets,
            points,
            rulers,
            lots,
            house_themes,
            health,
        })
    }

    /// Check the twelve profection house files for the 24 sign/sect keys.
    ///
    /// A missing file or key is an error. Extra keys are logged and kept.
    pub fn validate_profections(dir: impl AsRef<Path>) -> Result<ProfectionCheck, ConfigurationError> {
        let dir = dir.as_ref();
        let mut check = ProfectionCheck::default();
        for house in 1..=12u8 {
            let path = profection_path(dir, house);
            let (table, extra) = read_profection_house(&path, &PROFECTION_ENTRY_KEYS)?;
            if !extra.is_empty() {
                log::warn!("{} has {} unexpected keys: {:?}", path.display(), extra.len(), extra);
                check.extra_keys.insert(house, extra);
            }
            check.entries.insert(house, table);
        }
        Ok(check)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Text for a key, or the miss naming it.
    pub fn lookup(&self, key: &InterpretationKey) -> Result<&str, LookupMiss> {
        let sign = key.sign.corpus_name();
        let house = key.house.map(|h| h.to_string());
        let house = house.as_deref();

        let found = match key.topic {
            Topic::Planet(body) => self
                .planets
                .get(&body)
                .and_then(|t| t.get(sign))
                .and_then(|row| house.and_then(|h| row.get(h))),
            Topic::Point(point) => self.points.get(&point).and_then(|t| t.get(sign)),
            Topic::Ruler { source_house } => self
                .rulers
                .get(&source_house)
                .and_then(|t| house.and_then(|h| t.get(h))),
            Topic::Lot(lot) => self
                .lots
                .get(&lot)
                .and_then(|t| t.get(sign))
                .and_then(|row| house.and_then(|h| row.get(h))),
            Topic::Profection => key
                .house
                .and_then(|h| self.profections.get(&h))
                .and_then(|t| t.get(&profection_entry_key(key.sign, key.sect))),
            Topic::HouseTheme => house.and_then(|h| self.house_themes.get(h)),
        };

        match found {
            Some(text) if !text.trim().is_empty() => Ok(text.as_str()),
            _ => {
                log::debug!("Interpretation miss: {}", key);
                Err(LookupMiss::new(key.to_string()))
            }
        }
    }

    /// [`Self::lookup`] folded into a report fragment.
    pub fn fragment(&self, key: &InterpretationKey) -> Fragment {
        self.lookup(key).into()
    }

    pub fn health(&self, sign: Sign) -> Result<&HealthEntry, LookupMiss> {
        self.health
            .get(sign.corpus_name())
            .ok_or_else(|| LookupMiss::new(format!("health/{}", sign.corpus_name())))
    }
}
