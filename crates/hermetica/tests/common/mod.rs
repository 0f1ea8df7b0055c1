#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use hermetica::ephemeris::houses::cusps_from_angles;
use hermetica::ephemeris::BodyPosition;
use hermetica::interpretation::PROFECTION_ENTRY_KEYS;
use hermetica::western::{DignityTable, DignityWeights};
use hermetica::{
    build_chart, BirthInput, BirthLocation, Body, Corpus, EphemerisAdapter, EphemerisSettings,
    HouseSystem, NatalChart, ReportEngine,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn corpus_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/corpus")
}

/// Chart from hand-placed longitudes, all bodies direct.
pub fn chart(system: HouseSystem, ascendant: f64, midheaven: f64, bodies: &[(Body, f64)]) -> NatalChart {
    let houses = cusps_from_angles(system, ascendant, midheaven).unwrap();
    let positions: BTreeMap<Body, BodyPosition> = bodies
        .iter()
        .map(|&(body, lon)| (body, BodyPosition { lon, lat: 0.0, speed_lon: 1.0 }))
        .collect();
    build_chart(&positions, &houses).unwrap()
}

/// Leo rising by whole sign with the Sun in the 1st, so a night chart.
///
/// Mercury 9, Jupiter 8, Sun 7, Moon 0, Saturn -2, Mars -2, Venus -5 with
/// the default weights.
pub fn leo_night_chart() -> NatalChart {
    chart(
        HouseSystem::WholeSign,
        130.0,
        40.0,
        &[
            (Body::Sun, 135.0),
            (Body::Moon, 200.0),
            (Body::Mercury, 160.0),
            (Body::Venus, 170.0),
            (Body::Mars, 100.0),
            (Body::Jupiter, 250.0),
            (Body::Saturn, 10.0),
        ],
    )
}

pub fn engine_with(corpus: Corpus) -> ReportEngine {
    ReportEngine::new(
        EphemerisAdapter::analytic(EphemerisSettings::default()),
        Arc::new(corpus),
        DignityTable::classical(),
        DignityWeights::default(),
    )
}

pub fn engine() -> ReportEngine {
    engine_with(Corpus::load(corpus_dir()).unwrap())
}

pub fn madrid() -> BirthInput {
    BirthInput::parse("Madrid", "1990-05-15", "14:30", 40.4168, -3.7038, 7200).unwrap()
}

pub fn new_york() -> BirthInput {
    BirthInput::parse("New York", "2020-05-22", "02:00", 40.7128, -74.0060, -14400).unwrap()
}

pub fn out_of_bounds() -> BirthInput {
    BirthInput::new(
        "Nowhere",
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        BirthLocation { latitude: 95.0, longitude: 0.0, utc_offset_seconds: 0 },
    )
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Twelve complete profection house files under `dir`, each passed through `edit`.
pub fn write_profection_houses(dir: &Path, edit: impl Fn(u8, &mut Map<String, Value>)) {
    let profections = dir.join("profections");
    std::fs::create_dir_all(&profections).unwrap();
    for house in 1..=12u8 {
        let mut table = Map::new();
        for key in PROFECTION_ENTRY_KEYS.iter() {
            table.insert(key.clone(), Value::String(format!("Casa {} {}", house, key)));
        }
        edit(house, &mut table);
        std::fs::write(
            profections.join(format!("profection_house_{}.json", house)),
            serde_json::to_string_pretty(&Value::Object(table)).unwrap(),
        )
        .unwrap();
    }
}
