mod common;

use common::{date, engine, engine_with, madrid, new_york, out_of_bounds, write_profection_houses};
use hermetica::report::TIMELINE_YEARS;
use hermetica::western::HealthLookup;
use serde_json::Value;
use hermetica::interpretation::PROFECTION_ENTRY_KEYS;
use hermetica::{Body, Corpus, EphemerisError, Fragment, InputError, ReportError, Sect, Sign};

#[test]
fn test_madrid_report_has_four_sections() {
    let engine = engine();
    let report = engine.generate(&madrid(), date(2024, 6, 1)).unwrap();

    assert_eq!(report.name, "Madrid");
    assert_eq!(report.instant.to_rfc3339(), "1990-05-15T12:30:00+00:00");

    // natal
    assert_eq!(report.natal.bodies.len(), Body::ALL.len());
    assert_eq!(report.natal.houses.len(), 12);
    let sun = report.natal.chart.body(Body::Sun).unwrap();
    assert_eq!(sun.sign, Sign::Taurus);
    assert_eq!(report.natal.chart.sect(), Sect::Day);
    assert!(report.natal.ascendant.is_available());

    // profections: 34 completed years on 2024-06-01
    assert_eq!(report.profections.current.age, 34);
    assert_eq!(report.profections.current.house, 11);
    assert!(report.profections.interpretation.is_available());
    assert_eq!(report.profections.timeline.len(), TIMELINE_YEARS);

    // lots
    assert_eq!(report.lots.sect, Sect::Day);
    assert_eq!(report.lots.lots.len(), 7);

    // dignities and health
    let dh = &report.dignities_health;
    assert_eq!(dh.ranking.len(), 7);
    assert!(dh.most_positive.is_some());
    assert!(dh.most_negative.is_some());
    assert_eq!(dh.sect_analysis.most_positive.planet, Body::Jupiter);
    assert_eq!(dh.health.len(), 4);
    assert!(dh.health.iter().all(|h| matches!(h.lookup, HealthLookup::Entry(_))));
}

#[test]
fn test_new_york_night_report_is_stable() {
    let engine = engine();
    let first = engine.generate(&new_york(), date(2024, 6, 1)).unwrap();
    let second = engine.generate(&new_york(), date(2024, 6, 1)).unwrap();
    assert_eq!(first, second);

    assert_eq!(first.natal.chart.body(Body::Sun).unwrap().sign, Sign::Gemini);
    assert_eq!(first.natal.chart.sect(), Sect::Night);
    assert_eq!(first.profections.current.age, 4);
    assert_eq!(first.profections.current.house, 5);

    let dh = &first.dignities_health;
    let best = dh.most_positive.as_ref().unwrap();
    let worst = dh.most_negative.as_ref().unwrap();
    assert_ne!(best.planet, worst.planet);
    assert!(best.score >= worst.score);
    assert_eq!(dh.sect_analysis.most_positive.planet, Body::Venus);
    assert_eq!(dh.sect_analysis.most_negative.planet, Body::Saturn);
}

#[test]
fn test_report_serializes_to_json() {
    let report = engine().generate(&madrid(), date(2024, 6, 1)).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    for section in ["natal", "profections", "lots", "dignitiesHealth"] {
        assert!(json.get(section).is_some(), "{}", section);
    }
    assert_eq!(json["profections"]["interpretation"]["status"], "text");
}

#[test]
fn test_empty_corpus_gives_explicit_gaps() {
    let engine = engine_with(Corpus::default());
    let report = engine.generate(&madrid(), date(2024, 6, 1)).unwrap();
    assert!(!report.is_complete());
    let missing = report.missing();
    assert!(missing.iter().any(|k| k.starts_with("profections/profection_house_11/")));
    assert!(missing.iter().any(|k| k.starts_with("health/")));
    assert!(matches!(report.profections.interpretation, Fragment::Unavailable { .. }));
    assert_eq!(report.lots.lots.len(), 7);
}

#[test]
fn test_as_of_before_birth_is_invalid_age() {
    let err = engine().generate(&madrid(), date(1980, 1, 1)).unwrap_err();
    assert!(matches!(err, ReportError::Input(InputError::InvalidAge { .. })));
}

#[test]
fn test_out_of_range_instant() {
    let input = hermetica::BirthInput::parse("Old", "1700-01-01", "12:00", 51.5, 0.0, 0).unwrap();
    let err = engine().generate(&input, date(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, ReportError::Ephemeris(EphemerisError::OutOfRange { .. })));
}

#[test]
fn test_batch_keeps_input_order() {
    let engine = engine();
    let inputs = vec![new_york(), out_of_bounds(), madrid()];
    let as_of = date(2024, 6, 1);
    let results = engine.generate_batch(&inputs, as_of);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap(), &engine.generate(&inputs[0], as_of).unwrap());
    assert!(matches!(
        results[1],
        Err(ReportError::Input(InputError::InvalidLocation { .. }))
    ));
    assert_eq!(results[2].as_ref().unwrap().name, "Madrid");

    let again = engine.generate_batch(&inputs, as_of);
    assert_eq!(results, again);
}

#[test]
fn test_every_timeline_year_has_its_reading() {
    let report = engine().generate(&madrid(), date(2024, 6, 1)).unwrap();
    let timeline = &report.profections.timeline;
    assert_eq!(timeline[0].profection, report.profections.current);
    assert_eq!(timeline[0].interpretation, report.profections.interpretation);
    for (offset, year) in timeline.iter().enumerate() {
        assert_eq!(year.profection.age, 34 + offset as u32);
        assert!(year.interpretation.is_available(), "age {}", year.profection.age);
    }
}

#[test]
fn test_blank_timeline_year_is_a_gap() {
    let dir = tempfile::tempdir().unwrap();
    // House 1 keeps its keys but the day texts are blank
    write_profection_houses(dir.path(), |house, table| {
        if house == 1 {
            for key in PROFECTION_ENTRY_KEYS.iter().filter(|k| k.ends_with("_Day")) {
                table.insert(key.clone(), Value::String(String::new()));
            }
        }
    });
    let engine = engine_with(Corpus::load(dir.path()).unwrap());
    let report = engine.generate(&madrid(), date(2024, 6, 1)).unwrap();
    assert_eq!(report.natal.chart.sect(), Sect::Day);

    // ages 34..=45 run from the 11th house round to the 10th
    let first_house = report
        .profections
        .timeline
        .iter()
        .find(|y| y.profection.house == 1)
        .unwrap();
    assert_eq!(first_house.profection.age, 36);
    let expected = format!(
        "profections/profection_house_1/{}_Day",
        first_house.profection.sign.corpus_name()
    );
    assert_eq!(first_house.interpretation, Fragment::Unavailable { key: expected.clone() });
    assert!(report.missing().contains(&expected));

    let others = report.profections.timeline.iter().filter(|y| y.profection.house != 1);
    assert_eq!(others.clone().count(), 11);
    assert!(others.into_iter().all(|y| y.interpretation.is_available()));
}
