mod common;

use common::{chart, leo_night_chart};
use hermetica::western::{compute_lots, LotFormula, LotInputs, LotKind};
use hermetica::{Body, HouseSystem, Sect};

fn day_chart() -> hermetica::NatalChart {
    // Aries rising, Sun in the 10th
    chart(
        HouseSystem::WholeSign,
        5.0,
        275.0,
        &[
            (Body::Sun, 280.0),
            (Body::Moon, 50.0),
            (Body::Mercury, 265.0),
            (Body::Venus, 310.0),
            (Body::Mars, 140.0),
            (Body::Jupiter, 95.0),
            (Body::Saturn, 200.0),
        ],
    )
}

#[test]
fn test_all_seven_lots_in_range() {
    for c in [day_chart(), leo_night_chart()] {
        let lots = compute_lots(&c).unwrap();
        assert_eq!(lots.len(), 7);
        for (lot, kind) in lots.iter().zip(LotKind::ALL) {
            assert_eq!(lot.kind, kind);
            assert!((0.0..360.0).contains(&lot.longitude), "{:?} at {}", kind, lot.longitude);
            assert_eq!(lot.house, c.house_of_longitude(lot.longitude));
            assert!((lot.degree_in_sign - lot.longitude % 30.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_fortune_by_day() {
    let c = day_chart();
    assert_eq!(c.sect(), Sect::Day);
    let lots = compute_lots(&c).unwrap();
    // Asc + Moon - Sun = 5 + 50 - 280
    assert!((lots[0].longitude - 135.0).abs() < 1e-9);
    // Asc + Sun - Moon = 5 + 280 - 50
    assert!((lots[1].longitude - 235.0).abs() < 1e-9);
}

#[test]
fn test_night_reverses_fortune_and_spirit() {
    let c = leo_night_chart();
    let inputs = LotInputs::from_chart(&c).unwrap();
    let day = LotFormula::for_sect(Sect::Day).longitudes(&inputs);
    let night = LotFormula::for_sect(Sect::Night).longitudes(&inputs);
    assert!((day[0] - night[1]).abs() < 1e-9);
    assert!((day[1] - night[0]).abs() < 1e-9);

    let lots = compute_lots(&c).unwrap();
    assert!((lots[0].longitude - night[0]).abs() < 1e-9);
}

#[test]
fn test_lots_are_pure() {
    let c = day_chart();
    assert_eq!(compute_lots(&c).unwrap(), compute_lots(&c).unwrap());
}

#[test]
fn test_missing_planet_is_an_error() {
    let c = chart(HouseSystem::WholeSign, 5.0, 275.0, &[(Body::Sun, 280.0), (Body::Moon, 50.0)]);
    assert!(matches!(
        compute_lots(&c),
        Err(hermetica::EphemerisError::MissingBody { .. })
    ));
}
