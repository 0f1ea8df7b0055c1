//! Annual profections.
//!
//! The activated house advances one house per year of life and wraps every
//! twelve years. Its sign is the sign on that house's cusp and the time-lord
//! is the traditional ruler of that sign.

use crate::chart::NatalChart;
use crate::error::InputError;
use crate::western::rulers::traditional_ruler;
use crate::zodiac::{Body, Sign};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfectionResult {
    pub age: u32,
    /// Activated house, 1..=12
    pub house: u8,
    pub sign: Sign,
    /// Ruler of the profected sign (Lord of the Year)
    pub time_lord: Body,
    /// Natal house of the time-lord, if it is in the chart
    pub time_lord_house: Option<u8>,
}

/// House activated at a whole age. Age 0 is the 1st house.
pub fn profected_house(age: u32) -> u8 {
    (age % 12) as u8 + 1
}

pub fn profect(chart: &NatalChart, age: i64) -> Result<ProfectionResult, InputError> {
    let age = u32::try_from(age).map_err(|_| InputError::InvalidAge { age: age.to_string() })?;

    let house = profected_house(age);
    let sign = Sign::from_longitude(chart.cusps()[usize::from(house - 1)]);
    let time_lord = traditional_ruler(sign);

    Ok(ProfectionResult {
        age,
        house,
        sign,
        time_lord,
        time_lord_house: chart.body(time_lord).map(|p| p.house),
    })
}

/// Like [`profect`], for ages arriving as floats. Fractional, negative and
/// non-finite values are rejected.
pub fn profect_years(chart: &NatalChart, age: f64) -> Result<ProfectionResult, InputError> {
    if !age.is_finite() || age.fract() != 0.0 || age < 0.0 || age > f64::from(u32::MAX) {
        return Err(InputError::InvalidAge { age: age.to_string() });
    }
    profect(chart, age as i64)
}

/// Completed years between `birth` and `on`.
pub fn age_at(birth: NaiveDate, on: NaiveDate) -> Result<u32, InputError> {
    if on < birth {
        return Err(InputError::InvalidAge {
            age: format!("{} precedes birth date {}", on, birth),
        });
    }
    let mut years = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).map_err(|_| InputError::InvalidAge { age: years.to_string() })
}

/// `count` consecutive profection years starting at `from_age`.
pub fn profection_timeline(
    chart: &NatalChart,
    from_age: u32,
    count: usize,
) -> Vec<ProfectionResult> {
    (0..count)
        .filter_map(|offset| u32::try_from(offset).ok().and_then(|o| from_age.checked_add(o)))
        .filter_map(|age| profect(chart, i64::from(age)).ok())
        .collect()
}
