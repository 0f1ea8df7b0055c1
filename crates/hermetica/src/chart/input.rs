//! Birth data as entered, and its resolution to a UTC instant.

use crate::ephemeris::types::GeoLocation;
use crate::error::InputError;
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

/// Largest UTC offset in use anywhere (Line Islands, +14:00).
const MAX_OFFSET_SECONDS: i32 = 14 * 3600;

/// Resolved birth place. Geocoding and time zone lookup happen upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Offset of local clock time from UTC, east positive
    pub utc_offset_seconds: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthInput {
    pub name: String,
    pub date: NaiveDate,
    /// Local clock time at the birth place
    pub time: NaiveTime,
    pub location: BirthLocation,
}

impl BirthInput {
    pub fn new(name: impl Into<String>, date: NaiveDate, time: NaiveTime, location: BirthLocation) -> Self {
        Self {
            name: name.into(),
            date,
            time,
            location,
        }
    }

    /// Build from form text: `YYYY-MM-DD` and `HH:MM` or `HH:MM:SS`.
    pub fn parse(
        name: &str,
        date: &str,
        time: &str,
        latitude: f64,
        longitude: f64,
        utc_offset_seconds: i32,
    ) -> Result<Self, InputError> {
        let parsed_date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
            InputError::InvalidDate {
                value: date.to_string(),
            }
        })?;
        let parsed_time = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M"))
            .map_err(|_| InputError::InvalidTime {
                value: time.to_string(),
            })?;

        let input = Self::new(
            name,
            parsed_date,
            parsed_time,
            BirthLocation {
                latitude,
                longitude,
                utc_offset_seconds,
            },
        );
        input.geo()?;
        Ok(input)
    }

    pub fn local_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Coordinates, bounds-checked.
    pub fn geo(&self) -> Result<GeoLocation, InputError> {
        let geo = GeoLocation {
            lat: self.location.latitude,
            lon: self.location.longitude,
        };
        if !geo.is_valid() {
            return Err(InputError::InvalidLocation {
                latitude: self.location.latitude,
                longitude: self.location.longitude,
            });
        }
        Ok(geo)
    }

    /// UTC instant using the fixed offset carried in the location.
    pub fn instant(&self) -> Result<DateTime<Utc>, InputError> {
        let seconds = self.location.utc_offset_seconds;
        if seconds.abs() > MAX_OFFSET_SECONDS {
            return Err(InputError::InvalidOffset { seconds });
        }
        let offset = FixedOffset::east_opt(seconds).ok_or(InputError::InvalidOffset { seconds })?;
        self.instant_in(&offset)
    }

    /// UTC instant for the local clock reading in `tz`.
    ///
    /// Fold and gap readings are errors; no offset is picked silently.
    pub fn instant_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Utc>, InputError> {
        let local = self.local_datetime();
        match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, latest) => Err(InputError::AmbiguousLocalTime {
                local,
                earliest: earliest.with_timezone(&Utc),
                latest: latest.with_timezone(&Utc),
            }),
            LocalResult::None => Err(InputError::NonexistentLocalTime { local }),
        }
    }
}
