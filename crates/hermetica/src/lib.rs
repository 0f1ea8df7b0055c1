//! Natal chart computation and the rule-based products derived from it:
//! annual profections, the seven Hermetic lots, dignity ranking, sect
//! condition and health correspondences, resolved against a keyed
//! interpretation corpus.

pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod interpretation;
pub mod report;
pub mod western;
pub mod zodiac;

pub use chart::{build_chart, BirthInput, BirthLocation, HouseInfo, NatalChart, PlanetPosition};
pub use ephemeris::{AnalyticEphemeris, EphemerisAdapter, EphemerisProvider, EphemerisSettings, GeoLocation, HouseSystem};
#[cfg(feature = "swiss-ephemeris")]
pub use ephemeris::SwissEphemerisAdapter;
pub use error::{ConfigurationError, EphemerisError, InputError, LookupMiss, ReportError};
pub use interpretation::{Corpus, Fragment, InterpretationKey, Topic};
pub use report::{Report, ReportEngine};
pub use zodiac::{Body, Element, Modality, Sect, Sign};
