pub mod adapter;
pub mod analytic;
pub mod astro;
pub mod houses;
#[cfg(feature = "swiss-ephemeris")]
pub mod swiss;
pub mod types;

pub use crate::error::EphemerisError;
pub use adapter::EphemerisAdapter;
pub use analytic::AnalyticEphemeris;
#[cfg(feature = "swiss-ephemeris")]
pub use swiss::{active_ephemeris_path, SwissEphemerisAdapter};
pub use types::{BodyPosition, EphemerisSettings, GeoLocation, HouseCusps, HouseSystem, RawPositions};

use chrono::{DateTime, Utc};

/// Source of raw tropical positions and house cusps.
///
/// Implementations are pure over their inputs and must be shareable across
/// threads; batch reports call one provider from many workers.
pub trait EphemerisProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inclusive span of instants the provider can answer for.
    fn valid_range(&self) -> (DateTime<Utc>, DateTime<Utc>);

    fn positions_at(
        &self,
        instant: DateTime<Utc>,
        location: GeoLocation,
        settings: &EphemerisSettings,
    ) -> Result<RawPositions, EphemerisError>;
}
