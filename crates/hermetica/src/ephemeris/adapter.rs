use crate::chart::{build_chart, NatalChart};
use crate::ephemeris::types::{EphemerisSettings, GeoLocation, RawPositions};
use crate::ephemeris::{AnalyticEphemeris, EphemerisProvider};
use crate::error::EphemerisError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Validating front of an [`EphemerisProvider`].
///
/// Rejects out-of-bounds locations and instants outside the provider's span
/// before asking it for positions, then hands the raw data to the chart builder.
#[derive(Clone)]
pub struct EphemerisAdapter {
    provider: Arc<dyn EphemerisProvider>,
    settings: EphemerisSettings,
}

impl EphemerisAdapter {
    pub fn new(provider: Arc<dyn EphemerisProvider>, settings: EphemerisSettings) -> Self {
        Self { provider, settings }
    }

    /// Adapter over the built-in analytic series.
    pub fn analytic(settings: EphemerisSettings) -> Self {
        Self::new(Arc::new(AnalyticEphemeris::new()), settings)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn settings(&self) -> &EphemerisSettings {
        &self.settings
    }

    pub fn valid_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.provider.valid_range()
    }

    /// Raw positions and cusps for an instant and place.
    pub fn compute_raw(
        &self,
        instant: DateTime<Utc>,
        location: GeoLocation,
    ) -> Result<RawPositions, EphemerisError> {
        if !location.is_valid() {
            return Err(EphemerisError::InvalidLocation {
                latitude: location.lat,
                longitude: location.lon,
            });
        }

        let (valid_from, valid_to) = self.provider.valid_range();
        if instant < valid_from || instant > valid_to {
            return Err(EphemerisError::OutOfRange {
                instant,
                valid_from,
                valid_to,
            });
        }

        self.provider.positions_at(instant, location, &self.settings)
    }

    /// Compute the natal chart for an instant and place.
    pub fn compute_positions(
        &self,
        instant: DateTime<Utc>,
        location: GeoLocation,
    ) -> Result<NatalChart, EphemerisError> {
        let raw = self.compute_raw(instant, location)?;
        log::debug!(
            "{} ephemeris: {} bodies at {} ({:.4}, {:.4})",
            self.provider.name(),
            raw.bodies.len(),
            instant,
            location.lat,
            location.lon
        );
        build_chart(&raw.bodies, &raw.houses)
    }
}

impl std::fmt::Debug for EphemerisAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemerisAdapter")
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn madrid() -> GeoLocation {
        GeoLocation { lat: 40.4168, lon: -3.7038 }
    }

    #[test]
    fn test_invalid_latitude_is_rejected() {
        let adapter = EphemerisAdapter::analytic(EphemerisSettings::default());
        let instant = Utc.with_ymd_and_hms(1990, 5, 15, 12, 30, 0).unwrap();
        let err = adapter
            .compute_positions(instant, GeoLocation { lat: 91.0, lon: 0.0 })
            .unwrap_err();
        assert!(matches!(err, EphemerisError::InvalidLocation { .. }));
    }

    #[test]
    fn test_invalid_longitude_is_rejected() {
        let adapter = EphemerisAdapter::analytic(EphemerisSettings::default());
        let instant = Utc.with_ymd_and_hms(1990, 5, 15, 12, 30, 0).unwrap();
        let err = adapter
            .compute_positions(instant, GeoLocation { lat: 0.0, lon: -180.5 })
            .unwrap_err();
        assert!(matches!(err, EphemerisError::InvalidLocation { .. }));
    }

    #[test]
    fn test_instant_outside_span_is_out_of_range() {
        let adapter = EphemerisAdapter::analytic(EphemerisSettings::default());
        let instant = Utc.with_ymd_and_hms(1700, 1, 1, 0, 0, 0).unwrap();
        match adapter.compute_positions(instant, madrid()) {
            Err(EphemerisError::OutOfRange { instant: got, .. }) => assert_eq!(got, instant),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_compute_positions_builds_chart() {
        let adapter = EphemerisAdapter::analytic(EphemerisSettings::default());
        let instant = Utc.with_ymd_and_hms(1990, 5, 15, 12, 30, 0).unwrap();
        let chart = adapter.compute_positions(instant, madrid()).unwrap();
        assert_eq!(chart.bodies().len(), 13);
        assert_eq!(adapter.provider_name(), "analytic");
    }
}
