use crate::chart::builder::house_of;
use crate::ephemeris::types::HouseSystem;
use crate::zodiac::{Body, Sect, Sign};
use serde::{Deserialize, Serialize};

/// A body placed in the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetPosition {
    pub body: Body,
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    pub latitude: f64,
    /// Degrees per day
    pub speed: f64,
    pub retrograde: bool,
    pub sign: Sign,
    /// 1..=12
    pub house: u8,
    pub degree_in_sign: f64,
}

/// One house with its sign and rulers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseInfo {
    pub number: u8,
    pub cusp: f64,
    pub sign: Sign,
    pub ruler: Body,
    /// House the traditional ruler occupies, if the ruler is in the chart
    pub ruler_house: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co_ruler: Option<Body>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co_ruler_house: Option<u8>,
}

/// Immutable natal chart.
///
/// Built once by [`crate::chart::build_chart`]; every engine receives `&NatalChart`
/// and nothing can mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatalChart {
    pub(crate) bodies: Vec<PlanetPosition>,
    pub(crate) house_system: HouseSystem,
    pub(crate) cusps: [f64; 12],
    pub(crate) ascendant: f64,
    pub(crate) midheaven: f64,
    pub(crate) diurnal: bool,
}

impl NatalChart {
    /// Bodies in canonical order, one per tracked body.
    pub fn bodies(&self) -> &[PlanetPosition] {
        &self.bodies
    }

    pub fn body(&self, body: Body) -> Option<&PlanetPosition> {
        self.bodies.iter().find(|p| p.body == body)
    }

    pub fn longitude_of(&self, body: Body) -> Option<f64> {
        self.body(body).map(|p| p.longitude)
    }

    pub fn house_system(&self) -> HouseSystem {
        self.house_system
    }

    /// Cusp longitudes, houses 1..=12.
    pub fn cusps(&self) -> &[f64; 12] {
        &self.cusps
    }

    pub fn ascendant(&self) -> f64 {
        self.ascendant
    }

    pub fn midheaven(&self) -> f64 {
        self.midheaven
    }

    pub fn ascendant_sign(&self) -> Sign {
        Sign::from_longitude(self.ascendant)
    }

    pub fn midheaven_sign(&self) -> Sign {
        Sign::from_longitude(self.midheaven)
    }

    pub fn is_diurnal(&self) -> bool {
        self.diurnal
    }

    pub fn sect(&self) -> Sect {
        Sect::from_diurnal(self.diurnal)
    }

    /// House containing an arbitrary longitude, with the same boundary rule as bodies.
    pub fn house_of_longitude(&self, longitude: f64) -> u8 {
        house_of(longitude, &self.cusps)
    }

    /// Sign on the cusp of `house`, `None` outside 1..=12.
    pub fn house_sign(&self, house: u8) -> Option<Sign> {
        let idx = usize::from(house).checked_sub(1)?;
        self.cusps.get(idx).map(|cusp| Sign::from_longitude(*cusp))
    }

    /// The 12 houses with their traditional ruler and, where one exists, modern co-ruler.
    pub fn houses(&self) -> Vec<HouseInfo> {
        use crate::western::rulers::{modern_ruler, traditional_ruler};

        (1..=12u8)
            .zip(self.cusps)
            .map(|(number, cusp)| {
                let sign = Sign::from_longitude(cusp);
                let ruler = traditional_ruler(sign);
                let co_ruler = modern_ruler(sign);
                HouseInfo {
                    number,
                    cusp,
                    sign,
                    ruler,
                    ruler_house: self.body(ruler).map(|p| p.house),
                    co_ruler,
                    co_ruler_house: co_ruler.and_then(|b| self.body(b)).map(|p| p.house),
                }
            })
            .collect()
    }
}
