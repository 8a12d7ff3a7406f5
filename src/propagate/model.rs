use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use super::error::PropagationError;

/// One catalog entry as raw text.
#[derive(Debug, Clone, Copy)]
pub struct TleLines<'a> {
    pub name: &'a str,
    pub line1: &'a str,
    pub line2: &'a str,
}

/// A propagation model built from a single element set.
pub trait OrbitModel {
    /// NORAD catalog number of the modelled object.
    fn id(&self) -> u64;

    /// Inertial (TEME) position in kilometres at `at`.
    fn position_km(&self, at: DateTime<Utc>) -> Result<[f64; 3], PropagationError>;
}

pub trait ModelBuilder {
    type Model: OrbitModel;

    fn build(&self, tle: &TleLines<'_>) -> Result<Self::Model, PropagationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Builder;

pub struct Sgp4Model {
    elements: Elements,
    constants: Constants,
}

impl ModelBuilder for Sgp4Builder {
    type Model = Sgp4Model;

    fn build(&self, tle: &TleLines<'_>) -> Result<Sgp4Model, PropagationError> {
        let name = Some(tle.name.to_string()).filter(|n| !n.is_empty());
        let elements = Elements::from_tle(name, tle.line1.as_bytes(), tle.line2.as_bytes())?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Sgp4Model {
            elements,
            constants,
        })
    }
}

impl OrbitModel for Sgp4Model {
    fn id(&self) -> u64 {
        self.elements.norad_id
    }

    fn position_km(&self, at: DateTime<Utc>) -> Result<[f64; 3], PropagationError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PropagationError::Time(e.to_string()))?;
        let prediction = self.constants.propagate(minutes)?;
        Ok(prediction.position)
    }
}
