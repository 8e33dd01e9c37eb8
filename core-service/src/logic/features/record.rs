//! Raw Input Record - one accident as entered in the form

use serde::Serialize;

use super::layout::{RoadType, VehicleType, Weather};

/// Youngest accepted driver age
pub const MIN_AGE: u32 = 16;

/// Oldest accepted driver age
pub const MAX_AGE: u32 = 100;

/// Age preselected in the form
pub const DEFAULT_AGE: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("driver age {0} is outside {min}..={max}", min = MIN_AGE, max = MAX_AGE)]
    AgeOutOfRange(u32),
}

/// Raw accident attributes, created fresh per prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccidentRecord {
    age: u32,
    vehicle_type: VehicleType,
    weather: Weather,
    road_type: RoadType,
}

impl AccidentRecord {
    pub fn new(
        age: u32,
        vehicle_type: VehicleType,
        weather: Weather,
        road_type: RoadType,
    ) -> Result<Self, RecordError> {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(RecordError::AgeOutOfRange(age));
        }

        Ok(Self {
            age,
            vehicle_type,
            weather,
            road_type,
        })
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn road_type(&self) -> RoadType {
        self.road_type
    }
}
