//! Trip context: declared properties, temperature range, and duration.
//!
//! [`Context`] is what applicability is tested against; [`Trip`] wraps a
//! context with a day count and is what quantities are computed against.
//! Neither is validated on construction. Callers that want to reject
//! malformed trips run [`validate_trip`] first.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::property::Property;

/// Properties and temperature bounds for one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Actual value of each declared property. Undeclared properties are unknown.
    #[serde(default)]
    pub properties: BTreeMap<Property, bool>,
    /// Lowest expected temperature.
    pub temperature_min: i32,
    /// Highest expected temperature.
    pub temperature_max: i32,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
            temperature_min: 0,
            temperature_max: 100,
        }
    }
}

impl Context {
    pub fn new(temperature_min: i32, temperature_max: i32) -> Self {
        Self {
            properties: BTreeMap::new(),
            temperature_min,
            temperature_max,
        }
    }

    /// Declare `name` with `value`, replacing any earlier declaration.
    pub fn with(mut self, name: impl Into<Property>, value: bool) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn property(&self, name: &str) -> Option<bool> {
        self.properties.get(name).copied()
    }

    /// Inclusive interval overlap between `min..=max` and this context's range.
    pub fn overlaps_temperature(&self, min: i32, max: i32) -> bool {
        max >= self.temperature_min && min <= self.temperature_max
    }
}

/// A trip: how many days, and under what conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub days: u32,
    pub context: Context,
}

impl Default for Trip {
    fn default() -> Self {
        Self {
            days: 1,
            context: Context::default(),
        }
    }
}

impl Trip {
    pub fn new(days: u32, context: Context) -> Self {
        Self { days, context }
    }
}

/// Trip validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripError {
    /// A trip must span at least one day.
    ZeroDays,
    /// Minimum temperature above maximum.
    InvertedTemperatureRange { min: i32, max: i32 },
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripError::ZeroDays => write!(f, "trip must last at least one day"),
            TripError::InvertedTemperatureRange { min, max } => {
                write!(f, "temperature range inverted: min {} > max {}", min, max)
            }
        }
    }
}

impl std::error::Error for TripError {}

/// Validate a trip, returning all errors found.
pub fn validate_trip(trip: &Trip) -> Vec<TripError> {
    let mut errors = Vec::new();

    if trip.days == 0 {
        errors.push(TripError::ZeroDays);
    }
    let ctx = &trip.context;
    if ctx.temperature_min > ctx.temperature_max {
        errors.push(TripError::InvertedTemperatureRange {
            min: ctx.temperature_min,
            max: ctx.temperature_max,
        });
    }

    errors
}
