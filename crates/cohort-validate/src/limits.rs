//! Plausibility limits for subject and assessment fields.

pub const MIN_YEAR_OF_BIRTH: f64 = 1930.0;
pub const MAX_YEAR_OF_BIRTH: f64 = 2004.0;

pub const MIN_HEIGHT_CM: f64 = 110.0;
pub const MAX_HEIGHT_CM: f64 = 220.0;

pub const MIN_WEIGHT_KG: f64 = 40.0;
pub const MAX_WEIGHT_KG: f64 = 200.0;

pub const MIN_BMI: f64 = 15.0;
pub const MAX_BMI: f64 = 55.0;

/// Body temperature in Celsius, exclusive bounds. Readings above the upper
/// bound are assumed Fahrenheit and converted before filtering.
pub const MIN_TEMPERATURE_C: f64 = 35.0;
pub const MAX_TEMPERATURE_C: f64 = 42.0;
