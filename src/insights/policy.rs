//! Insight policy constants
//!
//! Every threshold the report depends on lives here. Values are fixed
//! policy; changing any of them changes observable report output.

/// Trailing observation window, in days
pub const WINDOW_DAYS: i64 = 7;

/// Average temperature (°C) above which the heat advisory fires
pub const HOT_TEMPERATURE: f64 = 30.0;

/// Average temperature (°C) below which the cold advisory fires
pub const COLD_TEMPERATURE: f64 = 10.0;

/// Average relative humidity (%) below which the dry-air advisory fires
pub const DRY_HUMIDITY: f64 = 30.0;

/// Average relative humidity (%) above which the humid-air advisory fires
pub const HUMID_HUMIDITY: f64 = 80.0;

/// Average wind speed (m/s) above which the strong-wind advisory fires
pub const STRONG_WIND_SPEED: f64 = 10.0;

/// Minimum difference (°C) between recent and older half means to call a trend
pub const TREND_DELTA: f64 = 2.0;

/// Fewest observations the trend detector needs
pub const TREND_MIN_OBSERVATIONS: usize = 2;

