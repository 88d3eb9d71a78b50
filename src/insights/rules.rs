//! Insight Rule Engine
//!
//! Maps window averages and the trend signal through the policy thresholds
//! into an ordered list of advisories. Rules are evaluated in a fixed
//! order and each rule contributes at most one insight:
//!
//! 1. temperature: hot, else cold
//! 2. humidity: dry, else humid
//! 3. wind: strong
//! 4. trend: warming, else cooling

use crate::insights::policy::{
    COLD_TEMPERATURE, DRY_HUMIDITY, HOT_TEMPERATURE, HUMID_HUMIDITY, STRONG_WIND_SPEED,
};
use crate::insights::trend::TrendSignal;
use serde::Serialize;

/// Inputs the rule table reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleInputs {
    pub avg_temperature: f64,
    pub avg_humidity: f64,
    pub avg_wind_speed: f64,
    pub trend: Option<TrendSignal>,
}

/// One advisory the rule table can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    HighTemperature,
    LowTemperature,
    LowHumidity,
    HighHumidity,
    StrongWind,
    WarmingTrend,
    CoolingTrend,
}

impl Insight {
    /// Human-readable advisory text
    pub fn message(&self) -> &'static str {
        match self {
            Insight::HighTemperature => {
                "High temperatures detected. Stay hydrated and drink water frequently."
            }
            Insight::LowTemperature => "Low temperatures in this period. Dress warmly.",
            Insight::LowHumidity => "Very low air humidity. Consider using a humidifier.",
            Insight::HighHumidity => "High humidity detected. Rain is possible.",
            Insight::StrongWind => "Strong winds recorded. Watch out for loose objects.",
            Insight::WarmingTrend => "Warming trend over the last few days.",
            Insight::CoolingTrend => "Cooling trend over the last few days.",
        }
    }
}

impl std::fmt::Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Evaluate the rule table. Output order is evaluation order.
pub fn evaluate(inputs: &RuleInputs) -> Vec<Insight> {
    let mut insights = Vec::new();

    if inputs.avg_temperature > HOT_TEMPERATURE {
        insights.push(Insight::HighTemperature);
    } else if inputs.avg_temperature < COLD_TEMPERATURE {
        insights.push(Insight::LowTemperature);
    }

    if inputs.avg_humidity < DRY_HUMIDITY {
        insights.push(Insight::LowHumidity);
    } else if inputs.avg_humidity > HUMID_HUMIDITY {
        insights.push(Insight::HighHumidity);
    }

    if inputs.avg_wind_speed > STRONG_WIND_SPEED {
        insights.push(Insight::StrongWind);
    }

    match inputs.trend {
        Some(TrendSignal::Warming) => insights.push(Insight::WarmingTrend),
        Some(TrendSignal::Cooling) => insights.push(Insight::CoolingTrend),
        Some(TrendSignal::Stable) | None => {}
    }

    insights
}
