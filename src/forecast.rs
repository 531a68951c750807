//! Reduces the provider's 3-hour forecast samples to one entry per day.
//!
//! Days are keyed by weekday name only. A horizon longer than a week would
//! fold two distinct dates onto the same label; the provider's forecast
//! endpoint covers five days, so this never happens in practice.

use crate::weather::{round_temperature, ForecastSample};
use chrono::{DateTime, FixedOffset};
use std::collections::HashSet;

pub const MAX_FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    /// Weekday name, e.g. "Monday".
    pub label: String,
    pub temperature: i64,
    pub description: String,
    pub icon: Option<String>,
    /// Unix timestamp of the sample the entry was taken from.
    pub timestamp: i64,
}

impl ForecastDay {
    pub fn temperature_label(&self) -> String {
        format!("{}°C", self.temperature)
    }
}

/// Picks the first sample of each day strictly after `now`'s calendar date,
/// in payload order, stopping after [`MAX_FORECAST_DAYS`] entries.
///
/// Sample timestamps are read in `now`'s offset, so "today" and the weekday
/// labels are those of the location being shown.
pub fn daily_forecast(samples: &[ForecastSample], now: DateTime<FixedOffset>) -> Vec<ForecastDay> {
    let offset = now.timezone();
    let today = now.date_naive();
    let mut seen = HashSet::new();
    let mut days = Vec::with_capacity(MAX_FORECAST_DAYS);

    for sample in samples {
        let Some(at) = DateTime::from_timestamp(sample.dt, 0) else {
            continue;
        };
        let at = at.with_timezone(&offset);
        let label = at.format("%A").to_string();

        if seen.contains(&label) || at.date_naive() <= today {
            continue;
        }

        let condition = sample.condition();
        days.push(ForecastDay {
            temperature: round_temperature(sample.main.temp),
            description: condition.map(|c| c.description.clone()).unwrap_or_default(),
            icon: condition
                .map(|c| c.icon.clone())
                .filter(|icon| !icon.is_empty()),
            timestamp: sample.dt,
            label: label.clone(),
        });
        seen.insert(label);

        if days.len() == MAX_FORECAST_DAYS {
            break;
        }
    }

    days
}
