//! Display formatting for numeric values
//!
//! Pure functions only. Colours are chosen by the widgets from [`Sign`].

use chrono::{DateTime, TimeZone};

/// Sign category driving the green/red colouring of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    NonNegative,
    Negative,
}

impl Sign {
    pub fn of(value: f64) -> Self {
        if value < 0.0 {
            Sign::Negative
        } else {
            Sign::NonNegative
        }
    }
}

/// A value ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct Formatted {
    pub text: String,
    pub sign: Sign,
    pub unit: Option<String>,
}

impl Formatted {
    /// Value followed by its unit, e.g. `"12.5 USD"`
    pub fn with_unit(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} {}", self.text, unit),
            None => self.text.clone(),
        }
    }
}

/// Format a value as the backend sent it, tagged with its sign and an optional unit
pub fn signed(value: f64, unit: Option<&str>) -> Formatted {
    Formatted {
        text: value.to_string(),
        sign: Sign::of(value),
        unit: unit.map(str::to_owned),
    }
}

/// Format with a fixed number of decimals, ties rounded away from zero
pub fn fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    format!("{:.*}", decimals, rounded)
}

/// Collector counters: `999` stays as is, `1500` becomes `1.5K`
pub fn counter(count: u64) -> String {
    if count >= 1000 {
        format!("{}K", fixed(count as f64 / 1000.0, 1))
    } else {
        count.to_string()
    }
}

/// Wall clock label `HH:MM:SS`
pub fn clock<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format("%H:%M:%S").to_string()
}

/// Round half up, ties towards positive infinity
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
