//! Core data types for dashboard events
//!
//! These types match the JSON message format pushed by the Stonks backend
//! over its `/ws` endpoint. Every frame is an envelope `{ "type", "data" }`.

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Unit shown when a ticker or position carries no currency of its own.
pub const DEFAULT_CURRENCY: &str = "NOK";

/// Event envelope from the server
///
/// The `data` payload is kept untyped until the tag has been classified.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventEnvelope {
    /// Event tag: "portfolio", "chart", "chart_tick", "ticker", "close", "index", "status"
    #[serde(rename = "type")]
    pub kind: String,
    /// Event-specific data (deserialize based on `kind` field)
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Closed set of event tags the dashboard knows how to route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Portfolio,
    Chart,
    ChartTick,
    Ticker,
    Close,
    Index,
    Status,
}

impl EventKind {
    /// Classify a wire tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "portfolio" => Some(EventKind::Portfolio),
            "chart" => Some(EventKind::Chart),
            "chart_tick" => Some(EventKind::ChartTick),
            "ticker" => Some(EventKind::Ticker),
            "close" => Some(EventKind::Close),
            "index" => Some(EventKind::Index),
            "status" => Some(EventKind::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Portfolio => "portfolio",
            EventKind::Chart => "chart",
            EventKind::ChartTick => "chart_tick",
            EventKind::Ticker => "ticker",
            EventKind::Close => "close",
            EventKind::Index => "index",
            EventKind::Status => "status",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full portfolio snapshot
///
/// Replaces every derived view on arrival, never merged with the previous one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PortfolioSnapshot {
    pub positions: Vec<Position>,
    /// Asset label -> allocation percentage (need not sum to 100)
    #[serde(default)]
    pub composition: IndexMap<String, f64>,
    /// Currency code -> quote
    #[serde(default)]
    pub exchange_rates: IndexMap<String, ForexQuote>,
    /// Index ticker -> quote
    #[serde(default)]
    pub indices: IndexMap<String, IndexQuote>,
    pub market_value: f64,
    pub net_return: f64,
    pub net_return_percent: f64,
}

/// A single holding inside a portfolio snapshot
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Position {
    /// Display name, unique within a snapshot
    pub name: String,
    pub volume: f64,
    pub market_price: f64,
    pub currency: String,
    pub market_value: f64,
    pub net_return: f64,
    pub net_return_percent: f64,
    /// Asset category (e.g. "Equity", "Index Fund")
    pub asset: String,
    /// Share of the portfolio in percent
    #[serde(default)]
    pub allocation: f64,
}

/// Exchange rate quote
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ForexQuote {
    pub name: String,
    pub market_price: f64,
    #[serde(default)]
    pub change: Option<f64>,
}

/// Market index quote
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IndexQuote {
    pub name: String,
    pub last: f64,
    /// 1 day change in percent
    pub change: f64,
    /// 7 day change in percent
    pub change_7d: f64,
}

/// Price update for a single instrument
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TickerEvent {
    pub name: String,
    pub market_price: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

impl TickerEvent {
    /// Currency to display, falling back to [`DEFAULT_CURRENCY`]
    pub fn unit(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

/// Intraday OHLC bar keyed by epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct OhlcBar {
    #[serde(deserialize_with = "deserialize_epoch_seconds")]
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Daily close bar keyed by calendar date
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DailyBar {
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Counters reported by one backend collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusEntry {
    pub messages: u64,
    pub errors: u64,
    pub restarts: u64,
}

/// A point handed to the chart renderer: `x` in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhlcPoint {
    pub x: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcPoint {
    pub fn is_upward(&self) -> bool {
        self.close >= self.open
    }
}

impl From<OhlcBar> for OhlcPoint {
    fn from(bar: OhlcBar) -> Self {
        Self {
            x: bar.time.saturating_mul(1000),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }
    }
}

impl From<DailyBar> for OhlcPoint {
    fn from(bar: DailyBar) -> Self {
        Self {
            x: bar.date.and_time(NaiveTime::MIN).and_utc().timestamp_millis(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }
    }
}

/// Typed event, produced once the envelope tag has been classified
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    Portfolio(PortfolioSnapshot),
    Chart(Vec<OhlcBar>),
    ChartTick(OhlcBar),
    Ticker(TickerEvent),
    Close(Vec<DailyBar>),
    Index(IndexMap<String, IndexQuote>),
    Status(IndexMap<String, StatusEntry>),
}

impl DashboardEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DashboardEvent::Portfolio(_) => EventKind::Portfolio,
            DashboardEvent::Chart(_) => EventKind::Chart,
            DashboardEvent::ChartTick(_) => EventKind::ChartTick,
            DashboardEvent::Ticker(_) => EventKind::Ticker,
            DashboardEvent::Close(_) => EventKind::Close,
            DashboardEvent::Index(_) => EventKind::Index,
            DashboardEvent::Status(_) => EventKind::Status,
        }
    }
}

/// Epoch seconds that still fit in epoch milliseconds
fn deserialize_epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = i64::deserialize(deserializer)?;
    seconds
        .checked_mul(1000)
        .map(|_| seconds)
        .ok_or_else(|| serde::de::Error::custom(format!("time {seconds} out of range")))
}

/// Accepts "2024-03-01" as well as full ISO datetimes ("2024-03-01T18:00:00+01:00")
fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let date_part = raw.get(..10).unwrap_or(raw.as_str());
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
}
