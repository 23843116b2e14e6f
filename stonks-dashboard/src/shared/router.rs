//! Event router: decodes inbound frames and fans them out to the surfaces
//!
//! Dispatch is synchronous and total. Each frame is either routed to the
//! surfaces registered for its tag, ignored (unknown tag), or rejected with a
//! [`DispatchError`]. A rejected frame leaves every surface untouched.

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::shared::error::DispatchError;
use crate::shared::surfaces::{FeedEntry, HeaderUpdate, PlotUpdate, Surfaces, Totals, ViewSurface};
use crate::shared::types::{DashboardEvent, EventEnvelope, EventKind};

/// Outcome of dispatching one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Routed(EventKind),
    /// Tag not known to this client
    Ignored(String),
}

/// Running totals of what the router has seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterStats {
    pub routed: u64,
    pub ignored: u64,
    pub dropped: u64,
}

#[derive(Debug, Clone, Default)]
pub struct EventRouter {
    stats: RouterStats,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    /// Dispatch a raw frame, stamping it with the current local time
    pub fn dispatch(
        &mut self,
        raw: &str,
        surfaces: &mut Surfaces,
    ) -> Result<Dispatch, DispatchError> {
        self.dispatch_at(raw, surfaces, Local::now())
    }

    /// Dispatch a raw frame received at `now`
    pub fn dispatch_at(
        &mut self,
        raw: &str,
        surfaces: &mut Surfaces,
        now: DateTime<Local>,
    ) -> Result<Dispatch, DispatchError> {
        match decode(raw) {
            Ok(Decoded::Known(event)) => {
                let kind = event.kind();
                route(event, surfaces, now);
                self.stats.routed += 1;
                Ok(Dispatch::Routed(kind))
            }
            Ok(Decoded::Unknown(tag)) => {
                self.stats.ignored += 1;
                debug!(tag = %tag, "Ignoring unknown event tag");
                Ok(Dispatch::Ignored(tag))
            }
            Err(error) => {
                self.stats.dropped += 1;
                Err(error)
            }
        }
    }
}

/// A well formed envelope, classified by its tag
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Known(DashboardEvent),
    Unknown(String),
}

/// Parse the envelope and, for known tags, the typed payload
pub fn decode(raw: &str) -> Result<Decoded, DispatchError> {
    let envelope: EventEnvelope =
        serde_json::from_str(raw).map_err(|e| DispatchError::Malformed(e.to_string()))?;

    let Some(kind) = EventKind::from_tag(&envelope.kind) else {
        return Ok(Decoded::Unknown(envelope.kind));
    };

    let data = envelope.data;
    let event = match kind {
        EventKind::Portfolio => DashboardEvent::Portfolio(payload(kind, data)?),
        EventKind::Chart => DashboardEvent::Chart(payload(kind, data)?),
        EventKind::ChartTick => DashboardEvent::ChartTick(payload(kind, data)?),
        EventKind::Ticker => DashboardEvent::Ticker(payload(kind, data)?),
        EventKind::Close => DashboardEvent::Close(payload(kind, data)?),
        EventKind::Index => DashboardEvent::Index(payload(kind, data)?),
        EventKind::Status => DashboardEvent::Status(payload(kind, data)?),
    };

    Ok(Decoded::Known(event))
}

fn payload<T>(kind: EventKind, data: serde_json::Value) -> Result<T, DispatchError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(data).map_err(|e| DispatchError::InvalidPayload {
        kind,
        reason: e.to_string(),
    })
}

/// Apply a decoded event to the surfaces registered for its tag.
///
/// Every event except `status` also bumps the header's last update time.
pub fn route(event: DashboardEvent, surfaces: &mut Surfaces, now: DateTime<Local>) {
    match event {
        DashboardEvent::Portfolio(snapshot) => {
            surfaces.summary.update(Totals::from(&snapshot));
            surfaces.positions.update(snapshot.positions);
            surfaces.composition.update(snapshot.composition);
            surfaces.forex.update(snapshot.exchange_rates);
            surfaces.indices.update(snapshot.indices);
        }
        DashboardEvent::Chart(bars) => surfaces.plot.update(PlotUpdate::Replace(bars)),
        DashboardEvent::ChartTick(bar) => surfaces.plot.update(PlotUpdate::Tick(bar)),
        DashboardEvent::Ticker(ticker) => surfaces.feed.update(FeedEntry {
            received: now,
            ticker,
        }),
        DashboardEvent::Close(bars) => surfaces.daily_close.update(bars),
        DashboardEvent::Index(indices) => surfaces.indices.update(indices),
        DashboardEvent::Status(status) => {
            surfaces.status.update(status);
            return;
        }
    }

    surfaces.header.update(HeaderUpdate::Touched(now));
}
