//! Dashboard shell: owns every surface and applies connection events in order

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::shared::config::DashboardConfig;
use crate::shared::router::{Dispatch, EventRouter, RouterStats};
use crate::shared::surfaces::{HeaderUpdate, Surfaces, ViewSurface};
use crate::shared::websocket::{ConnectionEvent, ConnectionStatus};

pub struct Dashboard {
    surfaces: Surfaces,
    router: EventRouter,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            surfaces: Surfaces::new(config.feed_limit, config.tax_rate),
            router: EventRouter::new(),
        }
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    pub fn router_stats(&self) -> RouterStats {
        self.router.stats()
    }

    /// Apply one connection event received now
    pub fn apply(&mut self, event: ConnectionEvent) {
        self.apply_at(event, Local::now());
    }

    /// Apply one connection event received at `now`.
    ///
    /// A bad frame is logged and dropped; it never stops the dashboard.
    pub fn apply_at(&mut self, event: ConnectionEvent, now: DateTime<Local>) {
        match event {
            ConnectionEvent::Opened => self.set_status(ConnectionStatus::Connected),
            ConnectionEvent::Closed => self.set_status(ConnectionStatus::Disconnected),
            ConnectionEvent::Reconnecting { delay } => {
                info!("Reconnecting in {:?}", delay);
                self.set_status(ConnectionStatus::Reconnecting);
            }
            ConnectionEvent::Message(raw) => {
                match self.router.dispatch_at(&raw, &mut self.surfaces, now) {
                    Ok(Dispatch::Routed(kind)) => debug!(%kind, "Routed event"),
                    Ok(Dispatch::Ignored(_)) => {}
                    Err(e) if e.is_shape_error() => {
                        warn!("Dropping frame: {}", e);
                        debug!("Raw message: {}", raw);
                    }
                    Err(e) => {
                        warn!("Dropping unparseable frame: {}", e);
                        debug!("Raw message: {}", raw.chars().take(200).collect::<String>());
                    }
                }
            }
        }
    }

    /// Apply everything already queued, in arrival order. Returns how many events were applied.
    pub fn drain(&mut self, events: &mut mpsc::Receiver<ConnectionEvent>) -> usize {
        let mut applied = 0;
        while let Ok(event) = events.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        info!(%status, "Connection status changed");
        self.surfaces.header.update(HeaderUpdate::Status(status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TICKER: &str =
        r#"{"type":"ticker","data":{"name":"ACME","market_price":12.5,"currency":"USD"}}"#;

    #[test]
    fn test_lifecycle_drives_header() {
        let mut dashboard = Dashboard::new(&DashboardConfig::default());
        assert_eq!(
            dashboard.surfaces().header.status(),
            ConnectionStatus::Disconnected
        );

        dashboard.apply(ConnectionEvent::Opened);
        assert_eq!(dashboard.surfaces().header.status(), ConnectionStatus::Connected);

        dashboard.apply(ConnectionEvent::Closed);
        assert_eq!(
            dashboard.surfaces().header.status(),
            ConnectionStatus::Disconnected
        );

        dashboard.apply(ConnectionEvent::Reconnecting {
            delay: Duration::from_secs(10),
        });
        assert_eq!(
            dashboard.surfaces().header.status(),
            ConnectionStatus::Reconnecting
        );

        dashboard.apply(ConnectionEvent::Opened);
        assert_eq!(dashboard.surfaces().header.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_bad_frames_do_not_stop_processing() {
        let mut dashboard = Dashboard::new(&DashboardConfig::default());
        dashboard.apply(ConnectionEvent::Opened);

        dashboard.apply(ConnectionEvent::Message("{not json".to_string()));
        dashboard.apply(ConnectionEvent::Message(
            r#"{"type":"unknown_tag","data":{}}"#.to_string(),
        ));
        dashboard.apply(ConnectionEvent::Message(TICKER.to_string()));

        assert_eq!(dashboard.surfaces().header.status(), ConnectionStatus::Connected);
        assert_eq!(dashboard.surfaces().feed.len(), 1);
        assert_eq!(
            dashboard.router_stats(),
            RouterStats {
                routed: 1,
                ignored: 1,
                dropped: 1,
            }
        );
    }

    #[test]
    fn test_feed_limit_comes_from_config() {
        let config = DashboardConfig {
            feed_limit: 2,
            ..DashboardConfig::default()
        };
        let mut dashboard = Dashboard::new(&config);

        for _ in 0..5 {
            dashboard.apply(ConnectionEvent::Message(TICKER.to_string()));
        }

        assert_eq!(dashboard.surfaces().feed.len(), 2);
    }

    #[tokio::test]
    async fn test_drain_applies_in_arrival_order() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut dashboard = Dashboard::new(&DashboardConfig::default());

        tx.send(ConnectionEvent::Opened).await.unwrap();
        tx.send(ConnectionEvent::Message(TICKER.to_string())).await.unwrap();
        tx.send(ConnectionEvent::Closed).await.unwrap();
        tx.send(ConnectionEvent::Reconnecting {
            delay: Duration::from_secs(10),
        })
        .await
        .unwrap();

        assert_eq!(dashboard.drain(&mut rx), 4);
        assert_eq!(
            dashboard.surfaces().header.status(),
            ConnectionStatus::Reconnecting
        );
        assert_eq!(dashboard.surfaces().feed.len(), 1);
        assert!(dashboard.surfaces().header.last_update().is_some());

        assert_eq!(dashboard.drain(&mut rx), 0);
    }
}
