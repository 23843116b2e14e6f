use chrono::{DateTime, Local};

use super::ViewSurface;
use crate::shared::websocket::ConnectionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderUpdate {
    Status(ConnectionStatus),
    /// Receipt time of the latest non-status event
    Touched(DateTime<Local>),
}

/// Connection indicator and last update time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderSurface {
    status: ConnectionStatus,
    last_update: Option<DateTime<Local>>,
}

impl HeaderSurface {
    pub fn set_connection_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }

    pub fn bump_last_update(&mut self, now: DateTime<Local>) {
        self.last_update = Some(now);
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }
}

impl ViewSurface for HeaderSurface {
    type Update = HeaderUpdate;

    fn update(&mut self, update: HeaderUpdate) {
        match update {
            HeaderUpdate::Status(status) => self.set_connection_status(status),
            HeaderUpdate::Touched(now) => self.bump_last_update(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_starts_disconnected() {
        let header = HeaderSurface::default();
        assert_eq!(header.status(), ConnectionStatus::Disconnected);
        assert_eq!(header.last_update(), None);
    }

    #[test]
    fn test_header_updates_are_independent() {
        let mut header = HeaderSurface::default();
        let now = Local::now();

        header.update(HeaderUpdate::Touched(now));
        header.update(HeaderUpdate::Status(ConnectionStatus::Connected));

        assert_eq!(header.status(), ConnectionStatus::Connected);
        assert_eq!(header.last_update(), Some(now));
    }
}
