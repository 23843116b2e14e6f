use std::collections::VecDeque;

use chrono::{DateTime, Local};

use super::ViewSurface;
use crate::shared::format;
use crate::shared::types::TickerEvent;

/// A ticker stamped with the local time it was received
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub received: DateTime<Local>,
    pub ticker: TickerEvent,
}

impl FeedEntry {
    pub fn time_label(&self) -> String {
        format::clock(&self.received)
    }
}

/// Most recent tickers, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSurface {
    limit: usize,
    latest: VecDeque<FeedEntry>,
}

impl FeedSurface {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            latest: VecDeque::with_capacity(limit.min(64)),
        }
    }

    /// Prepend, dropping whatever falls beyond the limit
    pub fn add_ticker(&mut self, ticker: TickerEvent, received: DateTime<Local>) {
        self.latest.push_front(FeedEntry { received, ticker });
        self.latest.truncate(self.limit);
    }

    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.latest.iter()
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl ViewSurface for FeedSurface {
    type Update = FeedEntry;

    fn update(&mut self, update: FeedEntry) {
        self.add_ticker(update.ticker, update.received);
    }
}
