use std::collections::VecDeque;

use super::{CandlestickSeries, ViewSurface};
use crate::shared::types::OhlcBar;

/// Maximum number of market value points kept for the line chart
pub const MAX_POINTS: usize = 400;

#[derive(Debug, Clone, PartialEq)]
pub enum PlotUpdate {
    /// Full intraday history
    Replace(Vec<OhlcBar>),
    /// The still-forming intraday bar
    Tick(OhlcBar),
}

/// Intraday market value: a bounded line series plus hourly candles
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotSurface {
    line: VecDeque<f64>,
    candles: CandlestickSeries,
}

impl PlotSurface {
    /// Append to the line, evicting the oldest point past [`MAX_POINTS`]
    pub fn add_point(&mut self, value: f64) {
        self.line.push_back(value);
        while self.line.len() > MAX_POINTS {
            self.line.pop_front();
        }
    }

    /// Wholesale replace from a full history: candles as sent, line from their closes
    pub fn set_data(&mut self, bars: Vec<OhlcBar>) {
        let skip = bars.len().saturating_sub(MAX_POINTS);
        self.line = bars.iter().skip(skip).map(|bar| bar.close).collect();
        self.candles.set_data(bars);
    }

    /// Live-update the current candle and extend the line with its close
    pub fn update_last(&mut self, bar: OhlcBar) {
        self.candles.update_last(bar.into());
        self.add_point(bar.close);
    }

    pub fn line(&self) -> &VecDeque<f64> {
        &self.line
    }

    pub fn candles(&self) -> &CandlestickSeries {
        &self.candles
    }
}

impl ViewSurface for PlotSurface {
    type Update = PlotUpdate;

    fn update(&mut self, update: PlotUpdate) {
        match update {
            PlotUpdate::Replace(bars) => self.set_data(bars),
            PlotUpdate::Tick(bar) => self.update_last(bar),
        }
    }
}
