use super::ViewSurface;
use crate::shared::types::{DailyBar, OhlcPoint};

/// An ordered OHLC series handed to the candlestick renderer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandlestickSeries {
    points: Vec<OhlcPoint>,
}

impl CandlestickSeries {
    /// Wholesale replace
    pub fn set_data<I>(&mut self, bars: I)
    where
        I: IntoIterator,
        I::Item: Into<OhlcPoint>,
    {
        self.points = bars.into_iter().map(Into::into).collect();
    }

    /// Replace the still-forming most recent bar in place.
    /// An empty series adopts the bar as its first point.
    pub fn update_last(&mut self, point: OhlcPoint) {
        match self.points.last_mut() {
            Some(last) => *last = point,
            None => self.points.push(point),
        }
    }

    pub fn points(&self) -> &[OhlcPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&OhlcPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Daily close candles, keyed by calendar date
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyCloseSurface {
    series: CandlestickSeries,
}

impl DailyCloseSurface {
    pub fn set_closes(&mut self, bars: Vec<DailyBar>) {
        self.series.set_data(bars);
    }

    pub fn series(&self) -> &CandlestickSeries {
        &self.series
    }
}

impl ViewSurface for DailyCloseSurface {
    type Update = Vec<DailyBar>;

    fn update(&mut self, update: Vec<DailyBar>) {
        self.set_closes(update);
    }
}
