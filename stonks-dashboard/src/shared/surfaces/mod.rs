//! View surfaces: independent state containers, one per display area
//!
//! Each surface owns its slice of state and is changed only through
//! [`ViewSurface::update`] (or the named operations behind it). No surface
//! reads another; the router is the only place events fan out.

mod candles;
mod feed;
mod header;
mod plot;
mod positions;
mod summary;
mod tables;

pub use candles::{CandlestickSeries, DailyCloseSurface};
pub use feed::{FeedEntry, FeedSurface};
pub use header::{HeaderSurface, HeaderUpdate};
pub use plot::{MAX_POINTS, PlotSurface, PlotUpdate};
pub use positions::PositionsSurface;
pub use summary::{SummarySurface, Totals};
pub use tables::{
    CompositionSurface, ForexSurface, IndicesSurface, StatusSurface, TableSurface,
};

/// Capability the router drives: apply one update to a surface's own state
pub trait ViewSurface {
    type Update;

    fn update(&mut self, update: Self::Update);
}

/// Every surface of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct Surfaces {
    pub header: HeaderSurface,
    pub summary: SummarySurface,
    pub positions: PositionsSurface,
    pub feed: FeedSurface,
    pub plot: PlotSurface,
    pub daily_close: DailyCloseSurface,
    pub indices: IndicesSurface,
    pub forex: ForexSurface,
    pub composition: CompositionSurface,
    pub status: StatusSurface,
}

impl Surfaces {
    pub fn new(feed_limit: usize, tax_rate: f64) -> Self {
        Self {
            header: HeaderSurface::default(),
            summary: SummarySurface::new(tax_rate),
            positions: PositionsSurface::default(),
            feed: FeedSurface::new(feed_limit),
            plot: PlotSurface::default(),
            daily_close: DailyCloseSurface::default(),
            indices: IndicesSurface::default(),
            forex: ForexSurface::default(),
            composition: CompositionSurface::default(),
            status: StatusSurface::default(),
        }
    }
}

impl Default for Surfaces {
    fn default() -> Self {
        Self::new(
            crate::shared::config::DEFAULT_FEED_LIMIT,
            crate::shared::config::DEFAULT_TAX_RATE,
        )
    }
}
