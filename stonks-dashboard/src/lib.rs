/// Stonks Dashboard - Shared Library
///
/// Terminal dashboard for a personal investment portfolio. A single WebSocket
/// feed from the backend drives every display area:
/// - header: connection status and time of the last update
/// - summary plates, positions, composition, forex and indices tables
/// - live ticker feed, market value line and candlestick charts
/// - collector status counters
///
/// The library includes:
/// - Wire types for the tagged backend events
/// - A reconnecting WebSocket client with ordered lifecycle events
/// - The event router and the view surfaces it updates
/// - Ratatui widgets rendering the surfaces
pub mod shared;

pub use shared::app::Dashboard;
pub use shared::config::{DashboardConfig, PageLocation};
pub use shared::error::{ConfigError, DispatchError};
pub use shared::router::{Decoded, Dispatch, EventRouter, RouterStats, decode, route};
pub use shared::surfaces::{Surfaces, ViewSurface};
pub use shared::types::{
    DailyBar, DashboardEvent, EventKind, ForexQuote, IndexQuote, OhlcBar, OhlcPoint,
    PortfolioSnapshot, Position, StatusEntry, TickerEvent,
};
pub use shared::websocket::{
    ConnectionEvent, ConnectionHandle, ConnectionStatus, WebSocketClient, WebSocketConfig,
};
