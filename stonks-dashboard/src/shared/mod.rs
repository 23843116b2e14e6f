/// Shared modules for the Stonks dashboard
pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod router;
pub mod surfaces;
pub mod types;
pub mod websocket;
pub mod widget;
