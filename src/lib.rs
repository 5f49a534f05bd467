// =============================================================================
// VWAP Signal Server
// =============================================================================
//
// Computes a cumulative VWAP and a BUY / SELL / NEUTRAL signal from a batch of
// OHLCV bars and serves the most recent row over HTTP.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod broker;
pub mod engine;
pub mod execution;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod service;
pub mod types;
