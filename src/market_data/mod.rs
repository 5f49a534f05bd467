pub mod bar;

// Re-export for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar::{Bar, RawBar};
