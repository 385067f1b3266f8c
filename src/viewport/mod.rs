//! Windowing over the flattened row list.
//!
//! Row heights are estimated per row kind, so the whole layout is a prefix
//! sum and the visible slice is a pair of binary searches. Nothing here knows
//! how rows are drawn.

mod anchor;
mod columns;
mod layout;
mod metrics;
mod window;

pub use anchor::ScrollAnchor;
pub use columns::{ColumnLayout, LedgerColumn};
pub use layout::{visible_range, RowLayout};
pub use metrics::RowMetrics;
pub use window::{RenderWindow, Viewport, WindowRow};
