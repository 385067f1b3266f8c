//! Account ledger view: a filterable, sortable, groupable account list with
//! lazily loaded transaction detail and a windowed row layout.

pub mod cache;
pub mod config;
pub mod ledger;
pub mod models;
pub mod pipeline;
pub mod rows;
pub mod types;
pub mod viewport;
