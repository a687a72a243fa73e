//! Client-side EAMCET college predictor.
//!
//! The library holds everything shared by the five pages: the API gateway,
//! the TTL cache over browser storage, the result ranking pipeline, the
//! region → district filter and the comparison aggregator. Each binary
//! only mounts one page component from [`pages`].

pub mod api;
pub mod cache;
pub mod chart;
pub mod compare;
pub mod components;
pub mod config;
pub mod directory;
pub mod form;
pub mod pages;
pub mod pipeline;
pub mod record;
pub mod regions;
pub mod state;
pub mod utils;

pub use record::{CollegeRecord, PlacementQuality, SelectionKey};
