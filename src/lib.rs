//! Hedgerow Digest - a folklore and foraging feed aggregator
//!
//! The aggregator fetches a configured list of feeds, keeps the entries that
//! mention a keyword, and writes one JSON snapshot. The catalog loads that
//! snapshot back and filters it for display.

pub mod aggregator;
pub mod article;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod image;
pub mod item;
pub mod keywords;
pub mod snapshot;
pub mod text;
