//! Live train arrivals server.
//!
//! Polls the CTA Train Tracker feed for one station in the background and
//! serves the latest upcoming arrivals per direction from memory.

pub mod cache;
pub mod config;
pub mod cta;
pub mod domain;
pub mod refresh;
pub mod select;
pub mod web;
