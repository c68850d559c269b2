//! map-roads core
//!
//! Route fetching, road tracking and line rendering for an embedded map view.

pub mod error;
pub mod config;
pub mod geo;
pub mod polyline;
pub mod traits;
pub mod style;
pub mod road;
pub mod manager;
pub mod channel;
pub mod controller;
pub mod osrm;
pub mod osrm_data;
pub mod haversine;
