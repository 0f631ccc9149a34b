//! Bus feed server for the SETA network in Modena.
//!
//! Proxies the operator's live vehicle and arrival feeds through a
//! declarative normalization rule set, and keeps catalogs of stops, route
//! codes and line numbers built up from what the feeds report.

pub mod arrivals;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod rules;
pub mod scheduler;
pub mod seta;
pub mod vehicles;
pub mod web;
