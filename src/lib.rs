//! Phase-aware exploration of test-rig CSV logs.
//!
//! The library is the dashboard's computational core: loading runs into a
//! read-only [`data::table::Table`], filtering by test phase, resolving hover
//! cross-filters and projecting rows into chart payloads. The `phasescope`
//! binary renders those payloads with egui.

pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod state;
