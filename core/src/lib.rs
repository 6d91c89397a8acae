//! On-call rotation scheduler core.
//!
//! Assigns a weekly primary and two daily backups for every day of a year,
//! balancing workload against the previous year's totals, and rebuilds the
//! aggregate reports whenever the schedule is edited.

pub mod assignment;
pub mod backup;
pub mod calendar;
pub mod command;
pub mod config;
pub mod counts;
pub mod engine;
pub mod error;
pub mod event;
pub mod history;
pub mod primary;
pub mod rng;
pub mod roster;
pub mod store;
pub mod types;
