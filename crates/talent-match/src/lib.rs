//! Talent match scoring: benchmark cohorts, per-variable baselines, and
//! weighted rollups into a ranked list of employees.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod service;
pub mod telemetry;
