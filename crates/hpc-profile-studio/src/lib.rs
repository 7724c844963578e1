//! HPC Profile Studio library
//!
//! Field access, truncation, data preparation and chart rendering for the
//! JSON exports of sampling profiles and performance reports.
//!
//! The `hpc-profile` binary is a thin wrapper over [`commands`].

pub mod chart;
pub mod commands;
pub mod json;
pub mod output;
pub mod report;
pub mod sampling;
pub mod scaling;
pub mod series;
pub mod utils;
