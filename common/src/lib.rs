//! Helpers shared by the workspace crates: logging setup, CPU feature
//! detection and rayon utilities.

pub mod cpu_features;
pub mod log_setup;
pub mod parallel;
