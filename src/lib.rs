//! Device snapshot collection
//!
//! Collects a fixed catalog of device and environment attributes from
//! independent sources, concurrently and with per-source failure isolation,
//! into one ordered snapshot ready for display or upload.

pub mod attributes;
pub mod cli;
pub mod collectors;
pub mod config;
pub mod models;
pub mod presenter;
pub mod upload;
