//! Cold Chain API - telemetry correlation, downsampling and reporting for
//! refrigerated storage sensors
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod correlation;
pub mod domain;
pub mod entity;
pub mod error;
pub mod report;
pub mod routes;
pub mod services;
pub mod store;
