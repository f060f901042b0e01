//! Request orchestration: fetch from the store concurrently, then hand the
//! materialized rows to the pure correlation and report code.

pub mod devices;
pub mod doors;
pub mod reports;
pub mod sensors;

#[cfg(test)]
pub(crate) mod fixtures;
