//! Analytics module - the crash questions and their ranking helpers

mod filters;
mod queries;
mod ranking;

#[cfg(test)]
pub(crate) mod fixtures;

pub use queries::{CrashAnalytics, QueryError, StyleEthnicity};
