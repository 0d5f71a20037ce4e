//! Core library for the Romanishan Reciprocity assessment service: question
//! script, interview session, scoring, report rendering, persistence ports,
//! and the HTTP surface that exposes them.

pub mod assessment;
pub mod auth;
pub mod config;
pub mod error;
pub mod records;
pub mod telemetry;
