//! SOC triage oracle evaluation
//!
//! Measures how well an automated triage oracle agrees with rule-derived
//! ground truth on security alerts.

pub mod constants;
pub mod logic;
