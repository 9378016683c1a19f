//! Scoring pipeline: skill matcher → hard match ⇒ aggregator ⇐ semantic scorer.
//!
//! Everything here except the semantic scorer is pure and synchronous. All
//! weights and thresholds come from the `ScoringPolicy` passed in.

pub mod aggregator;
pub mod hard_match;
pub mod semantic;
pub mod skill_matcher;
pub mod suggestions;
