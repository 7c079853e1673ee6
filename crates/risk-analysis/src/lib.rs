//! Credit, distress and manipulation risk calculators.
//!
//! Scores are deterministic rules over normalized statement ratios; see each
//! module for the published coefficients and cut-offs it applies.

pub mod at_risk;
pub mod credit;
pub mod detection;
pub mod distress;
