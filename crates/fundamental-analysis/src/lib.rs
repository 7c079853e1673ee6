//! Statement-level calculators: structural analysis, financial ratios, cash
//! flow analysis, peer comparison and performance decomposition.
//!
//! Every public calculator has the signature
//! `fn(&CalculationInput<'_>) -> Result<Computation, AnalysisError>` and is
//! bound to its catalog id by the orchestrator's registry.

pub mod cash_flow;
pub mod comparative;
pub mod metric;
pub mod performance;
pub mod ratios;
pub mod structural;
