//! Modeling, optimization and statistical calculators.
//!
//! The modeling calculators all perturb one [`model::ValueModel`]: projected
//! free cash flow discounted at WACC, less invested capital. Monte Carlo
//! samples are drawn from a seeded `ChaCha8Rng` per fixed block, so a run is
//! reproducible for a given seed however rayon schedules the blocks.

pub mod game;
pub mod model;
pub mod monte_carlo;
pub mod optimization;
pub mod scenarios;
pub mod sensitivity;
pub mod simplex;
pub mod statistical;
