//! Valuation and capital budgeting calculators.
//!
//! The pure building blocks ([`tvm`], [`dcf::discount_cash_flows`],
//! [`projection::ProjectionBase`], [`real_options::black_scholes_call`]) are
//! public so the modeling calculators can re-run the same valuation under
//! other assumptions.

pub mod capital_cost;
pub mod dcf;
pub mod projection;
pub mod real_options;
pub mod tvm;
pub mod value_added;
