//! Application-level configuration.
//!
//! - [`ExecutionParams`]: turn loop control (round trips, timeouts, budgets)

pub mod execution_params;

pub use execution_params::ExecutionParams;
