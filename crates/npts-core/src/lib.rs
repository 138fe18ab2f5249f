//! Rank-distributed non-periodic tridiagonal solver.
//!
//! Rank-local entry points: `pipeline::precompute_beta_gam`,
//! `solver::nonperiodic_tridiagonal_solver`.
//! Thread-group driver: `driver::distributed_solve`.

pub mod comm;
pub mod domain;
pub mod driver;
pub mod pipeline;
pub mod solver;
