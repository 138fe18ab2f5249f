//! Sequential numerics for the distributed tridiagonal solver.

pub mod recurrence;
pub mod reduced;
pub mod sweep;
pub mod tridiag;
