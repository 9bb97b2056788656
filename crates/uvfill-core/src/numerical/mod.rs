//! Numerical kernels: loss metrics and residual computation.

pub mod loss;
pub mod residual;

// Re-export numerical utilities
pub use loss::*;
pub use residual::*;
