//! Optimization framework: the optimizer trait, run state and callbacks.

pub mod callback;
pub mod optimizer;
pub mod optimizer_state;

// Re-export optimization components
pub use callback::*;
pub use optimizer::*;
pub use optimizer_state::*;
