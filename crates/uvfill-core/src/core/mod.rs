//! Core traits and types for preference matrix factorization.

pub mod error;
pub mod types;

// Re-export core types
pub use error::*;
pub use types::*;
