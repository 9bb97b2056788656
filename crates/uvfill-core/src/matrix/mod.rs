//! Preference matrix storage.
//!
//! - [`dense`]: dense buffer with an explicit observed mask
//! - [`sparse`]: compressed sparse row storage where stored entries are observed

pub mod dense;
pub mod sparse;

pub use dense::DensePreference;
pub use sparse::CsrMatrix;
