//! Circuit builders for the demo algorithms.

pub mod ansatz;
pub mod deutsch;
pub mod shor;
pub mod simon;
