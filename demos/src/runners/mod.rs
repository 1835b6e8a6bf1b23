//! Runners that drive the simulator from a classical loop.

mod vqe;

pub use vqe::{VqeResult, VqeRunner};
