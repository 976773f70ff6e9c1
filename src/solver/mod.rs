//! Training loop
//!
//! Minibatch gradient descent over the random feature objective.

pub mod minibatch;

pub use self::minibatch::*;
