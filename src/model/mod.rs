//! Linear decision model and the trainable parameter set

pub mod linear;
pub mod params;

pub use self::linear::*;
pub use self::params::*;
