//! Kernel functions and their random feature approximation

pub mod random_features;
pub mod rbf;
pub mod traits;

pub use self::random_features::*;
pub use self::rbf::*;
pub use self::traits::*;
