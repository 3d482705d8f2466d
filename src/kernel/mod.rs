//! Kernel specifications and their random projection generators

pub mod laplacian;
pub mod rbf;
pub mod traits;

pub use self::laplacian::*;
pub use self::rbf::*;
pub use self::traits::*;
