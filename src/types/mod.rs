//! Core value types

pub mod handle;
pub mod units;
pub mod vector;

pub use handle::Handle;
pub use units::DrawingUnits;
pub use vector::Vector3;
