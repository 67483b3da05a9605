//! Mathematical utilities

pub mod aabb;
pub mod axis;
pub mod ray;

pub use aabb::Aabb;
pub use axis::Axis;
pub use ray::Ray;
