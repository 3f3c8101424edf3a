//! Spatial primitives for scene placement
//!
//! World space is right-handed, in meters:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Toward the viewer (+) / Away (-)
//!
//! Pointer space is the screen convention: +Y points down. Convert with
//! [`Vector3D::from_pointer`] before adding to world positions.

mod bounds;
mod point3d;
mod quaternion;
mod vector3d;

pub use bounds::Bounds;
pub use point3d::Point3D;
pub use quaternion::Quaternion;
pub use vector3d::Vector3D;
