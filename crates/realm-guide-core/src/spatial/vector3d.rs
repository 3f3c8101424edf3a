//! Displacements in world or pointer space

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// A 3D displacement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3D {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Same value on every axis
    pub fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Convert a pointer-space translation to a world-space displacement.
    ///
    /// `dampening` scales pointer units to meters; Y flips because pointer
    /// space grows downward.
    pub fn from_pointer(delta: Vector3D, dampening: f32) -> Self {
        Self::new(
            delta.x * dampening,
            -delta.y * dampening,
            delta.z * dampening,
        )
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Self) -> Self::Output {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f32> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f32) -> Self::Output {
        Vector3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
