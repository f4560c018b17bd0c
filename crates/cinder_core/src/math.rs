//! Vector math used by emitters and the simulation step.
//!
//! Only the handful of operations particle code needs: component-wise
//! arithmetic, normalisation that tolerates the zero vector, and the
//! perpendicular/cross pair used to build emission cones.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, velocity, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component (vertical)
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Builds a vector by evaluating `f` for axes 0, 1, 2 in that order.
    ///
    /// Emitters rely on the fixed evaluation order so that random draws
    /// land on the same axis every run.
    #[inline]
    pub fn from_fn(mut f: impl FnMut(usize) -> f32) -> Self {
        let x = f(0);
        let y = f(1);
        let z = f(2);
        Self::new(x, y, z)
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Component by axis index; anything past 2 reads as Z.
    #[inline]
    #[must_use]
    pub const fn axis(self, axis: usize) -> f32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Returns the unit vector and the original length.
    ///
    /// The zero vector normalises to itself with length 0.
    #[must_use]
    pub fn normalize_with_length(self) -> (Self, f32) {
        let length = self.length();
        if length > 0.0 {
            (self * (1.0 / length), length)
        } else {
            (Self::ZERO, 0.0)
        }
    }

    /// Unit vector, or zero for the zero vector.
    #[must_use]
    pub fn normalize_or_zero(self) -> Self {
        self.normalize_with_length().0
    }

    /// A unit vector perpendicular to `self`.
    ///
    /// Projects the basis axis along which `self` is smallest onto the plane
    /// whose normal is `self`. `self` need not be normalised but must be
    /// non-zero for the result to be meaningful.
    #[must_use]
    pub fn perpendicular(self) -> Self {
        let mut smallest = 0;
        let mut min_component = f32::MAX;
        for axis in 0..3 {
            let component = self.axis(axis).abs();
            if component < min_component {
                smallest = axis;
                min_component = component;
            }
        }
        let basis = match smallest {
            0 => Self::X,
            1 => Self::Y,
            _ => Self::Z,
        };

        let length_squared = self.length_squared();
        if length_squared == 0.0 {
            return basis;
        }
        let projected = basis - self * (self.dot(basis) / length_squared);
        projected.normalize_or_zero()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}
