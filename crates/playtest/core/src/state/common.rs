use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Stable identifier of a placed level object.
///
/// Perceived entities and memories compare by this identifier only, never by
/// position or type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a simulated playtester.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// Point or direction in level space. `y` is up; the ground plane is `x`/`z`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared distance; preferred for threshold tests.
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Squared distance on the ground plane, ignoring height.
    ///
    /// Agents walk on `x`/`z`, so reach tests (visits, waypoints, goals) use this.
    #[inline]
    pub fn ground_distance_squared(self, other: Self) -> f32 {
        (self - other).flat().length_squared()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len <= f32::EPSILON {
            None
        } else {
            Some(self * (1.0 / len))
        }
    }

    /// Unsigned angle between two directions in degrees (`0..=180`).
    ///
    /// Returns `0.0` when either vector is degenerate.
    pub fn angle_deg(self, other: Self) -> f32 {
        let denom = (self.length_squared() * other.length_squared()).sqrt();
        if denom <= 1e-15 {
            return 0.0;
        }
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }

    /// Projection onto the ground plane.
    #[inline]
    pub fn flat(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Position plus facing of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentPose {
    pub position: Vec3,
    pub facing: Vec3,
}

impl AgentPose {
    pub fn new(position: Vec3, facing: Vec3) -> Self {
        Self { position, facing }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::FORWARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_between_perpendicular_directions() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 1.0);
        assert!((a.angle_deg(b) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn angle_with_zero_vector_is_zero() {
        assert_eq!(Vec3::ZERO.angle_deg(Vec3::FORWARD), 0.0);
    }

    #[test]
    fn normalized_rejects_zero_length() {
        assert!(Vec3::ZERO.normalized().is_none());
        let n = Vec3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
