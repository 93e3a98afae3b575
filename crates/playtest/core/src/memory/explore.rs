use crate::state::Vec3;

/// "Explored in this direction, roughly this far" from some origin.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExploreMemory {
    pub origin: Vec3,
    /// Unit direction on the ground plane.
    pub direction: Vec3,
    pub distance: f32,
    /// Seconds since the memory was created or last merged into.
    pub impression_time: f32,
    pub forget_time: f32,
}

impl ExploreMemory {
    pub fn new(origin: Vec3, direction: Vec3, distance: f32, forget_time: f32) -> Self {
        Self {
            origin,
            direction,
            distance,
            impression_time: 0.0,
            forget_time,
        }
    }

    /// Where the explored leg ends.
    pub fn endpoint(&self) -> Vec3 {
        self.origin + self.direction * self.distance
    }

    /// Same memory when origins are within `pos_threshold` units and the
    /// directions differ by at most `deg_threshold` degrees.
    pub fn is_similar(
        &self,
        origin: Vec3,
        direction: Vec3,
        pos_threshold: f32,
        deg_threshold: f32,
    ) -> bool {
        self.origin.distance_squared(origin) <= pos_threshold * pos_threshold
            && self.direction.angle_deg(direction) <= deg_threshold
    }

    pub fn is_forgotten(&self) -> bool {
        self.impression_time > self.forget_time
    }
}
