//! Rope growth geometry
//!
//! A rope is anchored at its start point, points toward its end point, and
//! grows from zero length to the full distance over the animation.

use glam::Vec2;

use crate::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RopeGeometry {
    pub origin: Vec2,
    pub target: Vec2,
}

impl RopeGeometry {
    pub fn new(origin: Vec2, target: Vec2) -> Self {
        Self { origin, target }
    }

    /// Unit direction, or zero for a rope that starts and ends at one point
    pub fn direction(&self) -> Vec2 {
        (self.target - self.origin).normalize_or_zero()
    }

    pub fn full_length(&self) -> f32 {
        self.origin.distance(self.target)
    }

    /// Rope length at normalized `progress`
    pub fn length_at(&self, progress: f32, ease: Easing) -> f32 {
        self.full_length() * ease.apply(progress)
    }

    /// Position of the growing end
    pub fn tip_at(&self, progress: f32, ease: Easing) -> Vec2 {
        self.origin + self.direction() * self.length_at(progress, ease)
    }

    /// Rotation (radians) that turns "up" (+y) toward the target
    pub fn angle(&self) -> f32 {
        let dir = self.direction();
        if dir == Vec2::ZERO {
            return 0.0;
        }
        -dir.x.atan2(dir.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth() {
        let rope = RopeGeometry::new(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0));
        assert_eq!(rope.full_length(), 50.0);
        assert_eq!(rope.length_at(0.0, Easing::Linear), 0.0);
        assert_eq!(rope.length_at(0.5, Easing::Linear), 25.0);
        assert_eq!(rope.length_at(1.0, Easing::QuadOut), 50.0);
        let tip = rope.tip_at(1.0, Easing::Linear);
        assert!((tip - Vec2::new(30.0, 40.0)).length() < 1e-4);
    }

    #[test]
    fn test_degenerate_rope() {
        let p = Vec2::new(5.0, -5.0);
        let rope = RopeGeometry::new(p, p);
        assert_eq!(rope.direction(), Vec2::ZERO);
        assert_eq!(rope.full_length(), 0.0);
        assert_eq!(rope.tip_at(0.7, Easing::BackOut), p);
        assert_eq!(rope.angle(), 0.0);
    }

    #[test]
    fn test_angle() {
        let up = RopeGeometry::new(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!(up.angle().abs() < 1e-6);
        let right = RopeGeometry::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((right.angle() + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
