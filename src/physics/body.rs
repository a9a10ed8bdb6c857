//! Rigid rectangles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::broad_phase::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Material and mass settings for a new body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyOptions {
    pub restitution: f32,
    pub friction: f32,
    /// Mass per square pixel
    pub density: f32,
    pub is_static: bool,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            restitution: 0.5,
            friction: 0.1,
            density: 0.001,
            is_static: false,
        }
    }
}

impl BodyOptions {
    pub fn fixed() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }
}

/// A box centered on `pos`, rotated by `angle` radians (clockwise on screen)
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub ang_vel: f32,
    pub half_extents: Vec2,
    pub restitution: f32,
    pub friction: f32,
    inv_mass: f32,
    inv_inertia: f32,
}

impl RigidBody {
    pub fn rectangle(id: BodyId, center: Vec2, size: Vec2, options: &BodyOptions) -> Self {
        let size = size.max(Vec2::splat(1.0));
        let (inv_mass, inv_inertia) = if options.is_static {
            (0.0, 0.0)
        } else {
            let mass = (options.density * size.x * size.y).max(f32::EPSILON);
            let inertia = mass * (size.x * size.x + size.y * size.y) / 12.0;
            (1.0 / mass, 1.0 / inertia)
        };
        Self {
            id,
            pos: center,
            vel: Vec2::ZERO,
            angle: 0.0,
            ang_vel: 0.0,
            half_extents: size * 0.5,
            restitution: options.restitution,
            friction: options.friction,
            inv_mass,
            inv_inertia,
        }
    }

    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    pub fn rotation(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Local x and y axes in world space
    pub fn axes(&self) -> [Vec2; 2] {
        let rot = self.rotation();
        [rot, rot.perp()]
    }

    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.pos + self.rotation().rotate(local)
    }

    pub fn to_local(&self, world: Vec2) -> Vec2 {
        let rot = self.rotation();
        // Inverse rotation is the conjugate
        Vec2::new(rot.x, -rot.y).rotate(world - self.pos)
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let h = self.half_extents;
        [
            self.to_world(Vec2::new(-h.x, -h.y)),
            self.to_world(Vec2::new(h.x, -h.y)),
            self.to_world(Vec2::new(h.x, h.y)),
            self.to_world(Vec2::new(-h.x, h.y)),
        ]
    }

    pub fn contains_point(&self, p: Vec2, slop: f32) -> bool {
        let local = self.to_local(p);
        local.x.abs() <= self.half_extents.x + slop && local.y.abs() <= self.half_extents.y + slop
    }

    /// Half-width of the box projected onto `axis`
    pub fn project_radius(&self, axis: Vec2) -> f32 {
        let [ax, ay] = self.axes();
        self.half_extents.x * axis.dot(ax).abs() + self.half_extents.y * axis.dot(ay).abs()
    }

    pub fn aabb(&self) -> Aabb {
        let ext = Vec2::new(
            self.project_radius(Vec2::X),
            self.project_radius(Vec2::Y),
        );
        Aabb::new(self.pos - ext, self.pos + ext)
    }

    /// Velocity of the material point at offset `r` from the center
    pub fn velocity_at(&self, r: Vec2) -> Vec2 {
        self.vel + r.perp() * self.ang_vel
    }

    pub fn apply_impulse(&mut self, impulse: Vec2, r: Vec2) {
        self.vel += impulse * self.inv_mass;
        self.ang_vel += r.perp_dot(impulse) * self.inv_inertia;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_mass_from_density() {
        let body = RigidBody::rectangle(
            BodyId(1),
            Vec2::ZERO,
            Vec2::new(100.0, 50.0),
            &BodyOptions::default(),
        );
        assert!((1.0 / body.inv_mass() - 5.0).abs() < 1e-4);
        assert!(!body.is_static());

        let wall = RigidBody::rectangle(BodyId(2), Vec2::ZERO, Vec2::ONE, &BodyOptions::fixed());
        assert!(wall.is_static());
        assert_eq!(wall.inv_inertia(), 0.0);
    }

    #[test]
    fn test_local_world_roundtrip_rotated() {
        let mut body = RigidBody::rectangle(
            BodyId(1),
            Vec2::new(10.0, 20.0),
            Vec2::new(40.0, 20.0),
            &BodyOptions::default(),
        );
        body.angle = FRAC_PI_2;
        let world = body.to_world(Vec2::new(20.0, 0.0));
        assert!((world - Vec2::new(10.0, 40.0)).length() < 1e-4);
        assert!((body.to_local(world) - Vec2::new(20.0, 0.0)).length() < 1e-4);

        // Rotated a quarter turn the box is 20 wide and 40 tall
        let aabb = body.aabb();
        assert!((aabb.max.x - aabb.min.x - 20.0).abs() < 1e-3);
        assert!((aabb.max.y - aabb.min.y - 40.0).abs() < 1e-3);
        assert!(body.contains_point(Vec2::new(10.0, 38.0), 0.0));
        assert!(!body.contains_point(Vec2::new(28.0, 20.0), 0.0));
    }
}
