//! Rigid-body world: integration, contact solving, pointer dragging
//!
//! Screen coordinates throughout (pixels, y down). One `step` is:
//! forces → pointer pull → contacts → velocity impulses → positions →
//! penetration correction.

use glam::Vec2;

use super::body::{BodyId, BodyOptions, RigidBody};
use super::broad_phase::sweep_and_prune;
use super::collision::{Contact, box_box};

/// Fraction of velocity lost per step to air drag
const AIR_FRICTION: f32 = 0.01;
/// Velocity solver passes per step
const SOLVER_ITERATIONS: u32 = 8;
/// Penetration tolerated before position correction kicks in
const PENETRATION_SLOP: f32 = 0.5;
/// Share of remaining penetration removed each step
const CORRECTION_PERCENT: f32 = 0.4;

/// Spring that drags the grabbed body's anchor toward the pointer
#[derive(Debug, Clone)]
pub struct PointerConstraint {
    /// 0..1, share of the anchor-to-pointer gap closed per step
    pub stiffness: f32,
    pub position: Vec2,
    grab: Option<(BodyId, Vec2)>,
}

impl PointerConstraint {
    pub fn new(stiffness: f32) -> Self {
        Self {
            stiffness: stiffness.clamp(0.0, 1.0),
            position: Vec2::ZERO,
            grab: None,
        }
    }

    pub fn grabbed(&self) -> Option<BodyId> {
        self.grab.map(|(id, _)| id)
    }
}

struct Manifold {
    a: usize,
    b: usize,
    contact: Contact,
}

#[derive(Debug, Clone)]
pub struct World {
    bodies: Vec<RigidBody>,
    pub gravity: Vec2,
    pub pointer: PointerConstraint,
    next_id: u32,
}

impl World {
    pub fn new(gravity: Vec2, pointer_stiffness: f32) -> Self {
        Self {
            bodies: Vec::new(),
            gravity,
            pointer: PointerConstraint::new(pointer_stiffness),
            next_id: 1,
        }
    }

    /// Insert a rectangle centered at `center`
    pub fn add_rectangle(&mut self, center: Vec2, size: Vec2, options: &BodyOptions) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies
            .push(RigidBody::rectangle(id, center, size, options));
        id
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Teleport a body, keeping its velocity
    pub fn set_position(&mut self, id: BodyId, pos: Vec2) -> bool {
        match self.body_mut(id) {
            Some(body) => {
                body.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Grab the topmost dynamic body under `pos`
    pub fn pointer_down(&mut self, pos: Vec2) -> Option<BodyId> {
        self.pointer.position = pos;
        let body = self
            .bodies
            .iter()
            .rev()
            .find(|b| !b.is_static() && b.contains_point(pos, 0.0))?;
        self.pointer.grab = Some((body.id, body.to_local(pos)));
        Some(body.id)
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.pointer.position = pos;
    }

    pub fn pointer_up(&mut self) {
        self.pointer.grab = None;
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let damping = 1.0 - AIR_FRICTION;
        for body in self.bodies.iter_mut().filter(|b| !b.is_static()) {
            body.vel = (body.vel + self.gravity * dt) * damping;
            body.ang_vel *= damping;
        }

        self.apply_pointer(dt);

        let manifolds = self.find_contacts();
        for _ in 0..SOLVER_ITERATIONS {
            for m in &manifolds {
                self.solve_velocity(m, dt);
            }
        }

        for body in self.bodies.iter_mut().filter(|b| !b.is_static()) {
            body.pos += body.vel * dt;
            body.angle += body.ang_vel * dt;
        }

        for m in &manifolds {
            self.correct_position(m);
        }
    }

    fn apply_pointer(&mut self, dt: f32) {
        let Some((id, anchor)) = self.pointer.grab else {
            return;
        };
        let target = self.pointer.position;
        let stiffness = self.pointer.stiffness;
        let Some(body) = self.body_mut(id) else {
            self.pointer.grab = None;
            return;
        };

        let r = body.rotation().rotate(anchor);
        let gap = target - (body.pos + r);
        // Bleed off momentum so the drag settles instead of orbiting the pointer
        body.vel *= 1.0 - stiffness;
        body.ang_vel *= 1.0 - stiffness;
        let impulse = gap * (stiffness / (dt * body.inv_mass()));
        body.apply_impulse(impulse, r);
    }

    fn find_contacts(&self) -> Vec<Manifold> {
        let aabbs: Vec<_> = self.bodies.iter().map(RigidBody::aabb).collect();
        sweep_and_prune(&aabbs)
            .into_iter()
            .filter(|&(a, b)| !(self.bodies[a].is_static() && self.bodies[b].is_static()))
            .filter_map(|(a, b)| {
                box_box(&self.bodies[a], &self.bodies[b]).map(|contact| Manifold { a, b, contact })
            })
            .collect()
    }

    fn pair_mut(&mut self, a: usize, b: usize) -> (&mut RigidBody, &mut RigidBody) {
        debug_assert!(a < b);
        let (head, tail) = self.bodies.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    }

    fn solve_velocity(&mut self, m: &Manifold, dt: f32) {
        let n = m.contact.normal;
        let share = 1.0 / m.contact.points.len() as f32;
        // Below this approach speed, contacts don't bounce (resting on the floor)
        let rest_speed = 2.0 * self.gravity.length() * dt;
        let (a, b) = self.pair_mut(m.a, m.b);
        let restitution = a.restitution.max(b.restitution);
        let friction = a.friction.min(b.friction);

        for &p in &m.contact.points {
            let ra = p - a.pos;
            let rb = p - b.pos;
            let rv = b.velocity_at(rb) - a.velocity_at(ra);
            let vn = rv.dot(n);
            if vn > 0.0 {
                continue;
            }

            let ra_n = ra.perp_dot(n);
            let rb_n = rb.perp_dot(n);
            let k = a.inv_mass()
                + b.inv_mass()
                + ra_n * ra_n * a.inv_inertia()
                + rb_n * rb_n * b.inv_inertia();
            if k <= 0.0 {
                continue;
            }
            let e = if -vn < rest_speed { 0.0 } else { restitution };
            let j = -(1.0 + e) * vn / k * share;
            let impulse = n * j;
            a.apply_impulse(-impulse, ra);
            b.apply_impulse(impulse, rb);

            // Coulomb friction along the contact tangent
            let rv = b.velocity_at(rb) - a.velocity_at(ra);
            let tangent = (rv - n * rv.dot(n)).normalize_or_zero();
            if tangent == Vec2::ZERO {
                continue;
            }
            let ra_t = ra.perp_dot(tangent);
            let rb_t = rb.perp_dot(tangent);
            let kt = a.inv_mass()
                + b.inv_mass()
                + ra_t * ra_t * a.inv_inertia()
                + rb_t * rb_t * b.inv_inertia();
            let jt = (-rv.dot(tangent) / kt * share).clamp(-j * friction, j * friction);
            let friction_impulse = tangent * jt;
            a.apply_impulse(-friction_impulse, ra);
            b.apply_impulse(friction_impulse, rb);
        }
    }

    fn correct_position(&mut self, m: &Manifold) {
        let (a, b) = self.pair_mut(m.a, m.b);
        let total = a.inv_mass() + b.inv_mass();
        if total <= 0.0 {
            return;
        }
        let depth = (m.contact.depth - PENETRATION_SLOP).max(0.0);
        let correction = m.contact.normal * (depth / total * CORRECTION_PERCENT);
        a.pos -= correction * a.inv_mass();
        b.pos += correction * b.inv_mass();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_floor() -> World {
        let mut world = World::new(Vec2::new(0.0, 1000.0), 0.2);
        world.add_rectangle(
            Vec2::new(400.0, 650.0),
            Vec2::new(1600.0, 100.0),
            &BodyOptions::fixed(),
        );
        world
    }

    #[test]
    fn test_free_fall() {
        let mut world = World::new(Vec2::new(0.0, 1000.0), 0.2);
        let id = world.add_rectangle(Vec2::ZERO, Vec2::splat(10.0), &BodyOptions::default());
        world.step(DT);
        let body = world.body(id).unwrap();
        assert!(body.vel.y > 0.0);
        assert!(body.pos.y > 0.0);
        assert_eq!(body.pos.x, 0.0);
    }

    #[test]
    fn test_static_bodies_never_move() {
        let mut world = world_with_floor();
        for _ in 0..60 {
            world.step(DT);
        }
        let floor = &world.bodies()[0];
        assert_eq!(floor.pos, Vec2::new(400.0, 650.0));
    }

    #[test]
    fn test_tile_settles_on_floor() {
        let mut world = world_with_floor();
        let id = world.add_rectangle(
            Vec2::new(400.0, 300.0),
            Vec2::new(120.0, 40.0),
            &BodyOptions::default(),
        );
        for _ in 0..600 {
            world.step(DT);
        }
        let tile = world.body(id).unwrap();
        // Floor top is at y = 600, so a resting tile centers near 580
        assert!((tile.pos.y - 580.0).abs() < 3.0, "tile at {}", tile.pos.y);
        assert!(tile.vel.length() < 5.0);
        assert!(tile.angle.abs() < 0.1);
    }

    #[test]
    fn test_pointer_drags_body() {
        let mut world = World::new(Vec2::ZERO, 0.2);
        let id = world.add_rectangle(Vec2::ZERO, Vec2::splat(40.0), &BodyOptions::default());

        assert_eq!(world.pointer_down(Vec2::new(200.0, 200.0)), None);
        assert_eq!(world.pointer_down(Vec2::ZERO), Some(id));
        world.pointer_move(Vec2::new(100.0, 0.0));
        for _ in 0..120 {
            world.step(DT);
        }
        let body = world.body(id).unwrap();
        assert!((body.pos - Vec2::new(100.0, 0.0)).length() < 5.0);

        world.pointer_up();
        assert_eq!(world.pointer.grabbed(), None);
    }
}
