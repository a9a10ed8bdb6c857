//! Narrow phase: oriented box vs oriented box
//!
//! Separating-axis test over the four face normals picks the axis of least
//! penetration. Contact points are the corners of each box that sit inside
//! the other, which is enough for resting stacks and tumbling tiles.

use glam::Vec2;

use super::body::RigidBody;

/// Corners within this distance of a face still count as touching
const CONTACT_SLOP: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Contact {
    /// Unit normal pointing from body `a` toward body `b`
    pub normal: Vec2,
    pub depth: f32,
    /// One or two world-space contact points
    pub points: Vec<Vec2>,
}

pub fn box_box(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
    let delta = b.pos - a.pos;

    let mut best_depth = f32::INFINITY;
    let mut best_normal = Vec2::ZERO;
    for axis in a.axes().into_iter().chain(b.axes()) {
        let distance = delta.dot(axis);
        let overlap = a.project_radius(axis) + b.project_radius(axis) - distance.abs();
        if overlap <= 0.0 {
            return None;
        }
        if overlap < best_depth {
            best_depth = overlap;
            best_normal = if distance < 0.0 { -axis } else { axis };
        }
    }

    let mut points: Vec<(f32, Vec2)> = b
        .corners()
        .into_iter()
        .filter(|&c| a.contains_point(c, CONTACT_SLOP))
        .chain(
            a.corners()
                .into_iter()
                .filter(|&c| b.contains_point(c, CONTACT_SLOP)),
        )
        // Deeper along the normal first
        .map(|c| ((c - a.pos).dot(best_normal), c))
        .collect();

    if points.is_empty() {
        // Edge crossing edge: use the corner of b furthest against the normal
        let support = b
            .corners()
            .into_iter()
            .min_by(|p, q| p.dot(best_normal).total_cmp(&q.dot(best_normal)))
            .unwrap_or(b.pos);
        points.push((0.0, support));
    }
    points.sort_by(|p, q| p.0.total_cmp(&q.0));
    points.truncate(2);

    Some(Contact {
        normal: best_normal,
        depth: best_depth,
        points: points.into_iter().map(|(_, p)| p).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::{BodyId, BodyOptions};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> RigidBody {
        RigidBody::rectangle(
            BodyId(0),
            Vec2::new(x, y),
            Vec2::new(w, h),
            &BodyOptions::default(),
        )
    }

    #[test]
    fn test_separated_boxes_miss() {
        assert!(box_box(&rect(0.0, 0.0, 10.0, 10.0), &rect(20.0, 0.0, 10.0, 10.0)).is_none());
    }

    #[test]
    fn test_box_resting_on_floor() {
        // Floor top at y = 100, box bottom at y = 102
        let floor = rect(0.0, 150.0, 400.0, 100.0);
        let tile = rect(0.0, 92.0, 40.0, 20.0);
        let contact = box_box(&floor, &tile).unwrap();

        // Normal points from floor up toward the tile (negative y on screen)
        assert!((contact.normal - Vec2::new(0.0, -1.0)).length() < 1e-4);
        assert!((contact.depth - 2.0).abs() < 1e-3);
        assert_eq!(contact.points.len(), 2);
        for p in &contact.points {
            assert!((p.y - 102.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_normal_direction_follows_order() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(8.0, 0.0, 10.0, 10.0);
        let ab = box_box(&a, &b).unwrap();
        let ba = box_box(&b, &a).unwrap();
        assert!(ab.normal.x > 0.9);
        assert!(ba.normal.x < -0.9);
    }

    #[test]
    fn test_rotated_corner_contact() {
        let floor = rect(0.0, 100.0, 400.0, 100.0);
        let mut tile = rect(0.0, 0.0, 20.0, 20.0);
        tile.angle = std::f32::consts::FRAC_PI_4;
        // Diamond with its lowest corner just inside the floor top (y = 50)
        let reach = 10.0 * std::f32::consts::SQRT_2;
        tile.pos = Vec2::new(0.0, 50.0 - reach + 1.0);
        let contact = box_box(&floor, &tile).unwrap();
        assert!((contact.depth - 1.0).abs() < 1e-3);
        assert!(contact.normal.y < -0.99);
        assert_eq!(contact.points.len(), 1);
    }
}
