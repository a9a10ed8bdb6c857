//! Broad-phase pair finding using sweep-and-prune on the x axis.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

#[derive(Clone, Copy)]
struct Endpoint {
    value: f32,
    index: usize,
    is_min: bool,
}

/// Index pairs `(i, j)` with `i < j` whose boxes overlap
pub fn sweep_and_prune(aabbs: &[Aabb]) -> Vec<(usize, usize)> {
    if aabbs.len() < 2 {
        return Vec::new();
    }

    let mut endpoints: Vec<Endpoint> = Vec::with_capacity(aabbs.len() * 2);
    for (index, aabb) in aabbs.iter().enumerate() {
        endpoints.push(Endpoint {
            value: aabb.min.x,
            index,
            is_min: true,
        });
        endpoints.push(Endpoint {
            value: aabb.max.x,
            index,
            is_min: false,
        });
    }
    // Opening endpoints sort before closing ones at the same x so touching boxes pair up
    endpoints.sort_by(|a, b| a.value.total_cmp(&b.value).then(b.is_min.cmp(&a.is_min)));

    let mut pairs = Vec::new();
    let mut active: Vec<usize> = Vec::new();
    for ep in endpoints {
        if ep.is_min {
            for &other in &active {
                if aabbs[ep.index].overlaps(&aabbs[other]) {
                    pairs.push((ep.index.min(other), ep.index.max(other)));
                }
            }
            active.push(ep.index);
        } else {
            active.retain(|&i| i != ep.index);
        }
    }

    pairs.sort_unstable();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(x0: f32, y0: f32, x1: f32, y1: f32) -> Aabb {
        Aabb::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[test]
    fn test_no_overlap() {
        let pairs = sweep_and_prune(&[aabb(0.0, 0.0, 1.0, 1.0), aabb(2.0, 0.0, 3.0, 1.0)]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_x_overlap_needs_y_overlap() {
        let pairs = sweep_and_prune(&[
            aabb(0.0, 0.0, 2.0, 1.0),
            aabb(1.0, 5.0, 3.0, 6.0),
            aabb(1.5, 0.5, 4.0, 5.5),
        ]);
        assert_eq!(pairs, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_touching_edges_pair() {
        let pairs = sweep_and_prune(&[aabb(0.0, 0.0, 1.0, 1.0), aabb(1.0, 0.0, 2.0, 1.0)]);
        assert_eq!(pairs, vec![(0, 1)]);
    }
}
