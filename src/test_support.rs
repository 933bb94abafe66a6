//! Shared helpers for unit tests: scripted dice and a box-wall collision world.

use bevy::prelude::*;

use crate::backend::SpatialQuery;
use crate::collision::CollisionData;
use crate::skill::PercentileRoll;

/// Percentile roller that cycles through a fixed script.
pub(crate) struct FixedRolls {
    rolls: Vec<u32>,
    pub taken: usize,
}

impl FixedRolls {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            taken: 0,
        }
    }

    /// Always roll the same value.
    pub fn always(roll: u32) -> Self {
        Self::new([roll])
    }
}

impl PercentileRoll for FixedRolls {
    fn roll_percent(&mut self) -> u32 {
        let roll = if self.rolls.is_empty() {
            1
        } else {
            self.rolls[self.taken % self.rolls.len()]
        };
        self.taken += 1;
        roll
    }
}

/// Axis-aligned box obstacle.
#[derive(Clone, Copy)]
pub(crate) struct WallBox {
    pub min: Vec3,
    pub max: Vec3,
    pub environment: bool,
}

impl WallBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            environment: true,
        }
    }

    pub fn prop(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            environment: false,
        }
    }
}

/// Collision world made of axis-aligned boxes.
///
/// Capsule casts are resolved in the horizontal plane (a swept circle against
/// the box footprint) with a vertical overlap test, which is exact for the
/// horizontal casts the wall probe performs.
#[derive(Default)]
pub(crate) struct BoxWorld {
    pub boxes: Vec<WallBox>,
}

impl BoxWorld {
    pub fn new(boxes: impl IntoIterator<Item = WallBox>) -> Self {
        Self {
            boxes: boxes.into_iter().collect(),
        }
    }
}

fn ray_box(origin: Vec3, direction: Vec3, b: &WallBox) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let (lo, hi) = (b.min[axis], b.max[axis]);
        if d.abs() < 1e-8 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (mut t0, mut t1) = ((lo - o) / d, (hi - o) / d);
        let mut axis_normal = Vec3::ZERO;
        axis_normal[axis] = -d.signum();
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            normal = axis_normal;
        }
        t_exit = t_exit.min(t1);
    }

    if t_enter > t_exit || t_enter < 0.0 {
        return None;
    }
    Some((t_enter, normal))
}

/// Sweep a circle (horizontal plane) against a rectangle footprint.
fn circle_rect(center: Vec2, direction: Vec2, radius: f32, min: Vec2, max: Vec2) -> Option<(f32, Vec2)> {
    // Already overlapping
    let closest = center.clamp(min, max);
    let offset = center - closest;
    if offset.length() < radius {
        let normal = offset.normalize_or_zero();
        return Some((0.0, normal));
    }

    let mut best: Option<(f32, Vec2)> = None;
    let mut consider = |t: f32, n: Vec2| {
        if t >= 0.0 && best.is_none_or(|(bt, _)| t < bt) {
            best = Some((t, n));
        }
    };

    // Faces pushed out by the radius
    if direction.x.abs() > 1e-8 {
        for (plane, n) in [(min.x - radius, Vec2::NEG_X), (max.x + radius, Vec2::X)] {
            let t = (plane - center.x) / direction.x;
            let y = center.y + direction.y * t;
            if y >= min.y && y <= max.y && direction.dot(n) < 0.0 {
                consider(t, n);
            }
        }
    }
    if direction.y.abs() > 1e-8 {
        for (plane, n) in [(min.y - radius, Vec2::NEG_Y), (max.y + radius, Vec2::Y)] {
            let t = (plane - center.y) / direction.y;
            let x = center.x + direction.x * t;
            if x >= min.x && x <= max.x && direction.dot(n) < 0.0 {
                consider(t, n);
            }
        }
    }

    // Rounded corners
    for corner in [min, Vec2::new(min.x, max.y), Vec2::new(max.x, min.y), max] {
        let m = center - corner;
        let b = m.dot(direction);
        let c = m.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            continue;
        }
        let t = -b - discriminant.sqrt();
        let n = (m + direction * t) / radius;
        consider(t, n);
    }

    best
}

impl SpatialQuery for BoxWorld {
    fn cast_capsule(
        &self,
        origin: Vec3,
        axis: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<CollisionData> {
        let bottom = origin.y.min(origin.y + axis.y) - radius;
        let top = origin.y.max(origin.y + axis.y) + radius;
        let flat = Vec2::new(direction.x, direction.z).normalize_or_zero();
        let center = Vec2::new(origin.x, origin.z);

        self.boxes
            .iter()
            .filter(|b| b.max.y >= bottom && b.min.y <= top)
            .filter_map(|b| {
                let min = Vec2::new(b.min.x, b.min.z);
                let max = Vec2::new(b.max.x, b.max.z);
                circle_rect(center, flat, radius, min, max).map(|(t, n)| (t, n, b))
            })
            .filter(|(t, _, _)| *t <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, n, b)| {
                let swept = center + flat * t - n * radius;
                let point = Vec3::new(swept.x, origin.y + axis.y * 0.5, swept.y);
                CollisionData::new(t, Vec3::new(n.x, 0.0, n.y), point, None)
                    .with_environment(b.environment)
            })
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<CollisionData> {
        let direction = direction.normalize_or_zero();
        self.boxes
            .iter()
            .filter_map(|b| ray_box(origin, direction, b).map(|(t, n)| (t, n, b)))
            .filter(|(t, _, _)| *t <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, n, b)| {
                CollisionData::new(t, n, origin + direction * t, None).with_environment(b.environment)
            })
    }
}

#[test]
fn box_world_ray_hits_nearest_face() {
    let world = BoxWorld::new([WallBox::new(Vec3::new(-5.0, 0.0, 1.0), Vec3::new(5.0, 5.0, 2.0))]);
    let hit = world.cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 3.0).expect("ray should hit");
    assert!((hit.distance - 1.0).abs() < 1e-5);
    assert_eq!(hit.normal, Vec3::NEG_Z);
    assert!(world.cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 0.5).is_none());
    assert!(world.cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, 10.0).is_none());
}

#[test]
fn box_world_capsule_hits_face_and_corner() {
    let world = BoxWorld::new([WallBox::new(Vec3::new(-5.0, 0.0, 1.0), Vec3::new(0.0, 5.0, 2.0))]);

    let face = world
        .cast_capsule(Vec3::new(-1.0, 0.5, 0.5), Vec3::Y, 0.3, Vec3::Z, 1.0)
        .expect("capsule should hit the face");
    assert!((face.distance - 0.2).abs() < 1e-5);
    assert_eq!(face.normal, Vec3::NEG_Z);
    assert!((face.point.z - 1.0).abs() < 1e-5);

    // Past the end of the wall the capsule clips the rounded corner
    let corner = world
        .cast_capsule(Vec3::new(0.2, 0.5, 0.5), Vec3::Y, 0.3, Vec3::Z, 1.0)
        .expect("capsule should hit the corner");
    assert!(corner.normal.x > 0.0 && corner.normal.z < 0.0);
    assert!((corner.point - Vec3::new(0.0, 1.0, 1.0)).length() < 1e-4);
}
