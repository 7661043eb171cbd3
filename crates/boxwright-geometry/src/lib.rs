pub use truck_geometry::base::{Point2, Point3, Vector2, Vector3};

pub mod placement {
    use super::{Aabb, Point3, Vector3};
    use serde::{Deserialize, Serialize};

    /// Axis-aligned direction a feature is oriented along.
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Axis {
        PosX,
        NegX,
        PosY,
        NegY,
        PosZ,
        NegZ,
    }

    impl Axis {
        pub const fn index(self) -> usize {
            match self {
                Self::PosX | Self::NegX => 0,
                Self::PosY | Self::NegY => 1,
                Self::PosZ | Self::NegZ => 2,
            }
        }

        pub const fn sign(self) -> f64 {
            match self {
                Self::PosX | Self::PosY | Self::PosZ => 1.0,
                Self::NegX | Self::NegY | Self::NegZ => -1.0,
            }
        }

        pub const fn positive(self) -> Self {
            match self {
                Self::PosX | Self::NegX => Self::PosX,
                Self::PosY | Self::NegY => Self::PosY,
                Self::PosZ | Self::NegZ => Self::PosZ,
            }
        }

        pub fn unit(self) -> Vector3 {
            let mut v = Vector3::new(0.0, 0.0, 0.0);
            v[self.index()] = self.sign();
            v
        }

        /// Unit vector perpendicular to this axis, chosen by cyclic order
        /// (X -> Y, Y -> Z, Z -> X) so the frame stays right-handed.
        pub fn perpendicular(self) -> Vector3 {
            let mut v = Vector3::new(0.0, 0.0, 0.0);
            v[(self.index() + 1) % 3] = 1.0;
            v
        }

        pub const fn name(self) -> &'static str {
            match self {
                Self::PosX => "+X",
                Self::NegX => "-X",
                Self::PosY => "+Y",
                Self::NegY => "-Y",
                Self::PosZ => "+Z",
                Self::NegZ => "-Z",
            }
        }
    }

    impl std::fmt::Display for Axis {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.name())
        }
    }

    /// Origin point plus the direction a swept feature extends in.
    #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Placement {
        pub origin: Point3,
        pub axis: Axis,
    }

    impl Placement {
        pub fn new(origin: Point3, axis: Axis) -> Self {
            Self { origin, axis }
        }

        pub fn along_z(x: f64, y: f64, z: f64) -> Self {
            Self::new(Point3::new(x, y, z), Axis::PosZ)
        }

        /// Point reached after travelling `distance` along the axis.
        pub fn end(&self, distance: f64) -> Point3 {
            self.origin + self.axis.unit() * distance
        }

        /// The same placement moved `distance` along its own axis.
        pub fn advanced(&self, distance: f64) -> Self {
            Self::new(self.end(distance), self.axis)
        }

        /// Lower end of a span of `length` along the axis, so the span can be
        /// swept in the positive direction.
        pub fn low_end(&self, length: f64) -> Point3 {
            if self.axis.sign() < 0.0 {
                self.end(length)
            } else {
                self.origin
            }
        }

        pub fn scaled(&self, factor: f64) -> Self {
            Self::new(
                Point3::new(
                    self.origin.x * factor,
                    self.origin.y * factor,
                    self.origin.z * factor,
                ),
                self.axis,
            )
        }

        /// Bounds of a cylinder of `radius` swept `length` along this placement.
        pub fn cylinder_bounds(&self, radius: f64, length: f64) -> Aabb {
            let axis = self.axis.index();
            let mut min = self.origin;
            let mut max = self.origin;
            for i in 0..3 {
                if i == axis {
                    let end = self.end(length)[i];
                    min[i] = self.origin[i].min(end);
                    max[i] = self.origin[i].max(end);
                } else {
                    min[i] -= radius;
                    max[i] += radius;
                }
            }
            Aabb::new(min, max)
        }
    }
}

pub use placement::{Axis, Placement};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    pub fn from_origin_extents(origin: Point3, extents: Vector3) -> Self {
        let far = origin + extents;
        Self::new(
            Point3::new(
                origin.x.min(far.x),
                origin.y.min(far.y),
                origin.z.min(far.z),
            ),
            Point3::new(
                origin.x.max(far.x),
                origin.y.max(far.y),
                origin.z.max(far.z),
            ),
        )
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = *first;
        let mut max = *first;
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self::new(min, max))
    }

    pub fn extents(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self::new(
            Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    /// True when the boxes share a region thicker than `eps` on every axis.
    /// Boxes that only touch along a face do not overlap.
    pub fn overlaps(&self, other: &Self, eps: f64) -> bool {
        (0..3).all(|i| self.min[i] < other.max[i] - eps && self.max[i] > other.min[i] + eps)
    }

    pub fn contains_point(&self, p: Point3, eps: f64) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] - eps && p[i] <= self.max[i] + eps)
    }

    pub fn contains(&self, other: &Self, eps: f64) -> bool {
        self.contains_point(other.min, eps) && self.contains_point(other.max, eps)
    }

    /// Length of the shared interval on one axis, zero when disjoint.
    pub fn overlap_on(&self, other: &Self, axis: usize) -> f64 {
        (self.max[axis].min(other.max[axis]) - self.min[axis].max(other.min[axis])).max(0.0)
    }
}
