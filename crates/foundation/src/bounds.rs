use serde::{Deserialize, Serialize};

use crate::lnglat::LngLat;

/// Axis-aligned bounding box in lng/lat space.
///
/// Serializes as `[min_lng, min_lat, max_lng, max_lat]`, the layout map
/// surfaces expect for fit-bounds requests.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// The degenerate `[0, 0, 0, 0]` box used when geometry can't be measured.
    pub const fn zero() -> Self {
        Aabb2 {
            min: [0.0, 0.0],
            max: [0.0, 0.0],
        }
    }

    /// Bounding box of every position yielded by `points`.
    ///
    /// Returns `None` when the iterator is empty or any coordinate is not finite.
    pub fn from_points(points: impl IntoIterator<Item = LngLat>) -> Option<Self> {
        let mut out: Option<Aabb2> = None;
        for p in points {
            if !p.is_finite() {
                return None;
            }
            out = Some(match out {
                None => Aabb2::new([p.lng, p.lat], [p.lng, p.lat]),
                Some(b) => b.extended(p),
            });
        }
        out
    }

    pub fn extended(self, p: LngLat) -> Self {
        Aabb2 {
            min: [self.min[0].min(p.lng), self.min[1].min(p.lat)],
            max: [self.max[0].max(p.lng), self.max[1].max(p.lat)],
        }
    }

    /// Per-axis midpoint of the box (not an area-weighted centroid).
    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        )
    }
}

impl From<[f64; 4]> for Aabb2 {
    fn from(b: [f64; 4]) -> Self {
        Aabb2::new([b[0], b[1]], [b[2], b[3]])
    }
}

impl From<Aabb2> for [f64; 4] {
    fn from(b: Aabb2) -> Self {
        [b.min[0], b.min[1], b.max[0], b.max[1]]
    }
}
