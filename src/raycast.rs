use karst_geom::{IVec3, Vec3};

/// March step in world units. Small enough that a ray cannot tunnel through
/// a block corner at the edit distances used here.
pub const RAY_STEP: f32 = 0.1;

/// One sample along a marched ray.
#[derive(Clone, Copy, Debug)]
pub struct RaySample {
    pub world: Vec3,
    pub cell: IVec3,
}

/// Lazy fixed-step voxel traversal of a world-space segment.
///
/// Yields the containing block cell at each step, starting at the origin.
/// A zero-length direction yields no samples at all, so callers never
/// normalize a degenerate vector.
pub struct VoxelMarch {
    pos: Vec3,
    step: Vec3,
    remaining: u32,
}

impl VoxelMarch {
    pub fn new(origin: Vec3, dir: Vec3, max_dist: f32) -> Self {
        let len = dir.length();
        if len < 1e-6 || max_dist <= 0.0 {
            return Self {
                pos: origin,
                step: Vec3::ZERO,
                remaining: 0,
            };
        }
        Self {
            pos: origin,
            step: dir.normalized() * RAY_STEP,
            remaining: (max_dist / RAY_STEP) as u32 + 1,
        }
    }

    /// The per-sample advance vector; the cell one step behind a hit sample
    /// is where a placed block goes.
    #[inline]
    pub fn step(&self) -> Vec3 {
        self.step
    }
}

impl Iterator for VoxelMarch {
    type Item = RaySample;

    fn next(&mut self) -> Option<RaySample> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let sample = RaySample {
            world: self.pos,
            cell: self.pos.floor_ivec(),
        };
        self.pos += self.step;
        Some(sample)
    }
}
