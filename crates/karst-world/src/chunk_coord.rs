use serde::{Deserialize, Serialize};

/// Key of a full-height chunk column. Chunks span the whole world height,
/// so only the X/Z grid position is tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    /// Chunk containing the world-space block column (wx, wz).
    #[inline]
    pub fn of_world(wx: i32, wz: i32, sx: usize, sz: usize) -> Self {
        Self {
            cx: wx.div_euclid(sx as i32),
            cz: wz.div_euclid(sz as i32),
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dz * dz
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}
