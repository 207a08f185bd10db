//! Chunk block storage and terrain-fill entry point.
#![forbid(unsafe_code)]

use karst_blocks::Block;
use karst_world::{ChunkCoord, World};

/// Flat block array for one full-height chunk column. All index arithmetic
/// goes through [`ChunkBuf::idx`]; nothing else recomputes the layout.
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<Block>,
}

impl ChunkBuf {
    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    /// Inverse of [`ChunkBuf::idx`].
    #[inline]
    pub fn delinearize(&self, idx: usize) -> (usize, usize, usize) {
        let x = idx % self.sx;
        let rest = idx / self.sx;
        let z = rest % self.sz;
        let y = rest / self.sz;
        (x, y, z)
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, b: Block) {
        let i = self.idx(x, y, z);
        self.blocks[i] = b;
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        (
            self.coord.cx * self.sx as i32,
            self.coord.cz * self.sz as i32,
        )
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let (base_x, base_z) = self.origin();
        if wy < 0 || wy >= self.sy as i32 {
            return false;
        }
        wx >= base_x && wx < base_x + self.sx as i32 && wz >= base_z && wz < base_z + self.sz as i32
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (base_x, base_z) = self.origin();
        let lx = (wx - base_x) as usize;
        let ly = wy as usize;
        let lz = (wz - base_z) as usize;
        Some(self.get_local(lx, ly, lz))
    }

    pub fn from_blocks_local(
        coord: ChunkCoord,
        sx: usize,
        sy: usize,
        sz: usize,
        blocks: Vec<Block>,
    ) -> Self {
        let mut b = blocks;
        let expect = sx * sy * sz;
        if b.len() != expect {
            b.resize(expect, Block::AIR);
        }
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: b,
        }
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| *b != Block::AIR)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkGenerateResult {
    pub buf: ChunkBuf,
    pub occupancy: ChunkOccupancy,
}

/// Fills a chunk column from the terrain context. Surface height is sampled
/// once per column, then every cell is classified against it. Block data
/// only; no mesh is produced here.
pub fn generate_chunk_buffer(world: &World, coord: ChunkCoord) -> ChunkGenerateResult {
    let sx = world.chunk_size_x;
    let sy = world.chunk_size_y;
    let sz = world.chunk_size_z;
    let mut blocks = vec![Block::AIR; sx * sy * sz];
    let (base_x, base_z) = world.chunk_origin(coord);
    let ctx = world.make_gen_ctx();

    let mut heights = vec![0i32; sx * sz];
    for z in 0..sz {
        for x in 0..sx {
            heights[z * sx + x] =
                world.surface_height(&ctx, base_x + x as i32, base_z + z as i32);
        }
    }

    let mut has_blocks = false;
    for y in 0..sy {
        for z in 0..sz {
            for x in 0..sx {
                let ty = world.classify(heights[z * sx + x], y as i32);
                if !ty.is_air() {
                    has_blocks = true;
                    blocks[(y * sz + z) * sx + x] = Block::new(ty);
                }
            }
        }
    }

    ChunkGenerateResult {
        buf: ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks,
        },
        occupancy: if has_blocks {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karst_world::WorldGenConfig;

    #[test]
    fn generated_chunk_has_surface_and_air_above() {
        let world = World::new(2, 2, 42, WorldGenConfig::default());
        let res = generate_chunk_buffer(&world, ChunkCoord::new(0, 0));
        assert!(res.occupancy.has_blocks());
        let buf = &res.buf;
        let ctx = world.make_gen_ctx();
        let h = world.surface_height(&ctx, 8, 8);
        assert!(!buf.get_local(8, h as usize, 8).is_air());
        // Directly above the surface is never solid.
        assert!(!buf.get_local(8, h as usize + 1, 8).is_solid());
        // Top of the column is air.
        assert!(buf.get_local(8, buf.sy - 1, 8).is_air());
    }

    #[test]
    fn generation_is_deterministic() {
        let world = World::new(2, 2, 42, WorldGenConfig::default());
        let a = generate_chunk_buffer(&world, ChunkCoord::new(1, 1));
        let b = generate_chunk_buffer(&world, ChunkCoord::new(1, 1));
        assert_eq!(a.buf.blocks, b.buf.blocks);
    }
}
