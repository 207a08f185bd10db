use karst_blocks::TextureCatalog;
use karst_chunk::ChunkBuf;

use crate::face::Face;
use crate::mesh::{ChunkMesh, FaceQuad};
use crate::vertex::PackedVertex;

/// Per-face quad template in unit-cube space: (dx, dy, dz, u, v) per vertex,
/// two triangles. Winding faces outward.
type FaceTemplate = [(u32, u32, u32, u32, u32); 6];

const TOP: FaceTemplate = [
    (0, 1, 1, 0, 0),
    (1, 1, 1, 1, 0),
    (0, 1, 0, 0, 1),
    (1, 1, 1, 1, 0),
    (1, 1, 0, 1, 1),
    (0, 1, 0, 0, 1),
];
const BOTTOM: FaceTemplate = [
    (0, 0, 1, 0, 0),
    (0, 0, 0, 0, 1),
    (1, 0, 1, 1, 0),
    (1, 0, 0, 1, 1),
    (1, 0, 1, 1, 0),
    (0, 0, 0, 0, 1),
];
const RIGHT: FaceTemplate = [
    (1, 0, 1, 0, 0),
    (1, 0, 0, 1, 0),
    (1, 1, 1, 0, 1),
    (1, 0, 0, 1, 0),
    (1, 1, 0, 1, 1),
    (1, 1, 1, 0, 1),
];
const LEFT: FaceTemplate = [
    (0, 0, 0, 0, 0),
    (0, 0, 1, 1, 0),
    (0, 1, 0, 0, 1),
    (0, 0, 1, 1, 0),
    (0, 1, 1, 1, 1),
    (0, 1, 0, 0, 1),
];
const FRONT: FaceTemplate = [
    (0, 0, 1, 0, 0),
    (1, 0, 1, 1, 0),
    (0, 1, 1, 0, 1),
    (1, 0, 1, 1, 0),
    (1, 1, 1, 1, 1),
    (0, 1, 1, 0, 1),
];
const BACK: FaceTemplate = [
    (0, 0, 0, 0, 0),
    (0, 1, 0, 0, 1),
    (1, 0, 0, 1, 0),
    (1, 0, 0, 1, 0),
    (0, 1, 0, 0, 1),
    (1, 1, 0, 1, 1),
];

#[inline]
fn template(face: Face) -> &'static FaceTemplate {
    match face {
        Face::PosY => &TOP,
        Face::NegY => &BOTTOM,
        Face::PosX => &RIGHT,
        Face::NegX => &LEFT,
        Face::PosZ => &FRONT,
        Face::NegZ => &BACK,
    }
}

/// Directional shade baked into the vertex (7-bit, 127 = full bright).
#[inline]
fn shade(face: Face) -> u32 {
    match face {
        Face::PosY => 127,
        Face::NegY => 55,
        Face::PosX | Face::NegX => 85,
        Face::PosZ | Face::NegZ => 100,
    }
}

#[inline]
fn build_quad(x: usize, y: usize, z: usize, face: Face, tex: u32, water: bool) -> FaceQuad {
    let t = template(face);
    let s = shade(face);
    let mut verts = [PackedVertex(0); 6];
    for (i, &(dx, dy, dz, u, v)) in t.iter().enumerate() {
        let corner = u | (v << 1);
        verts[i] = PackedVertex::pack(
            x as u32 + dx,
            y as u32 + dy,
            z as u32 + dz,
            corner,
            tex,
            s,
        );
    }
    FaceQuad { verts, water }
}

/// Emits (or refreshes) the quad for one side of the block at local
/// (x, y, z). Air cells never get faces. Idempotent: re-emitting replaces
/// the existing quad rather than duplicating it.
pub fn emit_block_face(
    mesh: &mut ChunkMesh,
    textures: &TextureCatalog,
    buf: &ChunkBuf,
    x: usize,
    y: usize,
    z: usize,
    face: Face,
) {
    let b = buf.get_local(x, y, z);
    if b.is_air() {
        return;
    }
    let idx = buf.idx(x, y, z) as u32;
    let tex = textures.texture_id(b.ty, face.role()) as u32;
    mesh.set_face(idx, face, build_quad(x, y, z, face, tex, b.is_water()));
}

/// Removes exactly one (block, face) quad. Returns whether it existed.
pub fn remove_block_face(mesh: &mut ChunkMesh, block: u32, face: Face) -> bool {
    mesh.remove_face(block, face)
}

/// Removes every face the block contributed (block was removed entirely).
pub fn remove_block_faces(mesh: &mut ChunkMesh, block: u32) {
    mesh.remove_block(block);
}

#[cfg(test)]
mod tests {
    use super::*;
    use karst_blocks::{Block, BlockType};
    use karst_world::ChunkCoord;

    fn one_block_buf() -> ChunkBuf {
        let mut buf =
            ChunkBuf::from_blocks_local(ChunkCoord::new(0, 0), 4, 4, 4, Vec::new());
        buf.set_local(1, 2, 3, Block::new(BlockType::Stone));
        buf
    }

    #[test]
    fn emitted_quad_covers_the_cell() {
        let buf = one_block_buf();
        let textures = TextureCatalog::default();
        let mut mesh = ChunkMesh::new();
        emit_block_face(&mut mesh, &textures, &buf, 1, 2, 3, Face::PosY);
        let streams = mesh.build_streams();
        assert_eq!(streams.solid.len(), 6);
        assert!(streams.water.is_empty());
        for v in &streams.solid {
            // Top face: y is the cell top, x/z on the cell edges.
            assert_eq!(v.y(), 3);
            assert!(v.x() == 1 || v.x() == 2);
            assert!(v.z() == 3 || v.z() == 4);
        }
    }

    #[test]
    fn emit_is_idempotent_per_face() {
        let buf = one_block_buf();
        let textures = TextureCatalog::default();
        let mut mesh = ChunkMesh::new();
        emit_block_face(&mut mesh, &textures, &buf, 1, 2, 3, Face::PosY);
        emit_block_face(&mut mesh, &textures, &buf, 1, 2, 3, Face::PosY);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn removal_is_exact() {
        let buf = one_block_buf();
        let textures = TextureCatalog::default();
        let mut mesh = ChunkMesh::new();
        emit_block_face(&mut mesh, &textures, &buf, 1, 2, 3, Face::PosY);
        emit_block_face(&mut mesh, &textures, &buf, 1, 2, 3, Face::NegX);
        let idx = buf.idx(1, 2, 3) as u32;
        assert!(remove_block_face(&mut mesh, idx, Face::PosY));
        assert!(!remove_block_face(&mut mesh, idx, Face::PosY));
        assert!(mesh.has_face(idx, Face::NegX));
    }

    #[test]
    fn air_never_emits() {
        let buf = one_block_buf();
        let textures = TextureCatalog::default();
        let mut mesh = ChunkMesh::new();
        emit_block_face(&mut mesh, &textures, &buf, 0, 0, 0, Face::PosY);
        assert!(mesh.is_empty());
    }

    #[test]
    fn water_quads_land_in_the_transparent_stream() {
        let mut buf =
            ChunkBuf::from_blocks_local(ChunkCoord::new(0, 0), 4, 4, 4, Vec::new());
        buf.set_local(0, 0, 0, Block::new(BlockType::Water));
        let textures = TextureCatalog::default();
        let mut mesh = ChunkMesh::new();
        emit_block_face(&mut mesh, &textures, &buf, 0, 0, 0, Face::PosY);
        let streams = mesh.build_streams();
        assert!(streams.solid.is_empty());
        assert_eq!(streams.water.len(), 6);
    }
}
