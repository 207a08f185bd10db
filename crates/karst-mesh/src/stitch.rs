use karst_blocks::TextureCatalog;
use karst_chunk::ChunkBuf;

use crate::emit::emit_block_face;
use crate::face::Face;
use crate::mesh::ChunkMesh;

/// Reconciles the shared wall between two chunks.
///
/// For every cell pair across the boundary, the face each side should show
/// is recomputed from the visibility rules: emitted if visible, removed if
/// not. Running it again with unchanged blocks is a no-op, so the same call
/// also repairs the wall after a boundary-adjacent edit.
///
/// Returns false (and touches nothing) if the chunks are not X- or
/// Z-adjacent.
pub fn stitch_chunk_boundary(
    textures: &TextureCatalog,
    a_buf: &ChunkBuf,
    a_mesh: &mut ChunkMesh,
    b_buf: &ChunkBuf,
    b_mesh: &mut ChunkMesh,
) -> bool {
    let dx = b_buf.coord.cx - a_buf.coord.cx;
    let dz = b_buf.coord.cz - a_buf.coord.cz;
    match (dx, dz) {
        (1, 0) => stitch_x(textures, a_buf, a_mesh, b_buf, b_mesh),
        (-1, 0) => stitch_x(textures, b_buf, b_mesh, a_buf, a_mesh),
        (0, 1) => stitch_z(textures, a_buf, a_mesh, b_buf, b_mesh),
        (0, -1) => stitch_z(textures, b_buf, b_mesh, a_buf, a_mesh),
        _ => return false,
    }
    true
}

/// `right` sits at `left`'s +X side.
fn stitch_x(
    textures: &TextureCatalog,
    left_buf: &ChunkBuf,
    left_mesh: &mut ChunkMesh,
    right_buf: &ChunkBuf,
    right_mesh: &mut ChunkMesh,
) {
    let lx = left_buf.sx - 1;
    for y in 0..left_buf.sy {
        for z in 0..left_buf.sz {
            let l = left_buf.get_local(lx, y, z);
            let r = right_buf.get_local(0, y, z);
            reconcile(
                textures, left_buf, left_mesh, lx, y, z, Face::PosX,
                l.ty.emits_face_toward(r.ty),
            );
            reconcile(
                textures, right_buf, right_mesh, 0, y, z, Face::NegX,
                r.ty.emits_face_toward(l.ty),
            );
        }
    }
}

/// `front` sits at `back`'s +Z side.
fn stitch_z(
    textures: &TextureCatalog,
    back_buf: &ChunkBuf,
    back_mesh: &mut ChunkMesh,
    front_buf: &ChunkBuf,
    front_mesh: &mut ChunkMesh,
) {
    let bz = back_buf.sz - 1;
    for y in 0..back_buf.sy {
        for x in 0..back_buf.sx {
            let b = back_buf.get_local(x, y, bz);
            let f = front_buf.get_local(x, y, 0);
            reconcile(
                textures, back_buf, back_mesh, x, y, bz, Face::PosZ,
                b.ty.emits_face_toward(f.ty),
            );
            reconcile(
                textures, front_buf, front_mesh, x, y, 0, Face::NegZ,
                f.ty.emits_face_toward(b.ty),
            );
        }
    }
}

#[inline]
fn reconcile(
    textures: &TextureCatalog,
    buf: &ChunkBuf,
    mesh: &mut ChunkMesh,
    x: usize,
    y: usize,
    z: usize,
    face: Face,
    visible: bool,
) {
    if visible {
        emit_block_face(mesh, textures, buf, x, y, z, face);
    } else {
        mesh.remove_face(buf.idx(x, y, z) as u32, face);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::init_chunk_faces;
    use karst_blocks::{Block, BlockType};
    use karst_world::ChunkCoord;

    fn buf_at(coord: ChunkCoord, blocks: &[(usize, usize, usize, BlockType)]) -> ChunkBuf {
        let mut buf = ChunkBuf::from_blocks_local(coord, 4, 8, 4, Vec::new());
        for &(x, y, z, ty) in blocks {
            buf.set_local(x, y, z, Block::new(ty));
        }
        buf
    }

    #[test]
    fn exposed_wall_faces_appear_on_both_sides() {
        // Solid block on A's +X wall, air across the border: A gets its
        // +X face, B gets nothing.
        let a = buf_at(ChunkCoord::new(0, 0), &[(3, 2, 1, BlockType::Stone)]);
        let b = buf_at(ChunkCoord::new(1, 0), &[]);
        let textures = TextureCatalog::default();
        let mut ma = init_chunk_faces(&textures, &a);
        let mut mb = init_chunk_faces(&textures, &b);
        assert!(!ma.has_face(a.idx(3, 2, 1) as u32, Face::PosX));

        assert!(stitch_chunk_boundary(&textures, &a, &mut ma, &b, &mut mb));
        assert!(ma.has_face(a.idx(3, 2, 1) as u32, Face::PosX));
        assert!(mb.is_empty());
    }

    #[test]
    fn touching_solids_show_no_wall_faces() {
        let a = buf_at(ChunkCoord::new(0, 0), &[(3, 2, 1, BlockType::Stone)]);
        let b = buf_at(ChunkCoord::new(1, 0), &[(0, 2, 1, BlockType::Stone)]);
        let textures = TextureCatalog::default();
        let mut ma = init_chunk_faces(&textures, &a);
        let mut mb = init_chunk_faces(&textures, &b);
        stitch_chunk_boundary(&textures, &a, &mut ma, &b, &mut mb);
        assert!(!ma.has_face(a.idx(3, 2, 1) as u32, Face::PosX));
        assert!(!mb.has_face(b.idx(0, 2, 1) as u32, Face::NegX));
    }

    #[test]
    fn stitch_is_idempotent() {
        let a = buf_at(ChunkCoord::new(0, 0), &[(3, 2, 1, BlockType::Stone)]);
        let b = buf_at(ChunkCoord::new(1, 0), &[(0, 3, 1, BlockType::Stone)]);
        let textures = TextureCatalog::default();
        let mut ma = init_chunk_faces(&textures, &a);
        let mut mb = init_chunk_faces(&textures, &b);
        stitch_chunk_boundary(&textures, &a, &mut ma, &b, &mut mb);
        let keys_a = ma.face_keys();
        let keys_b = mb.face_keys();
        stitch_chunk_boundary(&textures, &a, &mut ma, &b, &mut mb);
        assert_eq!(ma.face_keys(), keys_a);
        assert_eq!(mb.face_keys(), keys_b);
    }

    #[test]
    fn restitch_repairs_the_wall_after_an_edit() {
        let a = buf_at(ChunkCoord::new(0, 0), &[(3, 2, 1, BlockType::Stone)]);
        let mut b = buf_at(ChunkCoord::new(1, 0), &[(0, 2, 1, BlockType::Stone)]);
        let textures = TextureCatalog::default();
        let mut ma = init_chunk_faces(&textures, &a);
        let mut mb = init_chunk_faces(&textures, &b);
        stitch_chunk_boundary(&textures, &a, &mut ma, &b, &mut mb);
        assert!(!ma.has_face(a.idx(3, 2, 1) as u32, Face::PosX));

        // Remove B's wall block; restitching must expose A's face again.
        b.set_local(0, 2, 1, Block::AIR);
        mb.remove_block(b.idx(0, 2, 1) as u32);
        stitch_chunk_boundary(&textures, &a, &mut ma, &b, &mut mb);
        assert!(ma.has_face(a.idx(3, 2, 1) as u32, Face::PosX));
    }

    #[test]
    fn z_adjacency_and_argument_order_both_work() {
        let a = buf_at(ChunkCoord::new(0, 0), &[(1, 2, 3, BlockType::Stone)]);
        let b = buf_at(ChunkCoord::new(0, 1), &[]);
        let textures = TextureCatalog::default();
        let mut ma = init_chunk_faces(&textures, &a);
        let mut mb = init_chunk_faces(&textures, &b);
        // Pass the chunks in reverse order; coords decide the orientation.
        assert!(stitch_chunk_boundary(&textures, &b, &mut mb, &a, &mut ma));
        assert!(ma.has_face(a.idx(1, 2, 3) as u32, Face::PosZ));
    }

    #[test]
    fn non_adjacent_chunks_are_rejected() {
        let a = buf_at(ChunkCoord::new(0, 0), &[]);
        let b = buf_at(ChunkCoord::new(2, 0), &[]);
        let d = buf_at(ChunkCoord::new(1, 1), &[]);
        let textures = TextureCatalog::default();
        let mut ma = ChunkMesh::new();
        let mut mb = ChunkMesh::new();
        assert!(!stitch_chunk_boundary(&textures, &a, &mut ma, &b, &mut mb));
        assert!(!stitch_chunk_boundary(&textures, &a, &mut ma, &d, &mut mb));
    }
}
