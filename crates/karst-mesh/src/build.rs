use karst_blocks::{Block, TextureCatalog};
use karst_chunk::ChunkBuf;

use crate::emit::emit_block_face;
use crate::face::Face;
use crate::mesh::ChunkMesh;

/// Builds the full face set for a freshly generated chunk.
///
/// Each axis is swept once, testing every adjacent pair in the forward
/// direction and emitting for whichever side of the pair is visible. The
/// column above the world top counts as air, so surface blocks at the
/// ceiling still get a top face. Faces on the chunk's outer X/Z walls are
/// left out entirely; the boundary stitcher owns those once the neighbor
/// chunk exists.
pub fn init_chunk_faces(textures: &TextureCatalog, buf: &ChunkBuf) -> ChunkMesh {
    let mut mesh = ChunkMesh::new();
    let (sx, sy, sz) = (buf.sx, buf.sy, buf.sz);

    for y in 0..sy {
        for z in 0..sz {
            for x in 0..sx {
                let here = buf.get_local(x, y, z);

                // +Y pair; above the top of the world is open air.
                let above = if y + 1 < sy {
                    buf.get_local(x, y + 1, z)
                } else {
                    Block::AIR
                };
                pair(&mut mesh, textures, buf, (x, y, z), here, above, Face::PosY);

                // +X pair; the x == sx-1 wall belongs to the stitcher.
                if x + 1 < sx {
                    let right = buf.get_local(x + 1, y, z);
                    pair(&mut mesh, textures, buf, (x, y, z), here, right, Face::PosX);
                }

                // +Z pair; the z == sz-1 wall belongs to the stitcher.
                if z + 1 < sz {
                    let front = buf.get_local(x, y, z + 1);
                    pair(&mut mesh, textures, buf, (x, y, z), here, front, Face::PosZ);
                }
            }
        }
    }

    mesh
}

/// Emits for one adjacent pair along `face`'s axis: `here` may show its
/// forward face toward the neighbor, and the neighbor may show its opposite
/// face back toward `here`.
#[inline]
fn pair(
    mesh: &mut ChunkMesh,
    textures: &TextureCatalog,
    buf: &ChunkBuf,
    (x, y, z): (usize, usize, usize),
    here: Block,
    neighbor: Block,
    face: Face,
) {
    if here.ty.emits_face_toward(neighbor.ty) {
        emit_block_face(mesh, textures, buf, x, y, z, face);
    }
    if neighbor.ty.emits_face_toward(here.ty) {
        let (dx, dy, dz) = face.delta();
        let nx = (x as i32 + dx) as usize;
        let ny = (y as i32 + dy) as usize;
        let nz = (z as i32 + dz) as usize;
        emit_block_face(mesh, textures, buf, nx, ny, nz, face.opposite());
    }
}
