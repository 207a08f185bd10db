use std::collections::BTreeMap;

use crate::face::{ALL_FACES, Face};
use crate::vertex::PackedVertex;

/// One emitted quad: two triangles, six packed vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceQuad {
    pub verts: [PackedVertex; 6],
    pub water: bool,
}

/// Flattened vertex streams ready for upload; water is drawn separately,
/// back-to-front, after all opaque geometry.
#[derive(Clone, Debug, Default)]
pub struct MeshStreams {
    pub solid: Vec<PackedVertex>,
    pub water: Vec<PackedVertex>,
}

/// Face set of one chunk, keyed by (block index, direction).
///
/// The map key *is* the exclusivity invariant: the mesh can never hold two
/// quads for the same block side, and removal is exact by construction.
/// An ordered map keeps stream output deterministic across rebuilds.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    faces: BTreeMap<(u32, Face), FaceQuad>,
}

impl ChunkMesh {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn has_face(&self, block: u32, face: Face) -> bool {
        self.faces.contains_key(&(block, face))
    }

    /// Inserts or replaces the quad for (block, face).
    #[inline]
    pub fn set_face(&mut self, block: u32, face: Face, quad: FaceQuad) {
        self.faces.insert((block, face), quad);
    }

    /// Removes exactly the one (block, face) quad. Returns whether it existed.
    #[inline]
    pub fn remove_face(&mut self, block: u32, face: Face) -> bool {
        self.faces.remove(&(block, face)).is_some()
    }

    /// Removes all six faces of a block (used when the block itself goes away).
    pub fn remove_block(&mut self, block: u32) {
        for f in ALL_FACES {
            self.faces.remove(&(block, f));
        }
    }

    /// Keys currently present, for assertions and diffing.
    pub fn face_keys(&self) -> Vec<(u32, Face)> {
        self.faces.keys().copied().collect()
    }

    /// Flattens the face set into upload-ready vertex streams.
    pub fn build_streams(&self) -> MeshStreams {
        let mut out = MeshStreams::default();
        for quad in self.faces.values() {
            let dst = if quad.water {
                &mut out.water
            } else {
                &mut out.solid
            };
            dst.extend_from_slice(&quad.verts);
        }
        out
    }
}
