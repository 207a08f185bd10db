//! CPU-side chunk meshing: visible-face extraction, incremental face edits,
//! and cross-chunk boundary stitching.
#![forbid(unsafe_code)]

mod build;
mod emit;
mod face;
mod mesh;
mod stitch;
mod vertex;

pub use build::init_chunk_faces;
pub use emit::{emit_block_face, remove_block_face, remove_block_faces};
pub use face::{ALL_FACES, Face};
pub use mesh::{ChunkMesh, FaceQuad, MeshStreams};
pub use stitch::stitch_chunk_boundary;
pub use vertex::PackedVertex;
