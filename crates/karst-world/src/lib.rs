//! World terrain context: chunk coordinates, generation config, noise sampling.
#![forbid(unsafe_code)]

mod chunk_coord;
mod world;
pub mod worldgen;

pub use chunk_coord::ChunkCoord;
pub use world::{GenCtx, World};
pub use worldgen::WorldGenConfig;
