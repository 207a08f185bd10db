//! Block types and the texture catalog.
#![forbid(unsafe_code)]

pub mod textures;
pub mod types;

pub use textures::TextureCatalog;
pub use types::{Block, BlockType, FaceRole, TextureId};
