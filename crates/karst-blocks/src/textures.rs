//! Texture-id assignment per (block type, face role).
//!
//! The id values are configuration data, not logic: earlier iterations of
//! this lookup drifted when duplicated inline, so the whole mapping lives in
//! one catalog that can be overridden from TOML.

use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::types::{BlockType, FaceRole, MAX_TEXTURE_ID, TextureId};

#[derive(Clone, Copy, Debug, Default)]
struct TextureSet {
    top: TextureId,
    bottom: TextureId,
    side: TextureId,
}

/// Resolved `(BlockType, FaceRole) -> TextureId` table.
#[derive(Clone, Debug)]
pub struct TextureCatalog {
    // Indexed by BlockType discriminant.
    sets: [TextureSet; 7],
}

impl Default for TextureCatalog {
    fn default() -> Self {
        let mut cat = Self {
            sets: [TextureSet::default(); 7],
        };
        cat.set_all(BlockType::Grass, 1);
        cat.set_role(BlockType::Grass, FaceRole::Top, 0);
        cat.set_role(BlockType::Grass, FaceRole::Bottom, 2);
        cat.set_all(BlockType::Dirt, 2);
        cat.set_all(BlockType::Stone, 3);
        cat.set_all(BlockType::Sand, 4);
        cat.set_all(BlockType::Snow, 5);
        cat.set_role(BlockType::Snow, FaceRole::Bottom, 2);
        cat.set_all(BlockType::Water, 6);
        cat
    }
}

impl TextureCatalog {
    #[inline]
    pub fn texture_id(&self, ty: BlockType, role: FaceRole) -> TextureId {
        let set = &self.sets[ty as usize];
        match role {
            FaceRole::Top => set.top,
            FaceRole::Bottom => set.bottom,
            FaceRole::Side => set.side,
        }
    }

    fn set_all(&mut self, ty: BlockType, id: TextureId) {
        self.sets[ty as usize] = TextureSet {
            top: id,
            bottom: id,
            side: id,
        };
    }

    fn set_role(&mut self, ty: BlockType, role: FaceRole, id: TextureId) {
        let set = &mut self.sets[ty as usize];
        match role {
            FaceRole::Top => set.top = id,
            FaceRole::Bottom => set.bottom = id,
            FaceRole::Side => set.side = id,
        }
    }

    /// Loads overrides on top of the defaults. Unknown block names are an
    /// error; ids must fit the packed-vertex texture field.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: TexturesConfig = toml::from_str(toml_str)?;
        let mut cat = TextureCatalog::default();
        let mut entries: Vec<(String, TextureEntry)> = cfg.textures.into_iter().collect();
        // HashMap iteration order is nondeterministic; sort for stable errors.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, entry) in entries {
            let ty = BlockType::from_name(&key)
                .ok_or_else(|| format!("unknown block type in textures config: {key}"))?;
            let (top, bottom, side) = match entry {
                TextureEntry::All(id) => (id, id, id),
                TextureEntry::PerRole { top, bottom, side } => (top, bottom, side),
            };
            for id in [top, bottom, side] {
                if id > MAX_TEXTURE_ID {
                    return Err(format!("texture id {id} out of range for {key}").into());
                }
            }
            cat.set_role(ty, FaceRole::Top, top);
            cat.set_role(ty, FaceRole::Bottom, bottom);
            cat.set_role(ty, FaceRole::Side, side);
        }
        Ok(cat)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

// --- Config ---

#[derive(Deserialize)]
struct TexturesConfig {
    textures: HashMap<String, TextureEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextureEntry {
    // Simple: grass = 3
    All(TextureId),
    // Detailed: grass = { top = 0, bottom = 2, side = 1 }
    PerRole {
        top: TextureId,
        bottom: TextureId,
        side: TextureId,
    },
}
