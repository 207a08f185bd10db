//! Core block value types and the face-culling transparency rules.

/// Closed set of block kinds the terrain generator can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Grass,
    Dirt,
    Stone,
    Sand,
    Snow,
    Water,
}

impl BlockType {
    /// Solid blocks block movement and occlude neighboring faces.
    /// Air and water are both non-solid for culling, but water still
    /// renders its own surface (see [`BlockType::emits_face_toward`]).
    #[inline]
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Water)
    }

    #[inline]
    pub fn is_water(self) -> bool {
        matches!(self, BlockType::Water)
    }

    #[inline]
    pub fn is_air(self) -> bool {
        matches!(self, BlockType::Air)
    }

    /// Whether a block of this type shows a face toward a neighbor of
    /// type `neighbor`:
    /// - solid shows a face toward anything non-solid (air, water, or a
    ///   missing neighbor treated as air by the caller);
    /// - water shows a face only toward air, never toward solids or
    ///   other water.
    #[inline]
    pub fn emits_face_toward(self, neighbor: BlockType) -> bool {
        if self.is_solid() {
            !neighbor.is_solid()
        } else if self.is_water() {
            neighbor.is_air()
        } else {
            false
        }
    }

    /// Resolves a config key ("grass", "stone", ...) to a block type.
    pub fn from_name(name: &str) -> Option<BlockType> {
        Some(match name {
            "air" => BlockType::Air,
            "grass" => BlockType::Grass,
            "dirt" => BlockType::Dirt,
            "stone" => BlockType::Stone,
            "sand" => BlockType::Sand,
            "snow" => BlockType::Snow,
            "water" => BlockType::Water,
            _ => return None,
        })
    }
}

/// One cell of a chunk. Position is implied by the owning array index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub ty: BlockType,
}

impl Block {
    pub const AIR: Block = Block {
        ty: BlockType::Air,
    };

    #[inline]
    pub const fn new(ty: BlockType) -> Self {
        Self { ty }
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.ty.is_solid()
    }

    #[inline]
    pub fn is_water(self) -> bool {
        self.ty.is_water()
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.ty.is_air()
    }
}

/// Top/bottom/side classification of a cube face for texture lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

/// Texture array layer index; the packed vertex format reserves 4 bits.
pub type TextureId = u8;

pub const MAX_TEXTURE_ID: TextureId = 15;
