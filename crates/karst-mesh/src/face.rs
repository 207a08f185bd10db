use karst_blocks::FaceRole;

/// One of the six cube directions a block face can point.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

pub const ALL_FACES: [Face; 6] = [
    Face::PosY,
    Face::NegY,
    Face::PosX,
    Face::NegX,
    Face::PosZ,
    Face::NegZ,
];

impl Face {
    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `Face` value.
    /// Falls back to `PosY` for out-of-range indices.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        match i {
            0 => Face::PosY,
            1 => Face::NegY,
            2 => Face::PosX,
            3 => Face::NegX,
            4 => Face::PosZ,
            _ => Face::NegZ,
        }
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Face pointing back at this one from the neighbor cell.
    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosZ => Face::NegZ,
            Face::NegZ => Face::PosZ,
        }
    }

    /// Classifies the face into top/bottom/side role for texture lookup.
    #[inline]
    pub fn role(self) -> FaceRole {
        match self {
            Face::PosY => FaceRole::Top,
            Face::NegY => FaceRole::Bottom,
            _ => FaceRole::Side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip_and_opposites() {
        for f in ALL_FACES {
            assert_eq!(Face::from_index(f.index()), f);
            assert_eq!(f.opposite().opposite(), f);
            let (dx, dy, dz) = f.delta();
            let (ox, oy, oz) = f.opposite().delta();
            assert_eq!((dx + ox, dy + oy, dz + oz), (0, 0, 0));
        }
    }
}
