//! Bit-packed chunk-local vertex.
//!
//! Layout (LSB first): x 5 bits, y 9 bits, z 5 bits, corner 2 bits,
//! texture id 4 bits, shade 7 bits. Chunk-local x/z reach 16 (a face corner
//! on the far edge lands at coordinate 16), y reaches 256; both fit with
//! headroom. The corner index reconstructs texture coordinates in the
//! shader: u = bit 0, v = bit 1.

const X_BITS: u32 = 5;
const Y_BITS: u32 = 9;
const Z_BITS: u32 = 5;
const CORNER_BITS: u32 = 2;
const TEX_BITS: u32 = 4;
const SHADE_BITS: u32 = 7;

const Y_SHIFT: u32 = X_BITS;
const Z_SHIFT: u32 = Y_SHIFT + Y_BITS;
const CORNER_SHIFT: u32 = Z_SHIFT + Z_BITS;
const TEX_SHIFT: u32 = CORNER_SHIFT + CORNER_BITS;
const SHADE_SHIFT: u32 = TEX_SHIFT + TEX_BITS;

const fn mask(bits: u32) -> u32 {
    (1 << bits) - 1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedVertex(pub u32);

impl PackedVertex {
    #[inline]
    pub fn pack(x: u32, y: u32, z: u32, corner: u32, tex: u32, shade: u32) -> Self {
        debug_assert!(x <= mask(X_BITS));
        debug_assert!(y <= mask(Y_BITS));
        debug_assert!(z <= mask(Z_BITS));
        debug_assert!(corner <= mask(CORNER_BITS));
        debug_assert!(tex <= mask(TEX_BITS));
        debug_assert!(shade <= mask(SHADE_BITS));
        PackedVertex(
            (x & mask(X_BITS))
                | (y & mask(Y_BITS)) << Y_SHIFT
                | (z & mask(Z_BITS)) << Z_SHIFT
                | (corner & mask(CORNER_BITS)) << CORNER_SHIFT
                | (tex & mask(TEX_BITS)) << TEX_SHIFT
                | (shade & mask(SHADE_BITS)) << SHADE_SHIFT,
        )
    }

    #[inline]
    pub fn x(self) -> u32 {
        self.0 & mask(X_BITS)
    }

    #[inline]
    pub fn y(self) -> u32 {
        (self.0 >> Y_SHIFT) & mask(Y_BITS)
    }

    #[inline]
    pub fn z(self) -> u32 {
        (self.0 >> Z_SHIFT) & mask(Z_BITS)
    }

    #[inline]
    pub fn corner(self) -> u32 {
        (self.0 >> CORNER_SHIFT) & mask(CORNER_BITS)
    }

    #[inline]
    pub fn tex(self) -> u32 {
        (self.0 >> TEX_SHIFT) & mask(TEX_BITS)
    }

    #[inline]
    pub fn shade(self) -> u32 {
        (self.0 >> SHADE_SHIFT) & mask(SHADE_BITS)
    }
}
