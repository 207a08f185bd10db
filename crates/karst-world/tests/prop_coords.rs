use karst_world::ChunkCoord;
use proptest::prelude::*;

proptest! {
    // A column's chunk brackets the column: the chunk's origin is at or
    // before it, and the next chunk's origin is strictly past it.
    #[test]
    fn of_world_brackets_the_column(
        wx in -100_000i32..100_000,
        wz in -100_000i32..100_000,
        sx in 1usize..64,
        sz in 1usize..64,
    ) {
        let c = ChunkCoord::of_world(wx, wz, sx, sz);
        let (sx, sz) = (sx as i32, sz as i32);
        prop_assert!(c.cx * sx <= wx && wx < (c.cx + 1) * sx);
        prop_assert!(c.cz * sz <= wz && wz < (c.cz + 1) * sz);
    }

    // Every local cell of a chunk maps back to that chunk.
    #[test]
    fn local_cells_stay_in_their_chunk(
        cx in -1000i32..1000,
        cz in -1000i32..1000,
        lx in 0usize..16,
        lz in 0usize..16,
    ) {
        let coord = ChunkCoord::new(cx, cz);
        let wx = cx * 16 + lx as i32;
        let wz = cz * 16 + lz as i32;
        prop_assert_eq!(ChunkCoord::of_world(wx, wz, 16, 16), coord);
    }

    #[test]
    fn distance_sq_is_symmetric_and_zero_on_self(
        a in (-10_000i32..10_000, -10_000i32..10_000),
        b in (-10_000i32..10_000, -10_000i32..10_000),
    ) {
        let (a, b) = (ChunkCoord::from(a), ChunkCoord::from(b));
        prop_assert_eq!(a.distance_sq(b), b.distance_sq(a));
        prop_assert_eq!(a.distance_sq(a), 0);
    }
}
