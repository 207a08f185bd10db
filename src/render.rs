use karst_geom::Vec3;
use karst_mesh::PackedVertex;

/// Handle to one pooled GPU vertex buffer. The pool hands these out; the
/// backend maps them to whatever buffer objects it manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferSlot(pub u32);

/// The two buffers a live chunk borrows: opaque geometry and water.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotPair {
    pub solid: BufferSlot,
    pub water: BufferSlot,
}

/// Fixed-capacity pool of buffer slots. Capacity bounds GPU memory to the
/// streaming window: two slots per live chunk plus slack for chunks that are
/// already built while their predecessors await removal.
pub struct BufferPool {
    free: Vec<BufferSlot>,
    capacity: usize,
}

/// Extra slot pairs beyond the live-chunk count, covering the border row
/// that streams in before the opposite row is dropped.
const POOL_SLACK_PAIRS: usize = 8;

impl BufferPool {
    pub fn new(max_live_chunks: usize) -> Self {
        let pairs = max_live_chunks + POOL_SLACK_PAIRS;
        let capacity = pairs * 2;
        let free = (0..capacity as u32).rev().map(BufferSlot).collect();
        Self { free, capacity }
    }

    pub fn acquire_pair(&mut self) -> Option<SlotPair> {
        if self.free.len() < 2 {
            return None;
        }
        let solid = self.free.pop()?;
        let water = self.free.pop()?;
        Some(SlotPair { solid, water })
    }

    pub fn release_pair(&mut self, pair: SlotPair) {
        self.free.push(pair.water);
        self.free.push(pair.solid);
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Seam to the out-of-scope renderer. Upload and draw are only ever called
/// from the main thread; worker threads produce vertex data and nothing else.
pub trait RenderBackend {
    fn upload(&mut self, slot: BufferSlot, verts: &[PackedVertex]);
    fn draw(&mut self, slot: BufferSlot, chunk_origin: Vec3);
}

/// Backend that records calls instead of talking to a GPU. Used by the demo
/// binary and the integration tests.
#[derive(Default)]
pub struct HeadlessBackend {
    pub uploads: usize,
    pub uploaded_verts: usize,
    pub draws: usize,
}

impl RenderBackend for HeadlessBackend {
    fn upload(&mut self, _slot: BufferSlot, verts: &[PackedVertex]) {
        self.uploads += 1;
        self.uploaded_verts += verts.len();
    }

    fn draw(&mut self, _slot: BufferSlot, _chunk_origin: Vec3) {
        self.draws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_is_bounded_and_slots_recycle() {
        let mut pool = BufferPool::new(4);
        let total_pairs = pool.capacity() / 2;
        let mut held = Vec::new();
        for _ in 0..total_pairs {
            held.push(pool.acquire_pair().unwrap());
        }
        assert!(pool.acquire_pair().is_none());
        let pair = held.pop().unwrap();
        pool.release_pair(pair);
        assert_eq!(pool.acquire_pair(), Some(pair));
    }

    #[test]
    fn pair_slots_are_distinct() {
        let mut pool = BufferPool::new(2);
        let a = pool.acquire_pair().unwrap();
        let b = pool.acquire_pair().unwrap();
        assert_ne!(a.solid, a.water);
        assert_ne!(a.solid, b.solid);
        assert_ne!(a.water, b.water);
    }
}
