use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use hashbrown::{HashMap, HashSet};

use karst_blocks::{Block, TextureCatalog};
use karst_chunk::ChunkBuf;
use karst_geom::{IVec3, Vec3};
use karst_mesh::{ChunkMesh, Face, stitch_chunk_boundary};
use karst_runtime::{BuildJob, JobOut, Runtime};
use karst_world::{ChunkCoord, World};

use crate::player::Player;
use crate::render::{BufferPool, BufferSlot, RenderBackend, SlotPair};

/// One resident chunk: block data, face set, dirty flag, and the buffer
/// slots borrowed from the pool for its lifetime.
pub struct ChunkEntry {
    pub buf: ChunkBuf,
    pub mesh: ChunkMesh,
    /// False means the GPU buffers are stale and the next draw re-uploads.
    pub updated: bool,
    pub solid_verts: usize,
    pub water_verts: usize,
    pub slots: Option<SlotPair>,
}

/// World controller: owns the chunk map, drives streaming, and hands dirty
/// meshes to the render backend.
///
/// The map mutex is the only lock in the system. Workers never take it; they
/// build chunks in their own memory and send them over a channel, so the
/// critical sections here stay short (insert, erase, lookup, and the cheap
/// boundary stitch at insertion).
pub struct WorldState {
    pub tick: u64,
    pub world: Arc<World>,
    pub(crate) textures: Arc<TextureCatalog>,
    pub(crate) runtime: Runtime,
    pub(crate) chunks: Mutex<HashMap<ChunkCoord, ChunkEntry>>,
    /// Inclusive chunk-coordinate window of the streamed world.
    min_chunk: ChunkCoord,
    max_chunk: ChunkCoord,
    /// Border chunks requested but not yet resident.
    pending: HashSet<ChunkCoord>,
    /// Submissions the bounded background lane refused; retried each tick.
    backlog: VecDeque<ChunkCoord>,
    /// Streaming removals batched during the tick, applied after iteration.
    chunks_to_remove: Vec<ChunkCoord>,
    pool: BufferPool,
    pub(crate) rev: u64,
    next_job_id: u64,
}

pub(crate) fn lock_chunks<'a>(
    m: &'a Mutex<HashMap<ChunkCoord, ChunkEntry>>,
) -> MutexGuard<'a, HashMap<ChunkCoord, ChunkEntry>> {
    // A worker holding this lock cannot panic (workers never take it), so a
    // poisoned lock still holds consistent data.
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl WorldState {
    pub fn new(world: Arc<World>, textures: Arc<TextureCatalog>) -> Self {
        let live = world.chunks_x * world.chunks_z;
        let runtime = Runtime::new(world.clone(), textures.clone());
        Self {
            tick: 0,
            min_chunk: ChunkCoord::new(0, 0),
            max_chunk: ChunkCoord::new(world.chunks_x as i32 - 1, world.chunks_z as i32 - 1),
            world,
            textures,
            runtime,
            chunks: Mutex::new(HashMap::new()),
            pending: HashSet::new(),
            backlog: VecDeque::new(),
            chunks_to_remove: Vec::new(),
            pool: BufferPool::new(live),
            rev: 1,
            next_job_id: 0,
        }
    }

    /// Generates the initial chunk grid on the worker pool, blocking until
    /// every chunk is resident, then runs one deterministic stitch pass:
    /// each chunk against its already-processed -X and -Z neighbors, so
    /// every boundary pair is stitched exactly once. Finishes with every
    /// chunk holding pooled buffer slots and marked dirty for first upload.
    pub fn init_world(&mut self) {
        let t0 = Instant::now();
        let cx_n = self.world.chunks_x as i32;
        let cz_n = self.world.chunks_z as i32;
        self.min_chunk = ChunkCoord::new(0, 0);
        self.max_chunk = ChunkCoord::new(cx_n - 1, cz_n - 1);

        let mut to_submit: VecDeque<ChunkCoord> = (0..cz_n)
            .flat_map(|cz| (0..cx_n).map(move |cx| ChunkCoord::new(cx, cz)))
            .collect();
        let total = (cx_n * cz_n) as usize;
        let mut received = 0usize;

        while received < total {
            while let Some(&c) = to_submit.front() {
                if self.submit_bg(c) {
                    to_submit.pop_front();
                } else {
                    break;
                }
            }
            let results = self.runtime.drain_worker_results();
            if results.is_empty() {
                thread::sleep(Duration::from_millis(2));
                continue;
            }
            for out in results {
                received += 1;
                let slots = self.pool.acquire_pair();
                let mut map = lock_chunks(&self.chunks);
                map.insert(
                    out.coord,
                    ChunkEntry {
                        buf: out.buf,
                        mesh: out.mesh,
                        updated: false,
                        solid_verts: 0,
                        water_verts: 0,
                        slots,
                    },
                );
            }
        }

        {
            let mut map = lock_chunks(&self.chunks);
            for cz in 0..cz_n {
                for cx in 0..cx_n {
                    let c = ChunkCoord::new(cx, cz);
                    if cx > 0 {
                        Self::stitch_pair(&self.textures, &mut map, c.offset(-1, 0), c);
                    }
                    if cz > 0 {
                        Self::stitch_pair(&self.textures, &mut map, c.offset(0, -1), c);
                    }
                }
            }
        }

        log::info!(
            target: "stream",
            "init_world: {} chunks resident in {} ms",
            total,
            t0.elapsed().as_millis()
        );
    }

    /// Steady-state streaming tick: absorb finished background builds,
    /// retry refused submissions, shift the window when the player nears a
    /// border, and apply batched removals.
    pub fn update_world(&mut self, player: &Player) {
        self.tick += 1;
        for out in self.runtime.drain_worker_results() {
            self.insert_streamed(out);
        }
        while let Some(&c) = self.backlog.front() {
            if self.submit_bg(c) {
                self.backlog.pop_front();
            } else {
                break;
            }
        }
        // One window mutation in flight at a time.
        if self.pending.is_empty() && self.backlog.is_empty() {
            self.check_borders(player);
        }
        self.apply_removals();
    }

    /// Re-uploads every dirty chunk, draws all opaque geometry, then water
    /// back-to-front by distance to the eye. Main thread only.
    pub fn draw_world(&mut self, eye: Vec3, backend: &mut dyn RenderBackend) {
        let sx = self.world.chunk_size_x as f32;
        let sz = self.world.chunk_size_z as f32;
        let origin_of = |c: &ChunkCoord| Vec3::new(c.cx as f32 * sx, 0.0, c.cz as f32 * sz);

        let mut map = lock_chunks(&self.chunks);
        for entry in map.values_mut() {
            if entry.updated {
                continue;
            }
            let Some(slots) = entry.slots else { continue };
            let streams = entry.mesh.build_streams();
            backend.upload(slots.solid, &streams.solid);
            backend.upload(slots.water, &streams.water);
            entry.solid_verts = streams.solid.len();
            entry.water_verts = streams.water.len();
            entry.updated = true;
        }

        for (coord, entry) in map.iter() {
            let Some(slots) = entry.slots else { continue };
            if entry.solid_verts > 0 {
                backend.draw(slots.solid, origin_of(coord));
            }
        }

        let mut water: Vec<(f32, BufferSlot, Vec3)> = map
            .iter()
            .filter_map(|(coord, entry)| {
                let slots = entry.slots?;
                if entry.water_verts == 0 {
                    return None;
                }
                let origin = origin_of(coord);
                let center = Vec3::new(origin.x + sx * 0.5, eye.y, origin.z + sz * 0.5);
                Some(((center - eye).length(), slots.water, origin))
            })
            .collect();
        water.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (_, slot, origin) in water {
            backend.draw(slot, origin);
        }
    }

    /// Block at a world cell, or None when the cell's chunk is not resident
    /// or the cell is outside the world height. Absent means "no
    /// interaction" to every caller.
    pub fn block_at_world(&self, cell: IVec3) -> Option<Block> {
        if cell.y < 0 || cell.y >= self.world.chunk_size_y as i32 {
            return None;
        }
        let coord = self.chunk_coord_of(cell);
        let map = lock_chunks(&self.chunks);
        map.get(&coord)
            .and_then(|e| e.buf.get_world(cell.x, cell.y, cell.z))
    }

    /// Test probe: whether the mesh currently holds a face for the block at
    /// `cell` pointing in `face`'s direction.
    pub fn face_exists(&self, cell: IVec3, face: Face) -> bool {
        if cell.y < 0 || cell.y >= self.world.chunk_size_y as i32 {
            return false;
        }
        let coord = self.chunk_coord_of(cell);
        let map = lock_chunks(&self.chunks);
        let Some(entry) = map.get(&coord) else {
            return false;
        };
        let (base_x, base_z) = entry.buf.origin();
        let lx = (cell.x - base_x) as usize;
        let lz = (cell.z - base_z) as usize;
        let idx = entry.buf.idx(lx, cell.y as usize, lz) as u32;
        entry.mesh.has_face(idx, face)
    }

    /// Test probe: the full (block index, face) key set of one chunk's mesh.
    pub fn chunk_face_keys(&self, coord: ChunkCoord) -> Vec<(u32, Face)> {
        lock_chunks(&self.chunks)
            .get(&coord)
            .map(|e| e.mesh.face_keys())
            .unwrap_or_default()
    }

    #[inline]
    pub fn chunk_coord_of(&self, cell: IVec3) -> ChunkCoord {
        ChunkCoord::of_world(
            cell.x,
            cell.z,
            self.world.chunk_size_x,
            self.world.chunk_size_z,
        )
    }

    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        lock_chunks(&self.chunks).keys().copied().collect()
    }

    pub fn borders(&self) -> (ChunkCoord, ChunkCoord) {
        (self.min_chunk, self.max_chunk)
    }

    /// True when no streamed chunks are in flight.
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty() && self.backlog.is_empty() && self.chunks_to_remove.is_empty()
    }

    #[inline]
    fn in_borders(&self, c: ChunkCoord) -> bool {
        c.cx >= self.min_chunk.cx
            && c.cx <= self.max_chunk.cx
            && c.cz >= self.min_chunk.cz
            && c.cz <= self.max_chunk.cz
    }

    fn submit_bg(&mut self, coord: ChunkCoord) -> bool {
        self.next_job_id += 1;
        self.runtime.submit_build_job_bg(BuildJob {
            coord,
            rev: self.rev,
            job_id: self.next_job_id,
        })
    }

    fn insert_streamed(&mut self, out: JobOut) {
        let coord = out.coord;
        self.pending.remove(&coord);
        if !self.in_borders(coord) {
            // The window moved on while this build was in flight.
            log::debug!(target: "stream", "[tick {}] dropping stale chunk ({}, {})", self.tick, coord.cx, coord.cz);
            return;
        }
        if lock_chunks(&self.chunks).contains_key(&coord) {
            // A resident (possibly edited) chunk is never clobbered by a
            // regenerated one.
            return;
        }
        let slots = self.pool.acquire_pair();
        if slots.is_none() {
            log::warn!(target: "stream", "[tick {}] buffer pool exhausted at ({}, {})", self.tick, coord.cx, coord.cz);
        }
        log::debug!(
            target: "stream",
            "[tick {}] chunk ({}, {}) built gen={}ms mesh={}ms job={:#x}",
            self.tick, coord.cx, coord.cz, out.t_gen_ms, out.t_mesh_ms, out.job_id
        );
        let mut map = lock_chunks(&self.chunks);
        map.insert(
            coord,
            ChunkEntry {
                buf: out.buf,
                mesh: out.mesh,
                updated: false,
                solid_verts: 0,
                water_verts: 0,
                slots,
            },
        );
        for (dx, dz) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let n = coord.offset(dx, dz);
            if map.contains_key(&n) {
                Self::stitch_pair(&self.textures, &mut map, coord, n);
            }
        }
    }

    fn check_borders(&mut self, player: &Player) {
        let sx = self.world.chunk_size_x as i32;
        let sz = self.world.chunk_size_z as i32;
        // Within this many blocks of a border, the window shifts. Worlds of
        // 2 chunks along an axis get a non-positive threshold: too small to
        // stream, so the window stays put.
        let tx = (sx * (self.world.chunks_x as i32 / 2 - 1)) as f32;
        let tz = (sz * (self.world.chunks_z as i32 / 2 - 1)) as f32;
        let min_wx = (self.min_chunk.cx * sx) as f32;
        let max_wx = ((self.max_chunk.cx + 1) * sx) as f32;
        let min_wz = (self.min_chunk.cz * sz) as f32;
        let max_wz = ((self.max_chunk.cz + 1) * sz) as f32;

        if tx > 0.0 && player.pos.x - min_wx < tx {
            self.shift_border(-1, 0);
        } else if tx > 0.0 && max_wx - player.pos.x < tx {
            self.shift_border(1, 0);
        } else if tz > 0.0 && player.pos.z - min_wz < tz {
            self.shift_border(0, -1);
        } else if tz > 0.0 && max_wz - player.pos.z < tz {
            self.shift_border(0, 1);
        }
    }

    /// Shifts the streaming window one chunk along an axis: requests the new
    /// border row/column and batches the opposite one for removal.
    fn shift_border(&mut self, dx: i32, dz: i32) {
        let (min, max) = (self.min_chunk, self.max_chunk);
        if dx != 0 {
            let new_cx = if dx < 0 { min.cx - 1 } else { max.cx + 1 };
            let drop_cx = if dx < 0 { max.cx } else { min.cx };
            for cz in min.cz..=max.cz {
                let c = ChunkCoord::new(new_cx, cz);
                self.pending.insert(c);
                if !self.submit_bg(c) {
                    self.backlog.push_back(c);
                }
                self.chunks_to_remove.push(ChunkCoord::new(drop_cx, cz));
            }
        } else {
            let new_cz = if dz < 0 { min.cz - 1 } else { max.cz + 1 };
            let drop_cz = if dz < 0 { max.cz } else { min.cz };
            for cx in min.cx..=max.cx {
                let c = ChunkCoord::new(cx, new_cz);
                self.pending.insert(c);
                if !self.submit_bg(c) {
                    self.backlog.push_back(c);
                }
                self.chunks_to_remove.push(ChunkCoord::new(cx, drop_cz));
            }
        }
        self.min_chunk = self.min_chunk.offset(dx, dz);
        self.max_chunk = self.max_chunk.offset(dx, dz);
        log::info!(
            target: "stream",
            "[tick {}] border shift ({}, {}); window ({}, {})..({}, {})",
            self.tick, dx, dz,
            self.min_chunk.cx, self.min_chunk.cz,
            self.max_chunk.cx, self.max_chunk.cz
        );
    }

    fn apply_removals(&mut self) {
        if self.chunks_to_remove.is_empty() {
            return;
        }
        for coord in std::mem::take(&mut self.chunks_to_remove) {
            let removed = lock_chunks(&self.chunks).remove(&coord);
            if let Some(entry) = removed {
                if let Some(slots) = entry.slots {
                    self.pool.release_pair(slots);
                }
                log::debug!(target: "stream", "[tick {}] chunk ({}, {}) removed", self.tick, coord.cx, coord.cz);
            }
            self.pending.remove(&coord);
        }
    }

    /// Restitches one adjacent pair in place and marks both entries dirty.
    /// No-op unless both chunks are resident.
    pub(crate) fn stitch_pair(
        textures: &TextureCatalog,
        map: &mut HashMap<ChunkCoord, ChunkEntry>,
        a: ChunkCoord,
        b: ChunkCoord,
    ) {
        if let Some([ea, eb]) = map.get_many_mut([&a, &b]) {
            if stitch_chunk_boundary(textures, &ea.buf, &mut ea.mesh, &eb.buf, &mut eb.mesh) {
                ea.updated = false;
                eb.updated = false;
            }
        }
    }
}
