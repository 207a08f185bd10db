//! Runtime job queues and worker orchestration for chunk builds.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select, unbounded};
use karst_blocks::TextureCatalog;
use karst_chunk::{ChunkOccupancy, generate_chunk_buffer};
use karst_mesh::{ChunkMesh, init_chunk_faces};
use karst_world::{ChunkCoord, World};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Request to generate and mesh one chunk. `rev` is the world edit revision
/// the requester knew about; stale results are dropped on receipt.
#[derive(Clone, Copy, Debug)]
pub struct BuildJob {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub job_id: u64,
}

/// Finished chunk build. The buffer and mesh were produced entirely in the
/// worker; sending them over the channel hands ownership to the receiver,
/// so no shared state is touched until the controller inserts them.
pub struct JobOut {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub job_id: u64,
    pub buf: karst_chunk::ChunkBuf,
    pub mesh: ChunkMesh,
    pub occupancy: ChunkOccupancy,
    pub kind: JobKind,
    pub t_gen_ms: u32,
    pub t_mesh_ms: u32,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Lane {
    Edit,
    Bg,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobKind {
    Edit,
    Bg,
}

fn process_build_job(
    job: BuildJob,
    lane: Lane,
    world: &World,
    textures: &TextureCatalog,
    tx: &Sender<JobOut>,
) {
    let t0 = Instant::now();
    let generated = generate_chunk_buffer(world, job.coord);
    let t_gen_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;

    let t0 = Instant::now();
    let mesh = if generated.occupancy.has_blocks() {
        init_chunk_faces(textures, &generated.buf)
    } else {
        ChunkMesh::new()
    };
    let t_mesh_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;

    let kind = match lane {
        Lane::Edit => JobKind::Edit,
        Lane::Bg => JobKind::Bg,
    };
    let _ = tx.send(JobOut {
        coord: job.coord,
        rev: job.rev,
        job_id: job.job_id,
        buf: generated.buf,
        mesh,
        occupancy: generated.occupancy,
        kind,
        t_gen_ms,
        t_mesh_ms,
    });
}

/// Fixed worker pool with two intake lanes.
///
/// The edit lane is unbounded and served first so interactive rebuilds never
/// wait behind streaming. The background lane is a bounded queue: when it is
/// full, submission fails and the caller retries on a later tick instead of
/// piling up a thread or a job per pending chunk.
pub struct Runtime {
    job_tx_edit: Sender<BuildJob>,
    job_tx_bg: Sender<BuildJob>,
    res_rx: Receiver<JobOut>,
    _pool: Arc<ThreadPool>,
    q_edit: Arc<AtomicUsize>,
    q_bg: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    pub workers: usize,
}

/// Background queue depth. Streaming submits at most a border row of chunks
/// per tick, so a small multiple of that is plenty.
const BG_QUEUE_CAP: usize = 64;

impl Runtime {
    pub fn new(world: Arc<World>, textures: Arc<TextureCatalog>) -> Self {
        let (job_tx_edit, job_rx_edit) = unbounded::<BuildJob>();
        let (job_tx_bg, job_rx_bg) = bounded::<BuildJob>(BG_QUEUE_CAP);
        let (res_tx, res_rx) = unbounded::<JobOut>();

        // Leave one core for the controller thread.
        let workers = thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1))
            .unwrap_or(3)
            .max(1);

        let q_edit_ctr = Arc::new(AtomicUsize::new(0));
        let q_bg_ctr = Arc::new(AtomicUsize::new(0));
        let inflight_ctr = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("karst-build-{i}"))
                .build()
                .expect("build pool"),
        );
        for _ in 0..workers {
            let edit_rx = job_rx_edit.clone();
            let bg_rx = job_rx_bg.clone();
            let tx = res_tx.clone();
            let world = world.clone();
            let textures = textures.clone();
            let q_edit = q_edit_ctr.clone();
            let q_bg = q_bg_ctr.clone();
            let inflight = inflight_ctr.clone();
            pool.spawn(move || {
                loop {
                    // Drain the edit lane before touching background work.
                    match edit_rx.try_recv() {
                        Ok(job) => {
                            q_edit.fetch_sub(1, Ordering::Relaxed);
                            inflight.fetch_add(1, Ordering::Relaxed);
                            process_build_job(job, Lane::Edit, &world, &textures, &tx);
                            inflight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }
                        Err(crossbeam_channel::TryRecvError::Disconnected) => break,
                        Err(crossbeam_channel::TryRecvError::Empty) => {}
                    }
                    select! {
                        recv(edit_rx) -> res => match res {
                            Ok(job) => {
                                q_edit.fetch_sub(1, Ordering::Relaxed);
                                inflight.fetch_add(1, Ordering::Relaxed);
                                process_build_job(job, Lane::Edit, &world, &textures, &tx);
                                inflight.fetch_sub(1, Ordering::Relaxed);
                            }
                            Err(_) => break,
                        },
                        recv(bg_rx) -> res => match res {
                            Ok(job) => {
                                q_bg.fetch_sub(1, Ordering::Relaxed);
                                inflight.fetch_add(1, Ordering::Relaxed);
                                process_build_job(job, Lane::Bg, &world, &textures, &tx);
                                inflight.fetch_sub(1, Ordering::Relaxed);
                            }
                            Err(_) => break,
                        },
                    }
                }
            });
        }

        log::info!(target: "runtime", "build pool started: {} workers, bg cap {}", workers, BG_QUEUE_CAP);

        Self {
            job_tx_edit,
            job_tx_bg,
            res_rx,
            _pool: pool,
            q_edit: q_edit_ctr,
            q_bg: q_bg_ctr,
            inflight: inflight_ctr,
            workers,
        }
    }

    pub fn submit_build_job_edit(&self, job: BuildJob) {
        self.q_edit.fetch_add(1, Ordering::Relaxed);
        if self.job_tx_edit.send(job).is_err() {
            self.q_edit.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Non-blocking submit. Returns false when the background queue is full;
    /// the caller keeps the chunk pending and resubmits next tick.
    pub fn submit_build_job_bg(&self, job: BuildJob) -> bool {
        match self.job_tx_bg.try_send(job) {
            Ok(()) => {
                self.q_bg.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn drain_worker_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// (queued edit, queued bg, in flight) for logging and backpressure.
    pub fn queue_debug_counts(&self) -> (usize, usize, usize) {
        (
            self.q_edit.load(Ordering::Relaxed),
            self.q_bg.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karst_world::WorldGenConfig;
    use std::time::Duration;

    fn drain_until(rt: &Runtime, want: usize) -> Vec<JobOut> {
        let mut out = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(30);
        while out.len() < want && Instant::now() < deadline {
            out.extend(rt.drain_worker_results());
            thread::sleep(Duration::from_millis(5));
        }
        out
    }

    #[test]
    fn workers_build_all_requested_chunks() {
        let world = Arc::new(World::new(2, 2, 7, WorldGenConfig::default()));
        let textures = Arc::new(TextureCatalog::default());
        let rt = Runtime::new(world.clone(), textures);

        let mut job_id = 0u64;
        for cz in 0..2 {
            for cx in 0..2 {
                job_id += 1;
                assert!(rt.submit_build_job_bg(BuildJob {
                    coord: ChunkCoord::new(cx, cz),
                    rev: 1,
                    job_id,
                }));
            }
        }

        let results = drain_until(&rt, 4);
        assert_eq!(results.len(), 4);
        let mut coords: Vec<_> = results.iter().map(|r| (r.coord.cx, r.coord.cz)).collect();
        coords.sort_unstable();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        for r in &results {
            assert_eq!(r.kind, JobKind::Bg);
            assert!(r.occupancy.has_blocks());
            assert!(!r.mesh.is_empty());
            // Worker output matches a local rebuild from the same seed.
            let local = generate_chunk_buffer(&world, r.coord);
            assert_eq!(local.buf.blocks, r.buf.blocks);
        }
    }

    #[test]
    fn edit_lane_results_are_tagged() {
        let world = Arc::new(World::new(1, 1, 11, WorldGenConfig::default()));
        let rt = Runtime::new(world, Arc::new(TextureCatalog::default()));
        rt.submit_build_job_edit(BuildJob {
            coord: ChunkCoord::new(0, 0),
            rev: 3,
            job_id: 1,
        });
        let results = drain_until(&rt, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, JobKind::Edit);
        assert_eq!(results[0].rev, 3);
    }
}
