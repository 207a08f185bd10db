use criterion::{Criterion, black_box, criterion_group, criterion_main};

use karst_blocks::TextureCatalog;
use karst_chunk::generate_chunk_buffer;
use karst_mesh::{init_chunk_faces, stitch_chunk_boundary};
use karst_world::{ChunkCoord, World, WorldGenConfig};

fn bench_worldgen(c: &mut Criterion) {
    let mut group = c.benchmark_group("worldgen");
    let world = World::new(2, 2, 1337, WorldGenConfig::default());
    group.bench_function("generate_chunk_buffer_16x256x16", |b| {
        b.iter(|| {
            let res = generate_chunk_buffer(&world, ChunkCoord::new(0, 0));
            black_box(res);
        })
    });
    group.finish();
}

fn bench_init_faces(c: &mut Criterion) {
    let mut group = c.benchmark_group("init_chunk_faces");
    let world = World::new(2, 2, 1337, WorldGenConfig::default());
    let textures = TextureCatalog::default();
    let buf = generate_chunk_buffer(&world, ChunkCoord::new(0, 0)).buf;
    group.bench_function("terrain_16x256x16", |b| {
        b.iter(|| {
            let mesh = init_chunk_faces(&textures, &buf);
            black_box(mesh);
        })
    });
    group.finish();
}

fn bench_stitch(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitch_chunk_boundary");
    let world = World::new(2, 2, 1337, WorldGenConfig::default());
    let textures = TextureCatalog::default();
    let a = generate_chunk_buffer(&world, ChunkCoord::new(0, 0)).buf;
    let b = generate_chunk_buffer(&world, ChunkCoord::new(1, 0)).buf;
    let base_a = init_chunk_faces(&textures, &a);
    let base_b = init_chunk_faces(&textures, &b);
    group.bench_function("x_wall_16x256", |bench| {
        bench.iter(|| {
            let mut ma = base_a.clone();
            let mut mb = base_b.clone();
            stitch_chunk_boundary(&textures, &a, &mut ma, &b, &mut mb);
            black_box((ma, mb));
        })
    });
    group.finish();
}

criterion_group!(benches, bench_worldgen, bench_init_faces, bench_stitch);
criterion_main!(benches);
