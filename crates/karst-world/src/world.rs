use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

use karst_blocks::BlockType;

use crate::ChunkCoord;
use crate::worldgen::WorldGenConfig;

pub const CHUNK_SIZE: usize = 16;
pub const WORLD_HEIGHT: usize = 256;

/// Terrain context shared by generation jobs. Holds the chunk dimensions,
/// the seed, and the vertical levels resolved from config ratios.
pub struct World {
    pub chunk_size_x: usize,
    pub chunk_size_y: usize,
    pub chunk_size_z: usize,
    pub chunks_x: usize,
    pub chunks_z: usize,
    pub seed: i32,
    cfg: WorldGenConfig,
    water_level: i32,
    mountain_level: i32,
    peak_level: i32,
    min_height: i32,
    max_height: i32,
}

impl World {
    pub fn new(chunks_x: usize, chunks_z: usize, seed: i32, cfg: WorldGenConfig) -> Self {
        let sy = WORLD_HEIGHT as f32;
        let level = |ratio: f32| (sy * ratio) as i32;
        let water_level = level(cfg.water.level_ratio);
        let mountain_level = level(cfg.surface.mountain_ratio);
        let peak_level = level(cfg.surface.peak_ratio);
        // Keep at least one block of air headroom and one of floor.
        let min_height = level(cfg.height.min_y_ratio).max(1);
        let max_height = level(cfg.height.max_y_ratio).min(WORLD_HEIGHT as i32 - 2);
        Self {
            chunk_size_x: CHUNK_SIZE,
            chunk_size_y: WORLD_HEIGHT,
            chunk_size_z: CHUNK_SIZE,
            chunks_x,
            chunks_z,
            seed,
            cfg,
            water_level,
            mountain_level,
            peak_level,
            min_height,
            max_height,
        }
    }

    #[inline]
    pub fn world_size_x(&self) -> usize {
        self.chunk_size_x * self.chunks_x
    }

    #[inline]
    pub fn world_size_z(&self) -> usize {
        self.chunk_size_z * self.chunks_z
    }

    #[inline]
    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    #[inline]
    pub fn chunk_origin(&self, coord: ChunkCoord) -> (i32, i32) {
        (
            coord.cx * self.chunk_size_x as i32,
            coord.cz * self.chunk_size_z as i32,
        )
    }

    /// Builds the per-job noise samplers. Each job gets its own set so
    /// workers never share sampler state.
    pub fn make_gen_ctx(&self) -> GenCtx {
        let h = &self.cfg.height;
        let mut base = FastNoiseLite::with_seed(self.seed);
        base.set_noise_type(Some(NoiseType::Perlin));
        base.set_fractal_type(Some(FractalType::FBm));
        base.set_fractal_octaves(Some(h.base_octaves));
        base.set_frequency(Some(h.base_frequency));
        let mut ridge = FastNoiseLite::with_seed(self.seed ^ 99_173);
        ridge.set_noise_type(Some(NoiseType::Perlin));
        ridge.set_fractal_type(Some(FractalType::Ridged));
        ridge.set_fractal_octaves(Some(h.ridge_octaves));
        ridge.set_frequency(Some(h.ridge_frequency));
        let mut detail = FastNoiseLite::with_seed(self.seed ^ 41_337);
        detail.set_noise_type(Some(NoiseType::Perlin));
        detail.set_frequency(Some(h.detail_frequency));
        GenCtx {
            base,
            ridge,
            detail,
        }
    }

    /// Blended surface height for a world-space column. Deterministic for a
    /// given seed and coordinate.
    pub fn surface_height(&self, ctx: &GenCtx, wx: i32, wz: i32) -> i32 {
        let x = wx as f32;
        let z = wz as f32;
        // Each field is remapped from [-1, 1] to [0, 1] before blending.
        let base = ctx.base.get_noise_2d(x, z) * 0.5 + 0.5;
        let ridge = ctx.ridge.get_noise_2d(x, z) * 0.5 + 0.5;
        let detail = ctx.detail.get_noise_2d(x, z) * 0.5 + 0.5;
        let blended = ((base + ridge + detail) / 3.0).clamp(0.0, 1.0);
        let shaped = blended.powf(self.cfg.height.shaping_exponent);
        let span = (self.max_height - self.min_height) as f32;
        (self.min_height + (shaped * span) as i32).clamp(self.min_height, self.max_height)
    }

    /// Vertical stratigraphy for a column with the given surface height.
    pub fn classify(&self, surface: i32, wy: i32) -> BlockType {
        if wy > surface {
            if wy < self.water_level {
                BlockType::Water
            } else {
                BlockType::Air
            }
        } else if wy == surface {
            if surface <= self.water_level + 1 {
                BlockType::Sand
            } else if surface > self.peak_level {
                BlockType::Snow
            } else {
                BlockType::Grass
            }
        } else if wy > surface - self.cfg.surface.topsoil_thickness {
            if surface > self.mountain_level {
                BlockType::Stone
            } else {
                BlockType::Dirt
            }
        } else {
            BlockType::Stone
        }
    }

    /// Convenience sampler for a single world-space block.
    pub fn block_at(&self, ctx: &GenCtx, wx: i32, wy: i32, wz: i32) -> BlockType {
        if wy < 0 || wy >= self.chunk_size_y as i32 {
            return BlockType::Air;
        }
        let surface = self.surface_height(ctx, wx, wz);
        self.classify(surface, wy)
    }
}

/// Per-job noise samplers; cheap to construct, never shared across threads.
pub struct GenCtx {
    pub base: FastNoiseLite,
    pub ridge: FastNoiseLite,
    pub detail: FastNoiseLite,
}
