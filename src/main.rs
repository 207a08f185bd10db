use std::sync::Arc;

use clap::Parser;
use simplelog::{
    ColorChoice, Config as LogConfig, LevelFilter, SimpleLogger, TermLogger, TerminalMode,
};

use karst::{ButtonState, HeadlessBackend, Player, Ray, RayMode, WorldState, process_ray};
use karst_blocks::{BlockType, TextureCatalog};
use karst_geom::Vec3;
use karst_world::{World, WorldGenConfig};

/// Headless demo loop: streams a world around a walking player and fires a
/// couple of ray edits, standing in for the windowed application.
#[derive(Parser, Debug)]
#[command(name = "karst", about = "voxel world engine demo")]
struct Args {
    /// Terrain seed.
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// Chunks along each horizontal axis.
    #[arg(long, default_value_t = 6)]
    chunks: usize,
    /// Frames to simulate.
    #[arg(long, default_value_t = 240)]
    frames: u32,
    /// Optional TOML worldgen config path.
    #[arg(long)]
    worldgen: Option<std::path::PathBuf>,
}

fn init_logging() {
    let level = LevelFilter::Info;
    if TermLogger::init(
        level,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        let _ = SimpleLogger::init(level, LogConfig::default());
    }
}

fn main() {
    init_logging();
    let args = Args::parse();

    let cfg = match &args.worldgen {
        Some(path) => match WorldGenConfig::from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!(target: "app", "bad worldgen config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => WorldGenConfig::default(),
    };

    let world = Arc::new(World::new(args.chunks, args.chunks, args.seed, cfg));
    let textures = Arc::new(TextureCatalog::default());
    let mut state = WorldState::new(world.clone(), textures);

    let center = Vec3::new(
        world.world_size_x() as f32 * 0.5,
        80.0,
        world.world_size_z() as f32 * 0.5,
    );
    let mut player = Player::new(center);

    state.init_world();
    let mut backend = HeadlessBackend::default();

    let mut remove_btn = ButtonState::default();
    let mut place_btn = ButtonState::default();
    let walk_per_frame = Vec3::new(0.9, 0.0, 0.0);

    for frame in 0..args.frames {
        player.pos += walk_per_frame;

        // Simulated input: one remove early on, one place later. Held for
        // several frames each to exercise the edge trigger.
        remove_btn.update((30..34).contains(&frame));
        place_btn.update((60..64).contains(&frame));

        let down = Ray {
            origin: player.eye(),
            dir: Vec3::new(0.2, -1.0, 0.1),
            max_dist: 96.0,
        };
        if remove_btn.pressed_this_frame() {
            let hit = process_ray(&mut state, &player, &down, RayMode::Remove);
            log::info!(target: "app", "[frame {frame}] remove ray hit={hit}");
        }
        if place_btn.pressed_this_frame() {
            let hit = process_ray(&mut state, &player, &down, RayMode::Place(BlockType::Stone));
            log::info!(target: "app", "[frame {frame}] place ray hit={hit}");
        }

        state.update_world(&player);
        state.draw_world(player.eye(), &mut backend);
    }

    let (min, max) = state.borders();
    log::info!(
        target: "app",
        "done: {} frames, {} chunks live, window ({}, {})..({}, {}), {} uploads / {} draws",
        args.frames,
        state.loaded_coords().len(),
        min.cx, min.cz, max.cx, max.cz,
        backend.uploads,
        backend.draws
    );
}
