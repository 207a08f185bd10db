use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use karst::{HeadlessBackend, Player, WorldState};
use karst_geom::Vec3;
use karst_world::{ChunkCoord, World, WorldGenConfig};

fn settle(state: &mut WorldState, player: &Player) {
    let deadline = Instant::now() + Duration::from_secs(60);
    loop {
        state.update_world(player);
        let (min, max) = state.borders();
        let want = ((max.cx - min.cx + 1) * (max.cz - min.cz + 1)) as usize;
        if state.is_settled() && state.loaded_coords().len() == want {
            return;
        }
        assert!(Instant::now() < deadline, "streaming never settled");
        thread::sleep(Duration::from_millis(5));
    }
}

fn assert_window_exact(state: &WorldState) {
    let (min, max) = state.borders();
    let loaded = state.loaded_coords();
    for c in &loaded {
        assert!(
            c.cx >= min.cx && c.cx <= max.cx && c.cz >= min.cz && c.cz <= max.cz,
            "chunk ({}, {}) outside window", c.cx, c.cz
        );
    }
    for cz in min.cz..=max.cz {
        for cx in min.cx..=max.cx {
            assert!(
                loaded.contains(&ChunkCoord::new(cx, cz)),
                "gap at ({cx}, {cz})"
            );
        }
    }
}

#[test]
fn walking_across_the_border_shifts_the_window() {
    let world = Arc::new(World::new(4, 4, 99, WorldGenConfig::default()));
    let textures = Arc::new(karst_blocks::TextureCatalog::default());
    let mut state = WorldState::new(world.clone(), textures);
    state.init_world();
    assert_window_exact(&state);
    let (min0, _) = state.borders();
    assert_eq!(min0, ChunkCoord::new(0, 0));

    let center = Vec3::new(
        world.world_size_x() as f32 * 0.5,
        90.0,
        world.world_size_z() as f32 * 0.5,
    );
    let mut player = Player::new(center);
    let mut backend = HeadlessBackend::default();

    // Walk east far enough to cross the shift threshold several times.
    for _ in 0..240 {
        player.pos += Vec3::new(0.5, 0.0, 0.0);
        state.update_world(&player);
        state.draw_world(player.eye(), &mut backend);
    }
    settle(&mut state, &player);

    let (min, max) = state.borders();
    assert!(min.cx > 0, "window never shifted east");
    assert_eq!(max.cx - min.cx, 3);
    assert_eq!(max.cz - min.cz, 3);
    assert_window_exact(&state);
    assert!(backend.uploads > 0 && backend.draws > 0);
}

#[test]
fn small_worlds_never_stream() {
    // 2 chunks along each axis puts the shift threshold at zero.
    let world = Arc::new(World::new(2, 2, 7, WorldGenConfig::default()));
    let textures = Arc::new(karst_blocks::TextureCatalog::default());
    let mut state = WorldState::new(world.clone(), textures);
    state.init_world();
    let before = state.borders();

    let mut player = Player::new(Vec3::new(1.0, 90.0, 1.0));
    for _ in 0..20 {
        player.pos += Vec3::new(-1.0, 0.0, 0.0);
        state.update_world(&player);
    }
    assert_eq!(state.borders(), before);
    assert_eq!(state.loaded_coords().len(), 4);
}
