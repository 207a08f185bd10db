use karst_blocks::{Block, BlockType};
use karst_geom::{Aabb, IVec3, Vec3};
use karst_mesh::{ALL_FACES, emit_block_face, remove_block_faces};

use crate::gamestate::{WorldState, lock_chunks};
use crate::player::Player;
use crate::raycast::VoxelMarch;

/// What a triggered ray does at its first solid hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RayMode {
    Remove,
    Place(BlockType),
}

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
    pub max_dist: f32,
}

/// Marches the ray to its first non-air block and applies the edit.
/// Returns true when a block was actually changed. Samples in chunks that
/// are not resident are skipped, not faulted on; a placement that would
/// intersect the player is silently dropped.
pub fn process_ray(state: &mut WorldState, player: &Player, ray: &Ray, mode: RayMode) -> bool {
    let mut march = VoxelMarch::new(ray.origin, ray.dir, ray.max_dist);
    let step = march.step();
    let mut hit = None;
    for sample in &mut march {
        match state.block_at_world(sample.cell) {
            Some(b) if !b.is_air() => {
                hit = Some(sample);
                break;
            }
            _ => {}
        }
    }
    let Some(hit) = hit else {
        return false;
    };

    let changed = match mode {
        RayMode::Remove => remove_block(state, hit.cell),
        RayMode::Place(ty) => {
            // Back up one step so the block lands in the empty cell just in
            // front of the struck surface.
            let place_cell = (hit.world - step).floor_ivec();
            place_block(state, player, place_cell, ty)
        }
    };
    if changed {
        state.rev += 1;
    }
    changed
}

/// Neighbor cell's block type for edit-time face updates. Cells above or
/// below the world and cells in non-resident chunks read as air (exposed).
fn neighbor_type(state: &WorldState, cell: IVec3) -> BlockType {
    state
        .block_at_world(cell)
        .map(|b| b.ty)
        .unwrap_or(BlockType::Air)
}

fn remove_block(state: &mut WorldState, cell: IVec3) -> bool {
    let coord = state.chunk_coord_of(cell);
    let textures = state.textures.clone();
    let sy = state.world.chunk_size_y as i32;

    {
        let mut map = lock_chunks(&state.chunks);
        let Some(entry) = map.get_mut(&coord) else {
            return false;
        };
        let (base_x, base_z) = entry.buf.origin();
        let (lx, ly, lz) = (
            (cell.x - base_x) as usize,
            cell.y as usize,
            (cell.z - base_z) as usize,
        );
        let idx = entry.buf.idx(lx, ly, lz) as u32;
        entry.buf.set_local(lx, ly, lz, Block::AIR);
        remove_block_faces(&mut entry.mesh, idx);
        entry.updated = false;
    }

    // The freed cell exposes whatever surrounds it.
    for face in ALL_FACES {
        let (dx, dy, dz) = face.delta();
        let n = cell + IVec3::new(dx, dy, dz);
        if n.y < 0 || n.y >= sy {
            continue;
        }
        let ncoord = state.chunk_coord_of(n);
        let mut map = lock_chunks(&state.chunks);
        if ncoord == coord {
            let Some(entry) = map.get_mut(&coord) else {
                continue;
            };
            let (base_x, base_z) = entry.buf.origin();
            let (nlx, nly, nlz) = (
                (n.x - base_x) as usize,
                n.y as usize,
                (n.z - base_z) as usize,
            );
            if entry
                .buf
                .get_local(nlx, nly, nlz)
                .ty
                .emits_face_toward(BlockType::Air)
            {
                emit_block_face(
                    &mut entry.mesh,
                    &textures,
                    &entry.buf,
                    nlx,
                    nly,
                    nlz,
                    face.opposite(),
                );
                entry.updated = false;
            }
        } else if map.contains_key(&ncoord) {
            WorldState::stitch_pair(&textures, &mut map, coord, ncoord);
        }
    }

    log::info!(target: "edit", "removed block at ({}, {}, {})", cell.x, cell.y, cell.z);
    true
}

fn place_block(state: &mut WorldState, player: &Player, cell: IVec3, ty: BlockType) -> bool {
    let sy = state.world.chunk_size_y as i32;
    if cell.y < 0 || cell.y >= sy || ty == BlockType::Air {
        return false;
    }
    if Aabb::block_cell(cell).intersects(&player.aabb()) {
        log::debug!(target: "edit", "place at ({}, {}, {}) rejected: inside player", cell.x, cell.y, cell.z);
        return false;
    }
    let coord = state.chunk_coord_of(cell);
    let textures = state.textures.clone();

    {
        let mut map = lock_chunks(&state.chunks);
        let Some(entry) = map.get_mut(&coord) else {
            return false;
        };
        let (base_x, base_z) = entry.buf.origin();
        let (lx, ly, lz) = (
            (cell.x - base_x) as usize,
            cell.y as usize,
            (cell.z - base_z) as usize,
        );
        if !entry.buf.get_local(lx, ly, lz).is_air() {
            return false;
        }
        entry.buf.set_local(lx, ly, lz, Block::new(ty));
        entry.updated = false;
    }

    // Re-derive the six face pairs around the new block.
    for face in ALL_FACES {
        let (dx, dy, dz) = face.delta();
        let n = cell + IVec3::new(dx, dy, dz);
        let ncoord = if n.y < 0 || n.y >= sy {
            coord
        } else {
            state.chunk_coord_of(n)
        };
        let nty = neighbor_type(state, n);
        let mut map = lock_chunks(&state.chunks);
        if ncoord != coord && map.contains_key(&ncoord) {
            // Boundary pair: the stitcher recomputes both walls.
            WorldState::stitch_pair(&textures, &mut map, coord, ncoord);
            continue;
        }
        let Some(entry) = map.get_mut(&coord) else {
            continue;
        };
        let (base_x, base_z) = entry.buf.origin();
        let (lx, ly, lz) = (
            (cell.x - base_x) as usize,
            cell.y as usize,
            (cell.z - base_z) as usize,
        );
        if ty.emits_face_toward(nty) {
            emit_block_face(&mut entry.mesh, &textures, &entry.buf, lx, ly, lz, face);
            entry.updated = false;
        }
        // The neighbor's face toward this cell survives only if it is still
        // visible against the new block.
        if ncoord == coord && n.y >= 0 && n.y < sy {
            let (nlx, nly, nlz) = (
                (n.x - base_x) as usize,
                n.y as usize,
                (n.z - base_z) as usize,
            );
            let nidx = entry.buf.idx(nlx, nly, nlz) as u32;
            if nty.emits_face_toward(ty) {
                emit_block_face(
                    &mut entry.mesh,
                    &textures,
                    &entry.buf,
                    nlx,
                    nly,
                    nlz,
                    face.opposite(),
                );
                entry.updated = false;
            } else if entry.mesh.remove_face(nidx, face.opposite()) {
                entry.updated = false;
            }
        }
    }

    log::info!(target: "edit", "placed {:?} at ({}, {}, {})", ty, cell.x, cell.y, cell.z);
    true
}
