//! Voxel-world engine core: chunk streaming controller, ray-based block
//! editing, and the render-backend seam. Terrain, meshing, and the worker
//! pool live in the `karst-*` member crates.
#![forbid(unsafe_code)]

pub mod edit;
pub mod gamestate;
pub mod input;
pub mod player;
pub mod raycast;
pub mod render;

pub use edit::{Ray, RayMode, process_ray};
pub use gamestate::{ChunkEntry, WorldState};
pub use input::ButtonState;
pub use player::Player;
pub use raycast::{RAY_STEP, RaySample, VoxelMarch};
pub use render::{BufferPool, BufferSlot, HeadlessBackend, RenderBackend, SlotPair};
