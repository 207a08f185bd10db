use karst_geom::{Aabb, Vec3};

/// Minimal player body: feet position plus a box extent. Physics is out of
/// scope; the box exists so block placement can refuse to entomb the player.
#[derive(Clone, Copy, Debug)]
pub struct Player {
    /// Feet center in world space.
    pub pos: Vec3,
    /// Box extents: width (x), height (y), depth (z).
    pub size: Vec3,
    pub eye_height: f32,
}

impl Player {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            size: Vec3::new(0.6, 1.8, 0.6),
            eye_height: 1.6,
        }
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.pos + Vec3::new(0.0, self.eye_height, 0.0)
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        let half_w = self.size.x * 0.5;
        let half_d = self.size.z * 0.5;
        Aabb::new(
            self.pos - Vec3::new(half_w, 0.0, half_d),
            self.pos + Vec3::new(half_w, self.size.y, half_d),
        )
    }
}
