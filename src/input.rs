/// Edge-triggered button tracking: `pressed` is true only on the frame the
/// button went down. A held button yields exactly one edit, not one per
/// frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonState {
    down: bool,
    pressed: bool,
}

impl ButtonState {
    /// Feed the raw level-triggered state once per frame.
    pub fn update(&mut self, now_down: bool) {
        self.pressed = now_down && !self.down;
        self.down = now_down;
    }

    #[inline]
    pub fn pressed_this_frame(&self) -> bool {
        self.pressed
    }

    #[inline]
    pub fn is_down(&self) -> bool {
        self.down
    }
}
