/// One frame of user input as the camera sees it.
///
/// Whatever front end drives the renderer (a window, a replay file, or the
/// headless binary, which feeds `CameraInput::default()`) fills this in once per
/// frame; `Camera::update` is its only consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    // --- Keyboard (W/S/A/D + Shift) ---
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,

    // --- Mouse ---
    /// Relative movement since the previous frame, in pixels (x right, y down).
    pub mouse_delta: (f32, f32),
    pub left_button: bool,
    pub right_button: bool,
}

impl CameraInput {
    /// True if nothing would move or turn the camera.
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
            && !(self.left_button || self.right_button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_input_is_idle() {
        assert!(CameraInput::default().is_idle());
        let drag = CameraInput {
            left_button: true,
            ..Default::default()
        };
        assert!(!drag.is_idle());
    }
}
