use crate::core::color::{pack_rgb, unpack_rgb};
use nalgebra::Vector3;

/// A 2D buffer containing packed color and per-pixel depth.
///
/// Frame-scoped: `clear` resets depth to +infinity and color to the
/// background at the start of every frame.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    /// Packed 0RGB, 8 bits per channel, row-major.
    pub color_buffer: Vec<u32>,

    pub depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![0; size],
            depth_buffer: vec![f32::INFINITY; size],
        }
    }

    /// Resets the buffers for a new frame.
    pub fn clear(&mut self, background: Vector3<f32>) {
        self.color_buffer.fill(pack_rgb(background));
        self.depth_buffer.fill(f32::INFINITY);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Depth test and update.
    ///
    /// Returns true and stores `new_depth` only if it is strictly closer than the
    /// stored value; an equal depth is rejected, so the first triangle drawn at
    /// a given depth wins.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        if new_depth >= self.depth_buffer[idx] {
            return false;
        }
        self.depth_buffer[idx] = new_depth;
        true
    }

    /// Writes an already packed 0RGB value.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, packed: u32) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx] = packed;
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(unpack_rgb(self.color_buffer[self.index(x, y)]))
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_depth_and_color() {
        let mut fb = FrameBuffer::new(4, 2);
        assert!(fb.depth_test_and_update(1, 1, 0.5));
        fb.set_pixel(1, 1, 0x00FF_0000);

        fb.clear(Vector3::new(0.0, 0.0, 1.0));

        assert_eq!(fb.depth(1, 1), Some(f32::INFINITY));
        assert_eq!(fb.get_pixel(1, 1), Some([0, 0, 255]));
    }

    #[test]
    fn equal_depth_is_rejected() {
        let mut fb = FrameBuffer::new(2, 2);
        assert!(fb.depth_test_and_update(0, 0, 0.4));
        assert!(!fb.depth_test_and_update(0, 0, 0.4));
        assert!(!fb.depth_test_and_update(0, 0, 0.6));
        assert!(fb.depth_test_and_update(0, 0, 0.2));
        assert_eq!(fb.depth(0, 0), Some(0.2));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        assert!(!fb.depth_test_and_update(2, 0, 0.1));
        assert_eq!(fb.get_pixel(0, 2), None);
    }
}
