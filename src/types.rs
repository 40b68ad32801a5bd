// Frame buffer shared by the gradient, the host, export and the window.

use glam::Vec3;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // buffer width in pixels
    pub height: usize,     // buffer height in pixels
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Black buffer of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

/// Pack an RGB color as 0x00RRGGBB for minifb, saturating each channel.
#[inline]
pub fn pack_rgb(c: Vec3) -> u32 {
    let [r, g, b] = (c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round().to_array();
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_and_saturates_channels() {
        assert_eq!(pack_rgb(Vec3::new(1.0, 0.0, 0.0)), 0x00FF_0000);
        assert_eq!(pack_rgb(Vec3::new(2.0, -1.0, 0.5)), 0x00FF_0080);
    }

    #[test]
    fn new_buffer_is_black() {
        let fb = FrameBuffer::new(3, 2);
        assert_eq!(fb.pixels.len(), 6);
        assert_eq!(fb.pixel(2, 1), 0);
    }
}
