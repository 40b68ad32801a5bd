// PNG snapshots: the composited frame and the raw trail raster.

use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::Error;
use crate::trail::TrailRaster;
use crate::types::FrameBuffer;

/// Unpack 0x00RRGGBB pixels into an RGB image.
pub fn frame_to_image(fb: &FrameBuffer) -> Result<RgbImage, Error> {
    let (w, h) = (fb.width as u32, fb.height as u32);
    if fb.pixels.len() != fb.width * fb.height {
        return Err(Error::Export(format!(
            "frame buffer holds {} pixels, expected {w}x{h}",
            fb.pixels.len()
        )));
    }
    Ok(RgbImage::from_fn(w, h, |x, y| {
        let px = fb.pixel(x as usize, y as usize);
        Rgb([(px >> 16) as u8, (px >> 8) as u8, px as u8])
    }))
}

pub fn save_frame(fb: &FrameBuffer, path: &Path) -> Result<(), Error> {
    frame_to_image(fb)?
        .save(path)
        .map_err(|e| Error::Export(format!("{}: {e}", path.display())))
}

pub fn save_trail_raster(raster: &TrailRaster, path: &Path) -> Result<(), Error> {
    raster
        .image()
        .save(path)
        .map_err(|e| Error::Export(format!("{}: {e}", path.display())))
}
