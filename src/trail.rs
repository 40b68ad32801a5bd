// Pointer trail: a short-lived set of deposits that drift, fade and get
// painted into a small RGB raster every tick.
//
// Raster encoding (per pixel):
//   R = (dir.x + 1) / 2, G = (dir.y + 1) / 2  -> flow direction
//   B = intensity                              -> how strong the warp is
// Untouched pixels stay black.

use glam::Vec2;
use image::{Rgb as Pixel, RgbImage};

use crate::kernel::ShadowStamp;

/// Raster edge length in pixels.
pub const TRAIL_SIZE: u32 = 64;
/// Ticks a point survives before it is dropped.
pub const MAX_AGE: u32 = 64;
/// Scale from squared pointer displacement to force.
const FORCE_SCALE: f32 = 20_000.0;
pub const MAX_FORCE: f32 = 2.0;
/// Share of the lifetime spent fading in.
const FADE_IN: f32 = 0.3;
/// Stamp opacity per unit of intensity.
const STAMP_ALPHA: f32 = 0.2;

/// One pointer deposit still influencing the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2, // normalized, origin bottom-left
    pub age: u32,       // ticks since creation
    pub direction: Vec2,
    pub force: f32,     // [0, MAX_FORCE]
}

/// Fade envelope over a point's life: quarter-sine in, inverted parabola out.
pub fn intensity_for_age(age: u32, max_age: u32) -> f32 {
    let age = age as f32;
    let max_age = max_age as f32;
    let rise = max_age * FADE_IN;
    if age < rise {
        ((age / rise) * std::f32::consts::FRAC_PI_2).sin()
    } else {
        let t = 1.0 - (age - rise) / (max_age * (1.0 - FADE_IN));
        -t * (t - 2.0)
    }
}

/// The sampleable image produced by the trail each tick.
#[derive(Clone)]
pub struct TrailRaster {
    image: RgbImage,
}

impl TrailRaster {
    pub fn new(size: u32) -> Self {
        Self { image: RgbImage::new(size, size) }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Pixel([0, 0, 0]);
        }
    }

    /// True when every pixel is black.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0 == [0, 0, 0])
    }

    /// Source-over blend of `color` at `(x, y)` with opacity `alpha`.
    #[inline]
    fn blend(&mut self, x: u32, y: u32, color: [f32; 3], alpha: f32) {
        let px = self.image.get_pixel_mut(x, y);
        for (c, &src) in px.0.iter_mut().zip(color.iter()) {
            let dst = *c as f32;
            *c = (src * alpha + dst * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
        }
    }

    /// Paint one soft stamp centered at raster coordinates `(cx, cy)`.
    fn stamp(&mut self, stamp: &ShadowStamp, cx: f32, cy: f32, color: [f32; 3], alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let e = stamp.extent();
        let w = self.width() as i32;
        let h = self.height() as i32;
        let x0 = ((cx - e).floor() as i32).max(0);
        let x1 = ((cx + e).ceil() as i32).min(w - 1);
        let y0 = ((cy - e).floor() as i32).max(0);
        let y1 = ((cy + e).ceil() as i32).min(h - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let a = stamp.weight((dx * dx + dy * dy).sqrt()) * alpha;
                if a > 0.0 {
                    self.blend(x as u32, y as u32, color, a);
                }
            }
        }
    }

    /// Bilinear sample at `uv` (v = 0 is the bottom row), clamp-to-edge.
    /// Returns channels in [0,1].
    pub fn sample(&self, uv: Vec2) -> [f32; 3] {
        let w = self.width() as i32;
        let h = self.height() as i32;
        let fx = uv.x * w as f32 - 0.5;
        let fy = (1.0 - uv.y) * h as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;

        let texel = |x: i32, y: i32| {
            let p = self.image.get_pixel(x.clamp(0, w - 1) as u32, y.clamp(0, h - 1) as u32);
            [p.0[0] as f32, p.0[1] as f32, p.0[2] as f32]
        };
        let (x0, y0) = (x0 as i32, y0 as i32);
        let a = texel(x0, y0);
        let b = texel(x0 + 1, y0);
        let c = texel(x0, y0 + 1);
        let d = texel(x0 + 1, y0 + 1);

        let mut out = [0.0f32; 3];
        for i in 0..3 {
            let top = a[i] + (b[i] - a[i]) * tx;
            let bottom = c[i] + (d[i] - c[i]) * tx;
            out[i] = (top + (bottom - top) * ty) / 255.0;
        }
        out
    }
}

/// Owns the active points, the last pointer position and the output raster.
pub struct TrailBuffer {
    size: u32,
    max_age: u32,
    speed: f32,
    points: Vec<TrailPoint>,
    last: Option<Vec2>,
    stamp: ShadowStamp,
    raster: TrailRaster,
    dirty: bool,
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(TRAIL_SIZE, MAX_AGE)
    }
}

impl TrailBuffer {
    pub fn new(size: u32, max_age: u32) -> Self {
        let radius = 0.25 * size as f32;
        Self {
            size,
            max_age,
            speed: 1.0 / max_age as f32,
            points: Vec::with_capacity(max_age as usize + 1),
            last: None,
            stamp: ShadowStamp::new(radius, radius),
            raster: TrailRaster::new(size),
            dirty: false,
        }
    }

    /// Feed one pointer sample (normalized, bottom-left origin).
    /// The first sample only sets the baseline; repeats of the last one are ignored.
    pub fn record_touch(&mut self, position: Vec2) {
        let Some(last) = self.last else {
            self.last = Some(position);
            return;
        };
        let delta = position - last;
        let dd = delta.dot(delta);
        if dd == 0.0 {
            return;
        }
        let d = dd.sqrt();
        let direction = delta / d;
        let force = (dd * FORCE_SCALE).min(MAX_FORCE);

        self.last = Some(position);
        self.points.push(TrailPoint { position, age: 0, direction, force });
    }

    /// Age and move every point, drop the expired ones and repaint the raster.
    pub fn advance(&mut self) {
        self.raster.clear();
        let max_age = self.max_age;
        let speed = self.speed;

        // Newest first so `remove` never shifts unvisited points.
        for i in (0..self.points.len()).rev() {
            let p = &mut self.points[i];
            let f = p.force * speed * (1.0 - p.age as f32 / max_age as f32);
            p.position = p.position + p.direction * f;
            p.age += 1;
            if p.age > max_age {
                self.points.remove(i);
            } else {
                let p = *p;
                self.draw_point(&p);
            }
        }
        self.dirty = true;
    }

    fn draw_point(&mut self, p: &TrailPoint) {
        let size = self.size as f32;
        let cx = p.position.x * size;
        let cy = (1.0 - p.position.y) * size; // raster rows grow downward

        let intensity = intensity_for_age(p.age, self.max_age) * p.force;
        let color = [
            ((p.direction.x + 1.0) / 2.0 * 255.0).clamp(0.0, 255.0),
            ((p.direction.y + 1.0) / 2.0 * 255.0).clamp(0.0, 255.0),
            (intensity * 255.0).clamp(0.0, 255.0),
        ];
        let alpha = (STAMP_ALPHA * intensity).clamp(0.0, 1.0);
        self.raster.stamp(&self.stamp, cx, cy, color, alpha);
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_position(&self) -> Option<Vec2> {
        self.last
    }

    pub fn raster(&self) -> &TrailRaster {
        &self.raster
    }

    /// Returns whether the raster changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
