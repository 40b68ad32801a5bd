// Procedural gradient: six colored blobs orbiting the middle of the surface,
// warped by the pointer trail and finished with a film grain.
// Pure per-pixel math; the same (uv, time, raster) always gives the same color.

use glam::{Vec2, Vec3};

use crate::trail::TrailRaster;
use crate::types::{FrameBuffer, pack_rgb};

pub const CENTER_COUNT: usize = 6;

/// Warp strength applied to uv by the trail raster.
const TRAIL_WARP: f32 = 0.5;
/// Lower bound of the mix toward the computed color, so the base tint never vanishes.
const MIN_MIX: f32 = 0.2;

#[derive(Debug, Clone, Copy)]
enum Wave {
    Sin,
    Cos,
}

impl Wave {
    #[inline]
    fn at(self, phase: f32) -> f32 {
        match self {
            Wave::Sin => phase.sin(),
            Wave::Cos => phase.cos(),
        }
    }

    #[inline]
    fn other(self) -> Wave {
        match self {
            Wave::Sin => Wave::Cos,
            Wave::Cos => Wave::Sin,
        }
    }
}

/// How one center moves and pulses.
/// x follows `wave`, y follows the other wave, weight follows `wave` again.
#[derive(Debug, Clone, Copy)]
struct Orbit {
    wave: Wave,
    freq: (f32, f32), // angular multipliers for x and y
    amplitude: f32,
    pulse: f32,       // angular multiplier of the weight oscillator
    group: usize,     // index into `color_weights`
}

const ORBITS: [Orbit; CENTER_COUNT] = [
    Orbit { wave: Wave::Sin, freq: (0.4, 0.5), amplitude: 0.4, pulse: 1.0, group: 0 },
    Orbit { wave: Wave::Cos, freq: (0.6, 0.45), amplitude: 0.5, pulse: 1.2, group: 1 },
    Orbit { wave: Wave::Sin, freq: (0.35, 0.55), amplitude: 0.45, pulse: 0.8, group: 0 },
    Orbit { wave: Wave::Cos, freq: (0.5, 0.4), amplitude: 0.4, pulse: 1.3, group: 1 },
    Orbit { wave: Wave::Sin, freq: (0.7, 0.6), amplitude: 0.35, pulse: 1.1, group: 0 },
    Orbit { wave: Wave::Cos, freq: (0.45, 0.65), amplitude: 0.5, pulse: 0.9, group: 1 },
];

/// Tunables of the field. Any finite values are accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientParams {
    pub colors: [Vec3; CENTER_COUNT],
    pub speed: f32,
    pub intensity: f32,
    pub base_color: Vec3,
    pub grain_intensity: f32,
    pub gradient_radius: f32,
    pub color_weights: [f32; 2],
}

impl Default for GradientParams {
    fn default() -> Self {
        let ink = Vec3::new(0.012, 0.012, 0.012); // #030303
        let teal = Vec3::new(0.0, 0.259, 0.22); // #004238
        let orange = Vec3::new(0.945, 0.353, 0.133); // #F15A22
        Self {
            colors: [ink, teal, orange, Vec3::ZERO, orange, Vec3::ZERO],
            speed: 0.8,
            intensity: 1.5,
            base_color: ink,
            grain_intensity: 0.08,
            gradient_radius: 1.0,
            color_weights: [1.0, 1.0],
        }
    }
}

/// Center positions and pulse weights for one instant.
#[derive(Debug, Clone, Copy)]
pub struct Influences {
    pub centers: [Vec2; CENTER_COUNT],
    pub weights: [f32; CENTER_COUNT],
}

impl Influences {
    pub fn at(time: f32, speed: f32) -> Self {
        let t = time * speed;
        let mut centers = [Vec2::ZERO; CENTER_COUNT];
        let mut weights = [0.0; CENTER_COUNT];
        for (i, o) in ORBITS.iter().enumerate() {
            centers[i] = Vec2::new(
                0.5 + o.wave.at(t * o.freq.0) * o.amplitude,
                0.5 + o.wave.other().at(t * o.freq.1) * o.amplitude,
            );
            weights[i] = 0.55 + 0.45 * o.wave.at(t * o.pulse);
        }
        Self { centers, weights }
    }
}

/// GLSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Hash-based grain in [-1, 1]; pure function of (uv, resolution, time).
#[inline]
pub fn grain(uv: Vec2, resolution: Vec2, time: f32) -> f32 {
    let g = uv * resolution * 0.5 + time;
    let h = g.dot(Vec2::new(12.9898, 78.233)).sin() * 43758.547;
    // GLSL fract: x - floor(x), in [0, 1) for negatives too.
    (h - h.floor()) * 2.0 - 1.0
}

pub struct GradientField {
    params: GradientParams,
    time: f32,
    resolution: Vec2,
}

impl GradientField {
    pub fn new(params: GradientParams, width: usize, height: usize) -> Self {
        Self { params, time: 0.0, resolution: Vec2::new(width as f32, height as f32) }
    }

    pub fn configure(&mut self, params: GradientParams) {
        self.params = params;
    }

    pub fn params(&self) -> &GradientParams {
        &self.params
    }

    /// Accumulated seconds; never decreases.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn resolution(&self) -> Vec2 {
        self.resolution
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            self.time += delta_seconds;
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.resolution = Vec2::new(width as f32, height as f32);
    }

    /// Color at `uv` (bottom-left origin) for the given time and trail state.
    pub fn evaluate(&self, uv: Vec2, time: f32, raster: &TrailRaster) -> Vec3 {
        let inf = Influences::at(time, self.params.speed);
        self.shade(&inf, uv, time, raster)
    }

    fn shade(&self, inf: &Influences, uv: Vec2, time: f32, raster: &TrailRaster) -> Vec3 {
        let p = &self.params;

        // Trail warp: the raster stores (dir + 1) / 2, flipped here.
        let [r, g, b] = raster.sample(uv);
        let flow = Vec2::new(-(r * 2.0 - 1.0), -(g * 2.0 - 1.0));
        let uv = uv + flow * (TRAIL_WARP * b);

        let mut color = Vec3::ZERO;
        for (i, o) in ORBITS.iter().enumerate() {
            let influence = 1.0 - smoothstep(0.0, p.gradient_radius, (uv - inf.centers[i]).length());
            color += p.colors[i] * (influence * inf.weights[i] * p.color_weights[o.group]);
        }
        let color = color.clamp(Vec3::ZERO, Vec3::ONE) * p.intensity;
        let mix = color.length().max(MIN_MIX);
        let color = p.base_color.lerp(color, mix);

        color + grain(uv, self.resolution, time) * p.grain_intensity
    }

    /// Fill `fb` for the current time. Row 0 is the top of the surface.
    pub fn render(&self, raster: &TrailRaster, fb: &mut FrameBuffer) {
        let inf = Influences::at(self.time, self.params.speed);
        let (w, h) = (fb.width as f32, fb.height as f32);
        for (y, row) in fb.pixels.chunks_exact_mut(fb.width.max(1)).enumerate() {
            let v = 1.0 - (y as f32 + 0.5) / h;
            for (x, px) in row.iter_mut().enumerate() {
                let uv = Vec2::new((x as f32 + 0.5) / w, v);
                *px = pack_rgb(self.shade(&inf, uv, self.time, raster));
            }
        }
    }
}
