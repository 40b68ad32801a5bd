// Soft "shadow" stamp used to paint trail points into the raster.
// A hard disc of `radius` pixels blurred by a Gaussian with sigma = blur / 2,
// which is how a 2D canvas renders `shadowBlur`. The result is radially
// symmetric, so we keep only a 1D profile indexed by distance from center.

/// Sampling step of the radial profile, in raster pixels.
const PROFILE_STEP: f32 = 0.25;
/// Spacing of the disc sample grid used to build the profile.
const DISC_STEP: f32 = 0.5;

pub struct ShadowStamp {
    extent: f32,       // weights are zero beyond this distance
    profile: Vec<f32>, // weight at d = i * PROFILE_STEP
}

impl ShadowStamp {
    /// Build the profile once: convolve a disc of `radius` with a Gaussian
    /// whose sigma is `blur / 2`.
    pub fn new(radius: f32, blur: f32) -> Self {
        let sigma = (blur * 0.5).max(1e-3);
        let extent = radius + 3.0 * sigma;
        let s2 = 2.0 * sigma * sigma;
        let norm = DISC_STEP * DISC_STEP / (std::f32::consts::PI * s2);

        // Sample points covering the disc (cell centers inside the circle).
        let cells = (radius / DISC_STEP).ceil() as i32;
        let mut disc = Vec::new();
        for j in -cells..cells {
            for i in -cells..cells {
                let qx = (i as f32 + 0.5) * DISC_STEP;
                let qy = (j as f32 + 0.5) * DISC_STEP;
                if qx * qx + qy * qy <= radius * radius {
                    disc.push((qx, qy));
                }
            }
        }

        let samples = (extent / PROFILE_STEP).ceil() as usize + 1;
        let profile = (0..samples)
            .map(|k| {
                let d = k as f32 * PROFILE_STEP;
                let sum: f32 = disc
                    .iter()
                    .map(|&(qx, qy)| {
                        let dx = d - qx;
                        (-(dx * dx + qy * qy) / s2).exp()
                    })
                    .sum();
                (sum * norm).clamp(0.0, 1.0)
            })
            .collect();

        Self { extent, profile }
    }

    /// Pixels farther than this from the center receive nothing.
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Coverage in [0,1] at distance `d` from the stamp center.
    #[inline]
    pub fn weight(&self, d: f32) -> f32 {
        if d >= self.extent {
            return 0.0;
        }
        let f = d.max(0.0) / PROFILE_STEP;
        let i = f as usize;
        let t = f - i as f32;
        let a = self.profile[i];
        let b = self.profile.get(i + 1).copied().unwrap_or(0.0);
        a + (b - a) * t
    }
}
