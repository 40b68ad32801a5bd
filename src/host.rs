// Owns the surface and sequences a frame: draw -> advance trail -> advance time.
// No window in here; whoever owns the event loop calls `tick` and forwards
// pointer / resize events, so the whole thing runs headless too.

use glam::Vec2;
use tracing::{debug, info};

use crate::gradient::{GradientField, GradientParams};
use crate::trail::{TRAIL_SIZE, TrailBuffer, TrailRaster};
use crate::types::FrameBuffer;

/// Upper bound of the render scale (device-pixel-ratio clamp).
pub const MAX_RENDER_SCALE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Uninitialized,
    Running,
    Stopped,
}

/// Surface size in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Window pixel -> normalized surface coordinate (bottom-left origin).
    /// `None` when the pointer is outside the surface.
    pub fn normalize(&self, x: f32, y: f32) -> Option<Vec2> {
        let (w, h) = (self.width as f32, self.height as f32);
        if w <= 0.0 || h <= 0.0 || !(0.0..=w).contains(&x) || !(0.0..=h).contains(&y) {
            return None;
        }
        Some(Vec2::new(x / w, 1.0 - y / h))
    }
}

/// Perspective camera looking at the background plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_degrees: f32,
    pub distance: f32,
    pub aspect: f32,
}

impl Projection {
    pub fn new(aspect: f32) -> Self {
        Self { fov_degrees: 45.0, distance: 50.0, aspect }
    }

    /// World-space extent visible at the plane's depth.
    pub fn view_size(&self) -> (f32, f32) {
        let height = (self.distance * (self.fov_degrees.to_radians() / 2.0).tan() * 2.0).abs();
        (height * self.aspect, height)
    }
}

/// Full-bleed quad, sized to exactly fill the view.
/// Its corners land on the frame buffer corners, so plane uv (0..1) maps
/// straight to buffer pixel centers in `GradientField::render`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub width: f32,
    pub height: f32,
}

impl Plane {
    fn fill(projection: &Projection) -> Self {
        let (width, height) = projection.view_size();
        Self { width, height }
    }
}

pub struct ViewportHost {
    state: HostState,
    render_scale: f32,
    viewport: Viewport,
    projection: Projection,
    plane: Plane,
    frame: FrameBuffer,
    trail: TrailBuffer,
    uploaded: TrailRaster, // copy of the trail raster the field samples from
    field: GradientField,
    frames: u64,
}

impl ViewportHost {
    pub fn new(params: GradientParams) -> Self {
        let viewport = Viewport { width: 0, height: 0 };
        let projection = Projection::new(1.0);
        Self {
            state: HostState::Uninitialized,
            render_scale: 1.0,
            viewport,
            projection,
            plane: Plane::fill(&projection),
            frame: FrameBuffer::new(0, 0),
            trail: TrailBuffer::default(),
            uploaded: TrailRaster::new(TRAIL_SIZE),
            field: GradientField::new(params, 0, 0),
            frames: 0,
        }
    }

    /// Buffer pixels per window pixel, clamped to (0, MAX_RENDER_SCALE].
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        self.render_scale = clamp_render_scale(scale);
        self
    }

    /// Build the surface and start running. Only the first call has any effect.
    pub fn init(&mut self, width: usize, height: usize) {
        if self.state != HostState::Uninitialized {
            debug!(state = ?self.state, "init ignored");
            return;
        }
        self.rebuild_surface(width, height);
        self.state = HostState::Running;
        info!(width, height, scale = self.render_scale, "viewport running");
    }

    /// Stop ticking and ignore further input. Irreversible.
    pub fn stop(&mut self) {
        if self.state == HostState::Stopped {
            return;
        }
        self.state = HostState::Stopped;
        info!(frames = self.frames, "viewport stopped");
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.state != HostState::Running {
            return;
        }
        if width == self.viewport.width && height == self.viewport.height {
            return;
        }
        self.rebuild_surface(width, height);
        info!(width, height, aspect = self.viewport.aspect(), "viewport resized");
    }

    fn rebuild_surface(&mut self, width: usize, height: usize) {
        self.viewport = Viewport { width, height };
        self.projection = Projection::new(self.viewport.aspect());
        self.plane = Plane::fill(&self.projection);
        let (fw, fh) = scaled_size(width, height, self.render_scale);
        self.frame = FrameBuffer::new(fw, fh);
        self.field.resize(width, height);
    }

    /// Pointer position in window pixels. Returns whether it landed on the surface.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> bool {
        if self.state != HostState::Running {
            return false;
        }
        match self.viewport.normalize(x, y) {
            Some(uv) => {
                self.trail.record_touch(uv);
                true
            }
            None => {
                debug!(x, y, "pointer outside surface");
                false
            }
        }
    }

    /// One frame. The drawn image reflects the trail and time of the previous tick.
    pub fn tick(&mut self, delta_seconds: f32) {
        if self.state != HostState::Running {
            return;
        }
        self.field.render(&self.uploaded, &mut self.frame);
        self.trail.advance();
        if self.trail.take_dirty() {
            self.uploaded.clone_from(self.trail.raster());
        }
        self.field.tick(delta_seconds);
        self.frames += 1;
    }

    pub fn configure(&mut self, params: GradientParams) {
        self.field.configure(params);
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// The raster the next frame will sample.
    pub fn uploaded_raster(&self) -> &TrailRaster {
        &self.uploaded
    }

    pub fn field(&self) -> &GradientField {
        &self.field
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

pub fn clamp_render_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 { scale.min(MAX_RENDER_SCALE) } else { 1.0 }
}

/// Buffer size for a window size, at least 1x1.
pub fn scaled_size(width: usize, height: usize, scale: f32) -> (usize, usize) {
    let s = |v: usize| ((v as f32 * scale).round() as usize).max(1);
    (s(width), s(height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::CENTER_COUNT;

    fn running(w: usize, h: usize) -> ViewportHost {
        let mut host = ViewportHost::new(GradientParams::default());
        host.init(w, h);
        host
    }

    #[test]
    fn starts_uninitialized_and_ignores_everything() {
        let mut host = ViewportHost::new(GradientParams::default());
        assert_eq!(host.state(), HostState::Uninitialized);
        assert!(!host.pointer_moved(1.0, 1.0));
        host.tick(0.016);
        assert_eq!(host.frames(), 0);
        assert_eq!(host.field().time(), 0.0);
    }

    #[test]
    fn init_is_one_shot() {
        let mut host = running(40, 20);
        host.init(100, 100);
        assert_eq!(host.viewport(), Viewport { width: 40, height: 20 });
        assert_eq!(host.frame().width, 40);
        assert_eq!(host.frame().height, 20);
    }

    #[test]
    fn pointer_is_normalized_with_flipped_y() {
        let mut host = running(200, 100);
        assert!(host.pointer_moved(50.0, 25.0));
        assert_eq!(host.trail().last_position(), Some(Vec2::new(0.25, 0.75)));
    }

    #[test]
    fn pointer_outside_is_rejected() {
        let mut host = running(200, 100);
        assert!(!host.pointer_moved(-1.0, 10.0));
        assert!(!host.pointer_moved(10.0, 100.5));
        assert_eq!(host.trail().last_position(), None);
        // Edges count as inside.
        assert!(host.pointer_moved(200.0, 0.0));
    }

    #[test]
    fn tick_draws_then_advances() {
        let mut host = running(16, 16);
        host.pointer_moved(4.0, 8.0);
        host.pointer_moved(8.0, 8.0);
        host.tick(0.5);
        assert_eq!(host.trail().points()[0].age, 1);
        assert_eq!(host.field().time(), 0.5);
        assert_eq!(host.frames(), 1);
        host.tick(0.25);
        assert_eq!(host.field().time(), 0.75);
    }

    #[test]
    fn tick_uploads_the_raster_only_after_the_trail_changed() {
        let mut host = running(16, 16);
        host.pointer_moved(4.0, 8.0);
        host.pointer_moved(8.0, 8.0);
        host.tick(0.1);
        assert!(!host.uploaded_raster().is_blank());
        assert_eq!(host.uploaded_raster().image(), host.trail().raster().image());
        for _ in 0..70 {
            host.tick(0.016);
        }
        assert!(host.trail().is_empty());
        assert!(host.uploaded_raster().is_blank());
    }

    #[test]
    fn configure_changes_the_next_frame() {
        let mut plain = running(8, 8);
        let mut host = running(8, 8);
        plain.tick(0.5);
        host.tick(0.5);
        let size = host.field().resolution();

        let params = GradientParams {
            colors: [glam::Vec3::new(0.0, 0.9, 0.0); CENTER_COUNT],
            grain_intensity: 0.0,
            ..GradientParams::default()
        };
        host.configure(params.clone());
        assert_eq!(host.field().params(), &params);
        assert_eq!(host.field().time(), 0.5);
        assert_eq!(host.field().resolution(), size);

        plain.tick(0.0);
        host.tick(0.0);
        assert_ne!(host.frame().pixels, plain.frame().pixels);
    }

    #[test]
    fn resize_recreates_surface_and_keeps_trail() {
        let mut host = running(100, 100);
        host.pointer_moved(10.0, 10.0);
        host.pointer_moved(30.0, 10.0);
        host.tick(0.1);
        let before = host.trail().points().to_vec();

        host.resize(300, 150);
        assert_eq!(host.trail().points(), &before[..]);
        assert_eq!(host.frame().width, 300);
        assert_eq!(host.frame().height, 150);
        assert_eq!(host.field().resolution(), Vec2::new(300.0, 150.0));
        let plane = host.plane();
        assert!((plane.width / plane.height - 2.0).abs() < 1e-5);
    }

    #[test]
    fn stop_halts_ticks_and_input() {
        let mut host = running(10, 10);
        host.tick(0.1);
        host.stop();
        assert_eq!(host.state(), HostState::Stopped);
        host.tick(0.1);
        assert!(!host.pointer_moved(5.0, 5.0));
        assert_eq!(host.frames(), 1);
        host.init(10, 10);
        assert_eq!(host.state(), HostState::Stopped);
    }

    #[test]
    fn render_scale_is_clamped() {
        let mut host = ViewportHost::new(GradientParams::default()).with_render_scale(5.0);
        host.init(10, 5);
        assert_eq!(host.frame().width, 20);
        assert_eq!(host.frame().height, 10);
        assert_eq!(clamp_render_scale(0.0), 1.0);
        assert_eq!(clamp_render_scale(0.5), 0.5);
        assert_eq!(scaled_size(3, 3, 0.1), (1, 1));
    }

    #[test]
    fn view_size_matches_camera() {
        let p = Projection::new(16.0 / 9.0);
        let (w, h) = p.view_size();
        let expected_h = 2.0 * 50.0 * (22.5f32).to_radians().tan();
        assert!((h - expected_h).abs() < 1e-4);
        assert!((w - expected_h * 16.0 / 9.0).abs() < 1e-3);
    }
}
