// What you SEE:
// • A slowly drifting multi-color gradient filling the window, with grain.
// • Moving the mouse over it leaves a fading ripple that warps the colors.
// • S saves the current frame as a PNG, T saves the trail raster. ESC quits.
//
// Optional first argument: path to a JSON config (see `config.rs`).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use liquid_gradient::config::Config;
use liquid_gradient::draw::Drawer;
use liquid_gradient::error::Error;
use liquid_gradient::export::{save_frame, save_trail_raster};
use liquid_gradient::host::ViewportHost;
use liquid_gradient::logging::init_logging;
use tracing::{error, info, warn};

fn main() -> Result<(), Error> {
    init_logging()?;
    let config = Config::from_args(std::env::args())?;
    let params = config.gradient_params()?;

    /* --- Window setup ---
       No window means no background; that is not a failure of the program. */
    let mut drawer = match Drawer::new(&config.window.title, config.window.width, config.window.height) {
        Ok(d) => d,
        Err(e) => {
            warn!(error = %e, "no window available, background disabled");
            return Ok(());
        }
    };

    let mut host = ViewportHost::new(params).with_render_scale(config.window.render_scale);
    let (w, h) = drawer.size();
    host.init(w, h);

    /* --- Frame stats --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut last_frame_time = Instant::now();
    let mut last_mouse: Option<(f32, f32)> = None;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        /* 1) Resize: rebuilds the surface when the window changed. */
        let (w, h) = drawer.size();
        host.resize(w, h);

        /* 2) Pointer: only actual moves count as events. */
        let mouse = drawer.mouse_pos();
        if let Some((mx, my)) = mouse {
            if mouse != last_mouse {
                host.pointer_moved(mx, my);
            }
        }
        last_mouse = mouse;

        /* 3) Draw, then advance trail + time for the next frame. */
        host.tick(dt);

        /* 4) Present. */
        drawer.present(host.frame())?;

        if config.snapshot_key_enabled && drawer.s_pressed_once() {
            let path = PathBuf::from(format!("snapshot-{}.png", host.frames()));
            match save_frame(host.frame(), &path) {
                Ok(()) => info!(path = %path.display(), "snapshot saved"),
                Err(e) => error!(error = %e, "snapshot failed"),
            }
        }
        if config.snapshot_key_enabled && drawer.t_pressed_once() {
            let path = PathBuf::from(format!("trail-{}.png", host.frames()));
            match save_trail_raster(host.trail().raster(), &path) {
                Ok(()) => info!(path = %path.display(), "trail raster saved"),
                Err(e) => error!(error = %e, "trail raster snapshot failed"),
            }
        }

        /* 5) Once per second: fps + live trail size. */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            info!(fps, trail_points = host.trail().len(), "frame stats");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    host.stop();
    Ok(())
}
