use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use raycaster::colors;
use raycaster::{Frame, FrameRenderer, Scene, Viewport};

#[derive(Parser, Debug)]
#[command(name = "raycaster", about = "Grid raycaster with textured walls and sprites")]
struct Cli {
    /// Scene JSON to load instead of the built-in demo level
    #[arg(long)]
    scene: Option<PathBuf>,

    #[arg(long, default_value = "800")]
    width: u32,

    #[arg(long, default_value = "600")]
    height: u32,

    /// Render one frame to this image file and exit
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Cast walls on a single thread
    #[arg(long)]
    sequential: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let scene = match &cli.scene {
        Some(path) => {
            Scene::load(path).with_context(|| format!("loading scene {}", path.display()))?
        }
        None => Scene::demo().context("building demo scene")?,
    };

    let mut config = scene.config.unwrap_or_default();
    config.parallel = !cli.sequential;
    let renderer = FrameRenderer::new(config);
    let viewport = Viewport::new(cli.width as usize, cli.height as usize);

    if let Some(path) = &cli.screenshot {
        return screenshot(renderer, &scene, viewport, path);
    }
    run(renderer, scene, viewport)
}

fn screenshot(
    mut renderer: FrameRenderer,
    scene: &Scene,
    viewport: Viewport,
    path: &Path,
) -> anyhow::Result<()> {
    let frame = renderer
        .render_scene(scene, viewport)
        .context("viewport must be at least 1x1")?;
    let stats = frame.stats();
    save_frame(&frame, path)?;
    tracing::info!(
        path = %path.display(),
        width = frame.width(),
        height = frame.height(),
        max_dda_steps = stats.max_dda_steps,
        sprites_drawn = stats.sprites.drawn,
        "saved screenshot"
    );
    Ok(())
}

fn save_frame(frame: &Frame<'_>, path: &Path) -> anyhow::Result<()> {
    let width = frame.width() as u32;
    let pixels = frame.pixels();
    let image = image::RgbaImage::from_fn(width, frame.height() as u32, |x, y| {
        let [_, r, g, b] = colors::unpack(pixels[(y * width + x) as usize]);
        image::Rgba([r, g, b, 0xFF])
    });
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(not(feature = "window"))]
fn run(_renderer: FrameRenderer, _scene: Scene, _viewport: Viewport) -> anyhow::Result<()> {
    anyhow::bail!("built without the `window` feature; pass --screenshot <PATH> to render headless")
}

#[cfg(feature = "window")]
fn run(mut renderer: FrameRenderer, mut scene: Scene, viewport: Viewport) -> anyhow::Result<()> {
    use raycaster::window::{FpsCounter, FrameLimiter, Window, WindowEvent};

    let mut window = Window::new("Raycaster", viewport.width as u32, viewport.height as u32)
        .map_err(anyhow::Error::msg)?;
    let mut limiter = FrameLimiter::new(&window);
    let mut fps = FpsCounter::new();

    loop {
        match window.poll_events() {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => window.resize(w, h).map_err(anyhow::Error::msg)?,
            WindowEvent::None => {}
        }

        let delta_ms = limiter.wait_and_get_delta(&window);
        scene.camera = movement::step(
            &scene.camera,
            &scene.grid,
            window.move_input(),
            delta_ms as f64 / 1000.0,
        );

        let viewport = Viewport::new(window.width() as usize, window.height() as usize);
        if let Some(frame) = renderer.render_scene(&scene, viewport) {
            window.present(frame.as_bytes()).map_err(anyhow::Error::msg)?;
        }
        fps.tick();
    }
    Ok(())
}

#[cfg(feature = "window")]
mod movement {
    use raycaster::math::Vec2;
    use raycaster::window::MoveInput;
    use raycaster::{Camera, WorldGrid};

    /// Cells per second.
    const MOVE_SPEED: f64 = 3.0;
    /// Radians per second.
    const TURN_SPEED: f64 = 2.5;

    /// Applies one frame of input. Each axis of motion is blocked separately,
    /// so the camera slides along walls instead of sticking to them.
    pub fn step(camera: &Camera, grid: &WorldGrid, input: MoveInput, dt: f64) -> Camera {
        let camera = camera.rotated(input.turn * TURN_SPEED * dt);

        let forward = camera.direction * (1.0 / camera.direction.length());
        let right = Vec2::new(-forward.y, forward.x);
        let motion = (forward * input.forward + right * input.strafe) * (MOVE_SPEED * dt);

        let mut position = camera.position;
        if !grid.is_solid((position.x + motion.x).floor() as i64, position.y.floor() as i64) {
            position.x += motion.x;
        }
        if !grid.is_solid(position.x.floor() as i64, (position.y + motion.y).floor() as i64) {
            position.y += motion.y;
        }
        camera.moved_to(position)
    }
}
