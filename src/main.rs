//! Umbra: real-time vignette camera preview CLI.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use umbra::capture::{AsyncCapture, CaptureBackend, NokhwaCapture};
use umbra::config::{Config, ConfigWatcher};
use umbra::output::PreviewRenderer;
use umbra::util::FpsCounter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

/// Live camera preview with a GPU vignette filter.
#[derive(Parser, Debug)]
#[command(name = "umbra")]
#[command(about = "Preview webcam video with a vignette effect in real-time")]
struct Args {
    /// Camera device index (default 0, the first available device)
    #[arg(short, long)]
    input: Option<u32>,

    /// Requested frame width (default 1280)
    #[arg(long)]
    width: Option<u32>,

    /// Requested frame height (default 720)
    #[arg(long)]
    height: Option<u32>,

    /// Target frames per second (default 30)
    #[arg(long)]
    fps: Option<u32>,

    /// Path to a YAML config file, watched for vignette changes
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vignette radius in frame pixels (default: half the smaller dimension)
    #[arg(long)]
    vignette_radius: Option<f32>,

    /// Vignette edge darkening, 0.0 to 1.0 (default 0.8)
    #[arg(long)]
    vignette_intensity: Option<f32>,

    /// List available cameras and exit
    #[arg(long)]
    list_devices: bool,
}

impl Args {
    /// Applies explicitly passed flags on top of the file config.
    fn apply_to(&self, config: &mut Config) {
        if let Some(input) = self.input {
            config.capture.device_index = input;
        }
        if let Some(width) = self.width {
            config.capture.width = width;
        }
        if let Some(height) = self.height {
            config.capture.height = height;
        }
        if let Some(fps) = self.fps {
            config.capture.fps = fps;
        }
        if let Some(radius) = self.vignette_radius {
            config.vignette.radius = Some(radius);
        }
        if let Some(intensity) = self.vignette_intensity {
            config.vignette.intensity = intensity;
        }
    }
}

/// Application state for the event loop.
struct UmbraApp {
    config: Config,
    config_watcher: Option<ConfigWatcher>,
    window: Option<Arc<Window>>,
    renderer: Option<PreviewRenderer>,
    capture: Option<AsyncCapture>,
    last_frame_time: Instant,
    frame_duration: Duration,
    fps: FpsCounter,
}

impl UmbraApp {
    fn new(config: Config, config_watcher: Option<ConfigWatcher>) -> Self {
        let frame_duration = Duration::from_secs_f64(1.0 / config.capture.fps.max(1) as f64);
        Self {
            config,
            config_watcher,
            window: None,
            renderer: None,
            capture: None,
            last_frame_time: Instant::now(),
            frame_duration,
            fps: FpsCounter::new(),
        }
    }

    fn start_capture(&mut self) {
        info!(
            "Opening camera device {}...",
            self.config.capture.device_index
        );
        match AsyncCapture::open(self.config.capture) {
            Ok(capture) => {
                let (w, h) = capture.frame_size();
                info!("Camera opened at {}x{}", w, h);
                self.capture = Some(capture);
            }
            Err(e) => {
                // The preview stays up but inert; nothing retries.
                error!("Unable to open camera: {}", e);
            }
        }
    }

    fn process_frame(&mut self) {
        if let Some(watcher) = &mut self.config_watcher {
            if let Some(new_config) = watcher.check_for_changes() {
                info!("Applying updated vignette parameters");
                self.config.vignette = new_config.vignette;
            }
        }

        let Some(capture) = &self.capture else {
            return;
        };
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        if let Some(frame) = capture.latest_frame() {
            if let Err(e) = renderer.render_frame(&frame, &self.config.vignette) {
                error!("Render error: {}", e);
            }
            if let Some(fps) = self.fps.tick() {
                debug!("Rendering at {:.2} FPS", fps);
            }
        }
    }
}

impl ApplicationHandler for UmbraApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title("Umbra - Vignette Preview")
            .with_inner_size(PhysicalSize::new(
                self.config.capture.width,
                self.config.capture.height,
            ));

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                self.window = Some(window.clone());

                match PreviewRenderer::new(window) {
                    Ok(renderer) => {
                        self.renderer = Some(renderer);
                        info!("Window created successfully");
                        self.start_capture();
                    }
                    Err(e) => {
                        error!("Failed to create renderer: {}", e);
                        event_loop.exit();
                    }
                }
            }
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if now.duration_since(self.last_frame_time) >= self.frame_duration {
                    self.process_frame();
                    self.last_frame_time = now;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if args.list_devices {
        println!("Available cameras:");
        match NokhwaCapture::list_devices() {
            Ok(devices) => {
                for device in devices {
                    println!("  [{}] {}", device.index, device.name);
                }
            }
            Err(e) => {
                eprintln!("Failed to list devices: {}", e);
            }
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    args.apply_to(&mut config);

    let config_watcher = args
        .config
        .clone()
        .and_then(|path| ConfigWatcher::new(path, config));

    info!("Starting Umbra...");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = UmbraApp::new(config, config_watcher);
    event_loop.run_app(&mut app)?;

    Ok(())
}
