use cubeloop::{
    camera::{Camera, KeyStates},
    math::{Deg, MathError, Matrix4},
    scene::{Scene, UniformSink},
    timestep::{Clock, FixedTimestep, Presenter, Stage, SystemClock, TimestepConfig},
};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, KeyCode, NamedKey, PhysicalKey},
    window::{Window, WindowId},
};
use std::time::{Duration, Instant};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;
const TITLE: &str = "cubeloop";
const TICKS_PER_SECOND: u32 = 20;
const FOV: Deg<f32> = Deg(45.);
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.;
// stands in for vsync when running without a window
const HEADLESS_FRAME_TIME: Duration = Duration::from_millis(4);

fn projection(width: u32, height: u32) -> Result<Matrix4, MathError> {
    Matrix4::perspective(FOV, width as f32 / height as f32, Z_NEAR, Z_FAR)
}

fn main() {
    println!("Usage: cubeloop [--headless <seconds>]");
    println!("Run with RUST_LOG=debug to see logging output");
    println!();
    println!("WASD: move around");
    println!("Space and Left-Shift: move up and down");
    println!("Escape: quit");
    println!();

    env_logger::init();

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), anyhow::Error> {
    let stage = DemoStage::new().context("Failed to set up scene")?;
    let config = TimestepConfig { ticks_per_second: TICKS_PER_SECOND, max_ticks_per_frame: None };
    let mut clock = SystemClock::new();
    let timestep = FixedTimestep::new(config, clock.now_ms())?;

    match parse_args()? {
        Some(duration) => run_headless(stage, timestep, clock, duration),
        None => {
            let event_loop = EventLoop::new().context("Failed to create event loop")?;
            event_loop.set_control_flow(ControlFlow::Poll);
            let mut app = App {
                window: None,
                clock,
                timestep,
                stage,
                fps: None,
            };
            event_loop.run_app(&mut app).context("Event loop failed")?;
            Ok(())
        }
    }
}

fn parse_args() -> Result<Option<Duration>, anyhow::Error> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => Ok(None),
        Some("--headless") => {
            let secs = args.next().context("--headless needs a duration in seconds")?;
            let secs: f64 = secs.parse().with_context(|| format!("Invalid duration {secs:?}"))?;
            let duration = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("Invalid duration {secs}"))?;
            Ok(Some(duration))
        }
        Some(other) => anyhow::bail!("Unknown argument {other:?}"),
    }
}

fn run_headless(
    mut stage: DemoStage,
    mut timestep: FixedTimestep,
    mut clock: SystemClock,
    duration: Duration,
) -> Result<(), anyhow::Error> {
    struct Deadline(Instant);

    impl Presenter for Deadline {
        fn present(&mut self) {
            std::thread::sleep(HEADLESS_FRAME_TIME);
        }

        fn should_close(&self) -> bool {
            Instant::now() >= self.0
        }
    }

    log::info!("Running headless for {duration:?}");
    let mut presenter = Deadline(Instant::now() + duration);
    let frames = timestep.run(&mut clock, &mut stage, &mut presenter);
    println!("{frames} frames, {} ticks, {} uploads", stage.ticks, stage.sink.uploads);
    log::debug!("Final mvp:\n{}", stage.scene.mvp());
    Ok(())
}

/// Takes the place of a shader uniform upload.
#[derive(Default)]
struct LogSink {
    uploads: u64,
}

impl UniformSink for LogSink {
    fn upload_mvp(&mut self, mvp: &[f32; 16]) {
        self.uploads += 1;
        log::trace!("Uploading mvp {mvp:?}");
    }
}

struct DemoStage {
    scene: Scene,
    sink: LogSink,
    /// Keys as reported by the window, latched into the scene once per frame.
    pressed: KeyStates,
    ticks: u64,
}

impl DemoStage {
    fn new() -> Result<Self, MathError> {
        let scene = Scene::new(Camera::default(), projection(WIDTH, HEIGHT)?)?;
        log::debug!("Projection:\n{}", scene.projection());
        Ok(Self {
            scene,
            sink: LogSink::default(),
            pressed: KeyStates::default(),
            ticks: 0,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let res = projection(width, height).and_then(|p| self.scene.set_projection(p));
        if let Err(err) = res {
            log::warn!("Failed to resize to {width}x{height}: {err}");
        }
    }
}

impl Stage for DemoStage {
    fn process_input(&mut self) {
        self.scene.keys = self.pressed;
    }

    fn tick(&mut self, dt_ms: f64) {
        self.ticks += 1;
        if let Err(err) = self.scene.tick(dt_ms) {
            log::warn!("Skipping tick: {err}");
        }
    }

    fn render(&mut self) {
        self.scene.render(&mut self.sink);
    }
}

struct App {
    window: Option<Window>,
    clock: SystemClock,
    timestep: FixedTimestep,
    stage: DemoStage,
    fps: Option<(Instant, u32)>,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), anyhow::Error> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(PhysicalSize::new(WIDTH, HEIGHT));
        let window = event_loop.create_window(window_attrs).context("Failed to create window")?;
        self.window = Some(window);
        self.timestep.reset(self.clock.now_ms());
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            log::error!("Error while starting: {err}");
            log::error!("{err:#?}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key: Key::Named(NamedKey::Escape),
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let pressed = state.is_pressed();
                let keys = &mut self.stage.pressed;
                match code {
                    KeyCode::KeyW => keys.forward = pressed,
                    KeyCode::KeyA => keys.left = pressed,
                    KeyCode::KeyS => keys.backward = pressed,
                    KeyCode::KeyD => keys.right = pressed,
                    KeyCode::Space => keys.up = pressed,
                    KeyCode::ShiftLeft => keys.down = pressed,
                    _ => {}
                }
            }
            WindowEvent::Resized(size) => self.stage.resize(size.width, size.height),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if event_loop.exiting() || self.window.is_none() {
            return;
        }

        if let Some((start, count)) = self.fps.as_mut() {
            let time = start.elapsed();
            *count += 1;
            if time.as_millis() > 1000 {
                eprint!("fps: {}        \r", *count as f32 / time.as_secs_f32());
                *start = Instant::now();
                *count = 0;
            }
        } else {
            self.fps = Some((Instant::now(), 0));
        }

        let report = self.timestep.frame(self.clock.now_ms(), &mut self.stage);
        if report.skipped > 0 {
            log::warn!("Dropped {} ticks", report.skipped);
        }
    }

    fn exiting(&mut self, _: &ActiveEventLoop) {
        log::debug!(
            "Exiting after {} ticks and {} uploads",
            self.stage.ticks,
            self.stage.sink.uploads,
        );
    }
}
