mod app;
mod cli;
mod gpu;
mod media;
mod playback;
mod settings;
mod ui;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use crossbeam_channel::Sender;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use app::App;
use cli::{CliArgs, USAGE};
use media::VideoSource;
use playback::channel::{input_channel, spawn_playback};
use playback::{InputEvent, PlaybackController, PlaybackState};
use settings::SettingsConfig;
use ui::display::ProxyDisplay;
use ui::viewer::{ViewerInfo, ViewerMessage, ViewerView};

/// Logical height reserved below the frame for the transport bar.
const TRANSPORT_HEIGHT: f64 = 56.0;

struct ViewerApp {
    app: Option<App>,
    info: ViewerInfo,
    view: ViewerView,
    window_scale: f64,
    input: Sender<InputEvent>,
}

impl ViewerApp {
    fn new(info: ViewerInfo, window_scale: f32, input: Sender<InputEvent>) -> Self {
        Self {
            app: None,
            info,
            view: ViewerView::default(),
            window_scale: f64::from(window_scale.max(0.1)),
            input,
        }
    }

    fn window_size(&self) -> LogicalSize<f64> {
        LogicalSize::new(
            f64::from(self.info.width) * self.window_scale,
            f64::from(self.info.height) * self.window_scale + TRANSPORT_HEIGHT,
        )
    }
}

impl ApplicationHandler<ViewerMessage> for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.info.file_name.clone())
            .with_inner_size(self.window_size());

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                forward(&self.input, InputEvent::Closed);
                event_loop.exit();
                return;
            }
        };

        center_on_monitor(event_loop, &window);

        match App::new(window) {
            Ok(app) => {
                app.window.request_redraw();
                self.app = Some(app);
                log::info!("Viewer window open for {}", self.info.file_name);
            }
            Err(e) => {
                log::error!("Failed to initialize viewer: {e}");
                forward(&self.input, InputEvent::Closed);
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, message: ViewerMessage) {
        self.view.apply(message);
        if self.view.state() == Some(PlaybackState::Stopped) {
            event_loop.exit();
            return;
        }
        if let Some(app) = &self.app {
            app.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = self.app.as_mut() else {
            return;
        };

        let egui_consumed = app.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                forward(&self.input, InputEvent::Closed);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.resize(size.width, size.height);
                app.window.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if !egui_consumed || !app.egui_overlay.wants_keyboard() => {
                let key = ui::keyboard::key_press(&logical_key);
                forward(&self.input, InputEvent::Key(key));
            }
            WindowEvent::RedrawRequested => match app.render(&mut self.view, &self.info) {
                Ok(Some(index)) => forward(&self.input, InputEvent::Seek(index)),
                Ok(None) => {}
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory");
                    forward(&self.input, InputEvent::Closed);
                    event_loop.exit();
                }
                Err(e) => {
                    log::warn!("Surface error: {e}");
                    app.window.request_redraw();
                }
            },
            _ => {}
        }
    }
}

fn forward(input: &Sender<InputEvent>, event: InputEvent) {
    if input.send(event).is_err() {
        log::debug!("Playback thread already finished");
    }
}

fn center_on_monitor(event_loop: &ActiveEventLoop, window: &Window) {
    let Some(monitor) = event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next())
    else {
        return;
    };
    let monitor_size = monitor.size();
    let window_size = window.outer_size();
    let monitor_pos = monitor.position();
    let x = monitor_size.width.saturating_sub(window_size.width) / 2;
    let y = monitor_size.height.saturating_sub(window_size.height) / 2;
    window.set_outer_position(winit::dpi::PhysicalPosition::new(
        monitor_pos.x + x as i32,
        monitor_pos.y + y as i32,
    ));
}

fn run_viewer(source: VideoSource, window_scale: f32) -> Result<()> {
    let geometry = source.geometry();
    let info = ViewerInfo {
        file_name: source.file_name(),
        width: geometry.width,
        height: geometry.height,
        total_frames: source.total_frames(),
        format: source.pixel_format().label(),
    };

    let event_loop = EventLoop::<ViewerMessage>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let (input_tx, input) = input_channel();
    let display = ProxyDisplay::new(event_loop.create_proxy());
    let playback = spawn_playback(PlaybackController::new(source), display, input)
        .context("Failed to start playback thread")?;

    let mut viewer = ViewerApp::new(info, window_scale, input_tx);
    event_loop.run_app(&mut viewer)?;
    // Disconnects the input channel if nothing else told playback to stop
    drop(viewer);

    match playback.join() {
        Ok(result) => result.context("Playback failed"),
        Err(_) => bail!("Playback thread panicked"),
    }
}

fn crop(source: VideoSource, start: usize, end: usize, output: Option<&Path>) -> Result<()> {
    match output {
        Some(dest) => {
            media::crop::export_range(&source, start, end, dest)?;
        }
        None => {
            let cropped = media::crop::crop_in_place(source, start, end)?;
            log::info!(
                "{} now holds {} frames",
                cropped.file_name(),
                cropped.total_frames()
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("rawview: {e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    let Some(path) = args.file.clone() else {
        eprintln!("rawview: missing video file\n\n{USAGE}");
        std::process::exit(2);
    };

    let mut settings = SettingsConfig::load();
    args.apply(&mut settings);
    if args.save_settings {
        settings.save();
    }

    let source = VideoSource::open(&path, settings.geometry(), settings.rgb_order)
        .with_context(|| format!("Cannot open {}", path.display()))?;

    if let Some((start, end)) = args.crop {
        return crop(source, start, end, args.output.as_deref());
    }

    run_viewer(source, settings.window_scale)
}
