//! Beatolizer - A wireframe sphere that dances to your music
//!
//! Every frame the sphere's vertices are pushed outward by the loudness of
//! the frequency bin they listen to, and the whole surface takes a hue from
//! the overall intensity.

use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use beatolizer::audio::{AudioSession, SpectrumSource};
use beatolizer::cli::Args;
use beatolizer::controls::{self, ControlAction};
use beatolizer::frame::{wall_clock_seconds, FrameDriver, FrameLoop, Schedule};
use beatolizer::params::{AnalyserConfig, ParamStore, RenderConfig};
use beatolizer::rendering::RenderSystem;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Animation
    frame_loop: FrameLoop,
    store: ParamStore,

    // Configuration
    render_config: RenderConfig,
    analyser_config: AnalyserConfig,
}

impl App {
    fn new(frame_loop: FrameLoop, store: ParamStore) -> Self {
        Self {
            window: None,
            render_system: None,
            frame_loop,
            store,
            render_config: RenderConfig::default(),
            analyser_config: AnalyserConfig::default(),
        }
    }

    /// Start playing `path`, replacing any current session
    fn load_file(&mut self, path: &Path) {
        match AudioSession::start(path, self.analyser_config.clone()) {
            Ok(session) => {
                self.frame_loop.load_session(Box::new(session));
                println!("Playing {}", path.display());
            }
            Err(e) => log::error!("Could not play {}: {}", path.display(), e),
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.frame_loop.teardown();
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, action: ControlAction) {
        match action {
            ControlAction::Adjust(control, steps) => {
                controls::adjust(&self.store, control, steps);
            }
            ControlAction::TogglePause => match self.frame_loop.toggle_pause() {
                Some(true) => println!("Paused"),
                Some(false) => println!("Playing"),
                None => println!("No audio loaded"),
            },
            ControlAction::PrintParams => {
                println!("\n{}\n", controls::describe(&self.store.load()));
            }
            ControlAction::Quit => self.shutdown(event_loop),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.frame_loop.is_running() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Beatolizer - Audio-Reactive Sphere")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.shutdown(event_loop);
                return;
            }
        };

        // Initialize rendering system
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.frame_loop.driver().base_mesh(),
            self.render_config.clone(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("Failed to initialise renderer: {}", e);
                self.shutdown(event_loop);
                return;
            }
        };

        println!("\nBeatolizer is running!");
        if !self.frame_loop.has_audio() {
            println!("No audio loaded: drop a .wav file on the window");
        }
        println!("{}\n", controls::HELP);

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::DroppedFile(path) => self.load_file(&path),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat,
                        ..
                    },
                ..
            } => match controls::action_for_key(code) {
                // Holding space must not flicker playback
                Some(ControlAction::TogglePause) if repeat => {}
                Some(action) => self.handle_key(event_loop, action),
                None => {}
            },
            WindowEvent::RedrawRequested => {
                let Some(render_system) = self.render_system.as_mut() else {
                    return;
                };
                if self.frame_loop.tick(wall_clock_seconds(), render_system) == Schedule::Stop {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("Beatolizer - Audio-reactive wireframe sphere");
    println!("Initializing systems...\n");

    let params = args.sphere_params();
    let store = ParamStore::new(params);

    let driver = match FrameDriver::new(&params, args.mesh_config()) {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("Failed to build sphere: {}", e);
            std::process::exit(1);
        }
    };
    let frame_loop = FrameLoop::new(driver, SpectrumSource::new(), store.subscribe());

    let mut app = App::new(frame_loop, store);
    if let Some(path) = &args.file {
        app.load_file(path);
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}
