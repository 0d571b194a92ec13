use std::sync::Arc;
use std::thread::JoinHandle;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::core::{ComputeModule, FramePump, InputRelay, Layout, ModuleConfig, SurfaceRenderer};
use crate::error::{HostError, Result};
use crate::frame::{FpsMeter, FrameInfo};
use crate::worker::RenderWorker;

// === Constants ===

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;

/// Where the compute module runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// On the event loop thread, with input relay
    Inline,
    /// On a background thread that owns the renderer after a single hand-off
    Worker,
}

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub module: ModuleConfig,
    pub mode: RenderMode,
    pub title: String,
    /// Log the frame rate once per second
    pub stats: bool,
}

/// Session lifecycle. `Failed` is terminal.
enum HostState {
    Uninitialized,
    Loading,
    Running(Box<Session>),
    Delegated {
        window: Arc<Window>,
        _worker: JoinHandle<()>,
    },
    Failed,
}

impl HostState {
    fn name(&self) -> &'static str {
        match self {
            HostState::Uninitialized => "uninitialized",
            HostState::Loading => "loading",
            HostState::Running(_) => "running",
            HostState::Delegated { .. } => "delegated",
            HostState::Failed => "failed",
        }
    }
}

/// What the event loop should do after an event
enum Control {
    Continue,
    Frame(FrameInfo),
    Exit,
}

/// Everything alive while the module runs inline
struct Session {
    window: Arc<Window>,
    renderer: SurfaceRenderer,
    pump: FramePump,
    layout: Option<Layout>,
    relay: InputRelay,
}

impl Session {
    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.renderer.resize(size.width, size.height);
        self.layout = Layout::compute(self.pump.surface(), (size.width, size.height));

        match &self.layout {
            Some(layout) => {
                log::debug!(
                    "Viewport {}x{}: {:?}, display {}x{} at ({}, {})",
                    size.width,
                    size.height,
                    layout.fit,
                    layout.rect.width,
                    layout.rect.height,
                    layout.rect.x,
                    layout.rect.y
                );
                self.window.request_redraw();
            }
            None => log::debug!("Viewport is empty, pausing frames"),
        }
    }

    /// One animation frame. Reschedules itself unless the viewport is empty.
    fn tick(&mut self) -> Result<Option<FrameInfo>> {
        let Some(layout) = self.layout else {
            return Ok(None);
        };

        let frame = self.pump.tick(&mut self.renderer, &layout)?;
        self.window.request_redraw();
        Ok(Some(frame))
    }

    fn handle_event(&mut self, event: WindowEvent) -> Result<Control> {
        match event {
            WindowEvent::CloseRequested => return Ok(Control::Exit),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                if self.relay.escape(self.pump.input_mut(), &*self.window) {
                    return Ok(Control::Exit);
                }
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::RedrawRequested => {
                if let Some(frame) = self.tick()? {
                    return Ok(Control::Frame(frame));
                }
            }
            other => self.relay.window_event(
                &other,
                self.pump.input_mut(),
                self.layout.as_ref(),
                &*self.window,
            ),
        }
        Ok(Control::Continue)
    }
}

/// Window host for a compute module
pub struct FrameHost {
    config: HostConfig,
    state: HostState,
    fps: FpsMeter,
    error: Option<HostError>,
}

impl FrameHost {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            state: HostState::Uninitialized,
            fps: FpsMeter::default(),
            error: None,
        }
    }

    /// The error that ended the session, if any
    pub fn error(&self) -> Option<&HostError> {
        self.error.as_ref()
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(self.config.title.as_str())
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            )
            .map_err(HostError::display)?;
        Ok(Arc::new(window))
    }

    /// Load the module, open the window and start the frame loop
    fn initialize(&self, event_loop: &ActiveEventLoop) -> Result<Session> {
        let module = ComputeModule::load(&self.config.module)?;
        let surface = module.dimensions();

        let window = self.create_window(event_loop)?;
        let mut renderer = pollster::block_on(SurfaceRenderer::new(window.clone()))?;
        renderer.set_surface_size(surface)?;
        let pump = FramePump::start(module)?;

        let mut session = Session {
            window,
            renderer,
            pump,
            layout: None,
            relay: InputRelay::new(),
        };
        let size = session.window.inner_size();
        session.resize(size);

        Ok(session)
    }

    /// Open the window, build the renderer and hand both to a worker thread
    fn delegate(&self, event_loop: &ActiveEventLoop) -> Result<HostState> {
        let worker = RenderWorker::spawn(self.config.module.clone(), self.config.stats)?;
        let window = self.create_window(event_loop)?;
        let renderer = pollster::block_on(SurfaceRenderer::new(window.clone()))?;
        let handle = worker.hand_off(window.clone(), renderer)?;

        Ok(HostState::Delegated {
            window,
            _worker: handle,
        })
    }

    fn record_frame(&mut self, frame: FrameInfo) {
        if !self.config.stats {
            return;
        }
        if let Some(fps) = self.fps.record(frame.delta) {
            log::info!("FPS: {:.1} (frame {})", fps, frame.number);
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: HostError) {
        log::error!("{}", err);
        self.state = HostState::Failed;
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for FrameHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, HostState::Uninitialized) {
            return;
        }

        self.state = HostState::Loading;
        log::info!("Loading {}", self.config.module.path.display());

        let next = match self.config.mode {
            RenderMode::Inline => self
                .initialize(event_loop)
                .map(|session| HostState::Running(Box::new(session))),
            RenderMode::Worker => self.delegate(event_loop),
        };

        match next {
            Ok(state) => {
                self.state = state;
                log::info!("Frame host {}", self.state.name());
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let outcome = match &mut self.state {
            HostState::Running(session) => session.handle_event(event),
            HostState::Delegated { window, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => Ok(Control::Exit),
                WindowEvent::Resized(size) => {
                    log::debug!("Window {:?} resized to {}x{}", window.id(), size.width, size.height);
                    Ok(Control::Continue)
                }
                _ => Ok(Control::Continue),
            },
            HostState::Uninitialized | HostState::Loading | HostState::Failed => match event {
                WindowEvent::CloseRequested => Ok(Control::Exit),
                _ => Ok(Control::Continue),
            },
        };

        match outcome {
            Ok(Control::Continue) => {}
            Ok(Control::Frame(frame)) => self.record_frame(frame),
            Ok(Control::Exit) => event_loop.exit(),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let HostState::Running(session) = &mut self.state {
            session.pump.input_mut().process_device_event(&event);
        }
    }
}
