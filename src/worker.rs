//! Background rendering variant.
//!
//! The main thread keeps the event loop, creates the window and the renderer,
//! and moves both to a worker thread in one message. The worker then loads
//! the compute module, sizes the renderer's surface texture and runs the
//! frame loop in isolation. The main thread sends nothing after the hand-off,
//! so the worker never relays input.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use winit::window::Window;

use crate::core::{ComputeModule, FramePump, Layout, ModuleConfig, SurfaceRenderer};
use crate::error::{HostError, Result};
use crate::frame::FpsMeter;

/// How long the worker idles while the window has no visible area
const IDLE_FRAME: Duration = Duration::from_millis(16);

/// The single message transferring rendering control to the worker
pub struct Handoff {
    pub window: Arc<Window>,
    pub renderer: SurfaceRenderer,
}

/// A spawned worker waiting for its hand-off
pub struct RenderWorker {
    sender: Sender<Handoff>,
    handle: JoinHandle<()>,
}

impl RenderWorker {
    pub fn spawn(config: ModuleConfig, stats: bool) -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("render-worker".to_string())
            .spawn(move || {
                if let Err(e) = run(receiver, config, stats) {
                    log::error!("Render worker stopped: {}", e);
                }
            })
            .map_err(HostError::display)?;

        Ok(Self { sender, handle })
    }

    /// Transfer rendering control. Consumes the worker, so it happens once.
    pub fn hand_off(self, window: Arc<Window>, renderer: SurfaceRenderer) -> Result<JoinHandle<()>> {
        self.sender
            .send(Handoff { window, renderer })
            .map_err(|_| HostError::Handoff)?;
        Ok(self.handle)
    }
}

fn run(receiver: Receiver<Handoff>, config: ModuleConfig, stats: bool) -> Result<()> {
    let Handoff { window, mut renderer } = receiver.recv().map_err(|_| HostError::Handoff)?;
    log::info!("Render worker took over {:?}", window.id());

    let module = ComputeModule::load(&config)?;
    let surface = module.dimensions();
    renderer.set_surface_size(surface)?;
    let mut pump = FramePump::start(module)?;
    let mut fps = FpsMeter::default();

    let mut viewport = (0, 0);
    let mut layout = None;

    loop {
        let size = window.inner_size();
        if (size.width, size.height) != viewport {
            viewport = (size.width, size.height);
            renderer.resize(size.width, size.height);
            layout = Layout::compute(surface, viewport);
            log::debug!("Worker viewport {}x{}: {:?}", size.width, size.height, layout.map(|l| l.fit));
        }

        match &layout {
            Some(layout) => {
                let frame = pump.tick(&mut renderer, layout)?;
                if stats {
                    if let Some(rate) = fps.record(frame.delta) {
                        log::info!("Worker FPS: {:.1}", rate);
                    }
                }
            }
            None => thread::sleep(IDLE_FRAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_without_handoff_stops() {
        let worker = RenderWorker::spawn(ModuleConfig::new("missing.wasm"), false).unwrap();
        let RenderWorker { sender, handle } = worker;
        drop(sender);
        // The worker sees the closed channel and exits instead of waiting forever
        handle.join().unwrap();
    }

    #[test]
    fn test_handoff_crosses_threads() {
        // The renderer is built on the main thread and moved in the message
        fn assert_send<T: Send>() {}
        assert_send::<Handoff>();
        assert_send::<Sender<Handoff>>();
    }
}
