use winit::event::{DeviceEvent, ElementState, WindowEvent};

use super::abi::FrameInput;
use super::layout::Layout;

/// What the host has to do after an event was folded into the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relay {
    /// Nothing beyond the bookkeeping already done
    Absorbed,
    /// A button went down while the pointer was free
    RequestLock,
}

/// Input collected between two frame ticks.
///
/// Owned by the frame loop. `rx`, `ry` and both button flags are one-shot:
/// [`InputAccumulator::take`] hands them to exactly one tick and zeroes them.
/// The pointer position and the lock flag persist.
#[derive(Debug, Clone, Default)]
pub struct InputAccumulator {
    locked: bool,
    mx: f32,
    my: f32,
    rx: f32,
    ry: f32,
    mouse_down: bool,
    mouse_up: bool,
}

impl InputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a window event in. Positions are made relative to `layout`.
    pub fn process_window_event(&mut self, event: &WindowEvent, layout: Option<&Layout>) -> Relay {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = match layout {
                    Some(layout) => layout.to_local(position.x, position.y),
                    None => (position.x as f32, position.y as f32),
                };
                self.move_to(x, y);
                Relay::Absorbed
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => {
                if self.press() {
                    Relay::RequestLock
                } else {
                    Relay::Absorbed
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } => {
                self.release();
                Relay::Absorbed
            }
            _ => Relay::Absorbed,
        }
    }

    /// Fold a raw device event in
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.add_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    pub fn add_motion(&mut self, dx: f32, dy: f32) {
        self.rx += dx;
        self.ry += dy;
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.mx = x;
        self.my = y;
    }

    /// Record a button press. Returns true when a pointer lock should be requested.
    pub fn press(&mut self) -> bool {
        self.mouse_down = true;
        !self.locked
    }

    pub fn release(&mut self) {
        self.mouse_up = true;
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Accumulated relative motion not yet consumed
    pub fn motion(&self) -> (f32, f32) {
        (self.rx, self.ry)
    }

    /// Build the input for one tick and clear the one-shot fields.
    pub fn take(&mut self, timestamp: f64, scale: f32) -> FrameInput {
        let input = FrameInput {
            timestamp,
            locked: self.locked,
            mx: self.mx,
            my: self.my,
            rx: self.rx,
            ry: self.ry,
            scale,
            mouse_down: self.mouse_down,
            mouse_up: self.mouse_up,
        };

        self.rx = 0.0;
        self.ry = 0.0;
        self.mouse_down = false;
        self.mouse_up = false;

        input
    }
}
