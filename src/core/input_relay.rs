use winit::event::WindowEvent;

use super::input_adapter::{InputAccumulator, Relay};
use super::layout::Layout;
use super::pointer_lock::PointerLock;
use crate::traits::PointerTarget;

/// Routes window input into the accumulator and keeps the pointer lock in
/// step with the lock flag the module sees.
#[derive(Debug, Clone, Default)]
pub struct InputRelay {
    lock: PointerLock,
}

impl InputRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `event` into `input`. A press on a free pointer asks `target`
    /// for a lock; losing focus gives it back.
    pub fn window_event(
        &mut self,
        event: &WindowEvent,
        input: &mut InputAccumulator,
        layout: Option<&Layout>,
        target: &impl PointerTarget,
    ) {
        if let WindowEvent::Focused(false) = event {
            self.release(input, target);
            return;
        }

        if input.process_window_event(event, layout) == Relay::RequestLock {
            self.request(input, target);
        }
    }

    /// Escape releases a held lock. Returns true when nothing was locked and
    /// the host should close instead.
    pub fn escape(&mut self, input: &mut InputAccumulator, target: &impl PointerTarget) -> bool {
        if !self.lock.is_locked() {
            return true;
        }
        self.release(input, target);
        false
    }

    fn request(&mut self, input: &mut InputAccumulator, target: &impl PointerTarget) {
        match self.lock.request(target) {
            Ok(mode) => log::debug!("Pointer locked ({:?})", mode),
            Err(e) => log::warn!("{}", e),
        }
        input.set_locked(self.lock.is_locked());
    }

    fn release(&mut self, input: &mut InputAccumulator, target: &impl PointerTarget) {
        self.lock.release(target);
        input.set_locked(self.lock.is_locked());
    }
}
