use winit::window::CursorGrabMode;

use crate::error::LockError;
use crate::traits::PointerTarget;

/// Grab modes in order of preference. `Locked` keeps the cursor in place and
/// only reports raw motion; `Confined` is the fallback where locking is not
/// supported.
pub const GRAB_MODES: [CursorGrabMode; 2] = [CursorGrabMode::Locked, CursorGrabMode::Confined];

/// Return the first grab mode in `modes` that `target` accepts.
pub fn acquire(target: &impl PointerTarget, modes: &[CursorGrabMode]) -> Result<CursorGrabMode, LockError> {
    let mut last_error = LockError("no grab mode available".to_string());
    for &mode in modes {
        match target.grab(mode) {
            Ok(()) => return Ok(mode),
            Err(e) => last_error = e,
        }
    }
    Err(last_error)
}

/// Exclusive pointer capture state of the window.
#[derive(Debug, Clone, Default)]
pub struct PointerLock {
    mode: Option<CursorGrabMode>,
}

impl PointerLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.mode.is_some()
    }

    /// Try to capture the pointer. A failure leaves the pointer unlocked.
    pub fn request(&mut self, target: &impl PointerTarget) -> Result<CursorGrabMode, LockError> {
        match acquire(target, &GRAB_MODES) {
            Ok(mode) => {
                target.show_cursor(false);
                self.mode = Some(mode);
                Ok(mode)
            }
            Err(e) => {
                self.mode = None;
                Err(e)
            }
        }
    }

    /// Give the pointer back
    pub fn release(&mut self, target: &impl PointerTarget) {
        if self.mode.take().is_some() {
            if let Err(e) = target.grab(CursorGrabMode::None) {
                log::debug!("Releasing pointer: {}", e);
            }
            target.show_cursor(true);
        }
    }
}
