use winit::window::{CursorGrabMode, Window};

use crate::error::LockError;

/// Something that can capture the pointer exclusively
pub trait PointerTarget {
    /// Apply a grab mode; `CursorGrabMode::None` releases.
    fn grab(&self, mode: CursorGrabMode) -> Result<(), LockError>;

    /// Show or hide the cursor over the target
    fn show_cursor(&self, visible: bool);
}

impl PointerTarget for Window {
    fn grab(&self, mode: CursorGrabMode) -> Result<(), LockError> {
        self.set_cursor_grab(mode)
            .map_err(|e| LockError(format!("{:?}: {}", mode, e)))
    }

    fn show_cursor(&self, visible: bool) {
        self.set_cursor_visible(visible);
    }
}
