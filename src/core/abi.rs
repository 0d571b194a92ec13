//! The fixed calling convention between the host and a compute module.
//!
//! Modules export `memory` (optional), `w`, `h`, the `p` global holding the
//! pixel buffer offset, a setup routine `i` and the per-frame routine `t`.
//! The host offers a growable `env.memory`.

/// Surface width accessor.
pub const EXPORT_WIDTH: &str = "w";
/// Surface height accessor.
pub const EXPORT_HEIGHT: &str = "h";
/// Global holding the byte offset of the RGBA pixel buffer.
pub const EXPORT_PIXELS: &str = "p";
/// One-time setup routine.
pub const EXPORT_SETUP: &str = "i";
/// Per-frame routine.
pub const EXPORT_TICK: &str = "t";
/// Linear memory, when the module exports its own.
pub const EXPORT_MEMORY: &str = "memory";

pub const IMPORT_MODULE: &str = "env";
pub const IMPORT_MEMORY: &str = "memory";

/// Initial pages of `env.memory` unless configured otherwise.
pub const DEFAULT_MEMORY_PAGES: u32 = 256;

pub const BYTES_PER_PIXEL: usize = 4;

/// Argument list of `t`, in call order.
pub type TickParams = (i32, i32, f32, f32, f32, f32, f32, i32, i32);

/// Everything a compute module sees of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Milliseconds since the session started.
    pub timestamp: f64,
    pub locked: bool,
    /// Pointer position relative to the display rectangle.
    pub mx: f32,
    pub my: f32,
    /// Relative motion accumulated since the previous frame.
    pub rx: f32,
    pub ry: f32,
    /// Display pixels per surface pixel.
    pub scale: f32,
    pub mouse_down: bool,
    pub mouse_up: bool,
}

impl FrameInput {
    /// Lower into the bare numeric arguments of `t`.
    ///
    /// The absolute position comes before the relative motion. Flags are
    /// passed as 0/1. The timestamp is truncated to whole milliseconds and
    /// wraps modulo 2^32 once it outgrows an i32.
    pub fn to_params(&self) -> TickParams {
        (
            (self.timestamp as i64) as i32,
            i32::from(self.locked),
            self.mx,
            self.my,
            self.rx,
            self.ry,
            self.scale,
            i32::from(self.mouse_down),
            i32::from(self.mouse_up),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_order() {
        let input = FrameInput {
            timestamp: 1234.9,
            locked: true,
            mx: 1.0,
            my: 2.0,
            rx: 3.0,
            ry: 4.0,
            scale: 8.0,
            mouse_down: true,
            mouse_up: false,
        };

        assert_eq!(input.to_params(), (1234, 1, 1.0, 2.0, 3.0, 4.0, 8.0, 1, 0));
    }

    #[test]
    fn test_default_is_neutral() {
        let (ts, locked, mx, my, rx, ry, scale, md, mu) = FrameInput::default().to_params();
        assert_eq!((ts, locked, md, mu), (0, 0, 0, 0));
        assert_eq!((mx, my, rx, ry, scale), (0.0, 0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_timestamp_wraps() {
        let at = |timestamp: f64| FrameInput {
            timestamp,
            ..Default::default()
        };

        assert_eq!(at(2_147_483_647.0).to_params().0, i32::MAX);
        assert_eq!(at(2_147_483_648.0).to_params().0, i32::MIN);
        assert_eq!(at(4_294_967_301.5).to_params().0, 5);
    }
}
