use crate::core::layout::Layout;
use crate::error::Result;

/// Presentation surface the frame pump paints into
pub trait Painter {
    /// Paint one RGBA surface (`width * height * 4` bytes) into the
    /// display rectangle of `layout`.
    fn paint(&mut self, pixels: &[u8], layout: &Layout) -> Result<()>;
}
