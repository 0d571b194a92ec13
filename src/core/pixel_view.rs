use crate::error::{HostError, Result};

use super::abi::BYTES_PER_PIXEL;

/// Fixed window into compute module memory holding the RGBA surface.
///
/// Offset and length are settled once at instantiation. The view stores no
/// pointer, so memory growth inside the module never invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelView {
    offset: usize,
    len: usize,
    width: u32,
    height: u32,
}

impl PixelView {
    /// Build the view for a `width` x `height` surface starting at `offset`.
    pub fn new(offset: u32, width: i32, height: i32) -> Result<Self> {
        let invalid = || HostError::InvalidSurface { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid());
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(invalid)?;

        Ok(Self {
            offset: offset as usize,
            len,
            width: width as u32,
            height: height as u32,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Always `width * height * 4`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Borrow the surface bytes out of `memory`.
    pub fn slice<'a>(&self, memory: &'a [u8]) -> Result<&'a [u8]> {
        self.offset
            .checked_add(self.len)
            .and_then(|end| memory.get(self.offset..end))
            .ok_or(HostError::PixelBufferOutOfBounds {
                offset: self.offset as u64,
                len: self.len as u64,
                memory: memory.len() as u64,
            })
    }
}
