use crate::error::Result;
use crate::frame::{FrameClock, FrameInfo};
use crate::traits::Painter;

use super::compute_module::ComputeModule;
use super::input_adapter::InputAccumulator;
use super::layout::Layout;

/// Drives a compute module one frame at a time.
///
/// Each tick hands the accumulated input to the module, clears the one-shot
/// fields and paints the module's pixel buffer. Never re-entered; the caller
/// schedules the next tick.
#[derive(Debug)]
pub struct FramePump {
    module: ComputeModule,
    input: InputAccumulator,
    clock: FrameClock,
}

impl FramePump {
    /// Run the module's setup routine and start the session clock.
    pub fn start(mut module: ComputeModule) -> Result<Self> {
        module.setup()?;
        Ok(Self {
            module,
            input: InputAccumulator::new(),
            clock: FrameClock::new(),
        })
    }

    pub fn module(&self) -> &ComputeModule {
        &self.module
    }

    pub fn surface(&self) -> (u32, u32) {
        self.module.dimensions()
    }

    pub fn input(&self) -> &InputAccumulator {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputAccumulator {
        &mut self.input
    }

    /// Run one frame and paint it into `layout`'s display rectangle.
    pub fn tick(&mut self, painter: &mut impl Painter, layout: &Layout) -> Result<FrameInfo> {
        let frame = self.clock.advance();
        let input = self.input.take(frame.timestamp, layout.scale());

        self.module.tick(&input)?;
        self.module
            .with_pixels(|pixels| painter.paint(pixels, layout))??;

        Ok(frame)
    }
}
