use std::time::{Duration, Instant};

/// Frame metadata - frame number and timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Milliseconds since the clock started
    pub timestamp: f64,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, timestamp: f64, delta: f32) -> Self {
        Self {
            number,
            timestamp,
            delta,
        }
    }
}

/// Infinite iterator that yields frame timing.
/// Use this in a loop: `for frame in clock { ... }`
#[derive(Debug)]
pub struct FrameClock {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameClock {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        Some(self.advance())
    }
}

impl FrameClock {
    /// Stamp the next frame
    pub fn advance(&mut self) -> FrameInfo {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        let timestamp = now.duration_since(self.start_time).as_secs_f64() * 1000.0;

        let info = FrameInfo::new(self.frame_number, timestamp, delta);

        self.frame_number += 1;
        self.last_frame_time = now;

        info
    }
}

/// Frames-per-second over fixed reporting windows
#[derive(Debug, Clone)]
pub struct FpsMeter {
    interval: f32,
    frames: u32,
    elapsed: f32,
}

impl FpsMeter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.as_secs_f32(),
            frames: 0,
            elapsed: 0.0,
        }
    }

    /// Count one frame. Returns the new rate when a window completes.
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed >= self.interval {
            let fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
            Some(fps)
        } else {
            None
        }
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
