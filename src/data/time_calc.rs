//! File/code adapted from https://github.com/jamjamjon/usls

use std::time::{Duration, Instant};

/// Stage slots used by the pipeline.
pub const STAGE_DECODE: usize = 0;
pub const STAGE_NMS: usize = 1;
pub const STAGE_MASK: usize = 2;
pub const STAGE_SMOOTH: usize = 3;

pub const STAGE_NAMES: [&str; 4] = ["decode", "nms", "mask", "smoothing"];

/// Accumulated per-stage durations.
#[derive(Debug, Default, Clone)]
pub struct TimeCalc {
    n: usize,
    duration: Vec<Duration>,
}

impl TimeCalc {
    pub fn total(&self) -> Duration {
        self.duration.iter().sum::<Duration>()
    }

    /// Number of complete rounds recorded.
    pub fn n(&self) -> usize {
        if self.duration.is_empty() {
            return 0;
        }
        self.n / self.duration.len()
    }

    pub fn avg(&self) -> Duration {
        match self.n() {
            0 => Duration::ZERO,
            n => self.total() / n as u32,
        }
    }

    pub fn avg_i(&self, i: usize) -> Option<Duration> {
        let n = self.n().max(1);
        self.duration.get(i).map(|d| *d / n as u32)
    }

    pub fn ts(&self) -> &Vec<Duration> {
        &self.duration
    }

    pub fn add_or_push(&mut self, i: usize, x: Duration) {
        match self.duration.get_mut(i) {
            Some(elem) => *elem += x,
            None => {
                while self.duration.len() < i {
                    self.duration.push(Duration::ZERO);
                }
                self.duration.push(x)
            }
        }
        self.n += 1;
    }

    pub fn summary(&self) -> String {
        self.duration
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let name = STAGE_NAMES.get(i).copied().unwrap_or("stage");
                format!("{}: {:?}", name, self.avg_i(i).unwrap_or_default())
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn clear(&mut self) {
        self.n = Default::default();
        self.duration = Default::default();
    }
}

/// Frames-per-second counter over one-second windows.
#[derive(Debug, Clone)]
pub struct FrameRate {
    frames: u32,
    window_start: Instant,
    fps: f32,
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl FrameRate {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            fps: 0.,
        }
    }

    /// Counts one frame. Returns the new rate when a window closes.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn reset(&mut self, now: Instant) {
        *self = Self::new(now);
    }
}
