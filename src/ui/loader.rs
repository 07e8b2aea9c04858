//! Animated spinner shown while a background operation is running.

use std::time::Duration;

use color_print::cformat;

/// Interval between two spinner frames
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

const FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {
    label: String,
    frame: usize,
}

impl Loader {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            frame: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Returns the loader advanced by one frame. The frame index wraps around.
    pub fn tick(&self) -> Self {
        Self {
            label: self.label.clone(),
            frame: (self.frame + 1) % FRAMES.len(),
        }
    }

    pub fn render(&self) -> String {
        cformat!("<#FF5FD7>{}</> {}...", FRAMES[self.frame], self.label)
    }
}
