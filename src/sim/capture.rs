//! Frame capture for video display modes
//!
//! Renders simulation frames into an RGB buffer and encodes the collected
//! frames as an animated GIF.

use std::fs::File;
use std::path::Path;

use gif::{Encoder, Frame, Repeat};

use crate::error::SimError;

/// A fixed-size RGB frame buffer
pub struct FrameBuffer {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Create a buffer of the given dimensions
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Fill the whole buffer with one color
    pub fn clear(&mut self, rgb: [u8; 3]) {
        for pixel in self.pixels.chunks_exact_mut(3) {
            pixel.copy_from_slice(&rgb);
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u16, h: u16, rgb: [u8; 3]) {
        for py in y.max(0)..(y + h as i32).min(self.height as i32) {
            for px in x.max(0)..(x + w as i32).min(self.width as i32) {
                let offset = (py as usize * self.width as usize + px as usize) * 3;
                self.pixels[offset..offset + 3].copy_from_slice(&rgb);
            }
        }
    }

    /// The raw RGB data, row-major
    pub fn rgb_data(&self) -> &[u8] {
        &self.pixels
    }
}

/// Collects frames and encodes them as an animated GIF
pub struct GifRecorder {
    frames: Vec<Vec<u8>>,
    width: u16,
    height: u16,
    /// Delay between frames in centiseconds
    frame_delay: u16,
}

impl GifRecorder {
    /// Create a recorder; `fps` is converted to a centisecond frame delay
    pub fn new(width: u16, height: u16, fps: u16) -> Self {
        let frame_delay = if fps > 0 { 100 / fps } else { 10 };
        Self {
            frames: Vec::new(),
            width,
            height,
            frame_delay,
        }
    }

    /// Record the buffer's current contents as one frame
    pub fn record(&mut self, buffer: &FrameBuffer) {
        self.frames.push(buffer.rgb_data().to_vec());
    }

    /// Number of recorded frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Encode all recorded frames as a looping GIF
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SimError> {
        if self.frames.is_empty() {
            return Err(SimError::Capture("no frames recorded".to_string()));
        }

        let file = File::create(path.as_ref())?;
        let mut encoder = Encoder::new(file, self.width, self.height, &[])
            .map_err(|e| SimError::Capture(e.to_string()))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| SimError::Capture(e.to_string()))?;

        for frame_data in &self.frames {
            let mut frame = Frame::from_rgb(self.width, self.height, frame_data);
            frame.delay = self.frame_delay;
            encoder
                .write_frame(&frame)
                .map_err(|e| SimError::Capture(e.to_string()))?;
        }

        Ok(())
    }
}
