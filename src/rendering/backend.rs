//! Graphics backends behind the rendering context.
//!
//! The context only knows how to hand transformed, axis-aligned rectangles to
//! a [`RenderBackend`]. Two implementations are provided:
//!
//! *   [`TermBackend`]: rasterizes world-space rectangles onto terminal cells
//!     and flushes them with `crossterm`, only rewriting cells that changed
//!     since the previous frame.
//! *   [`RecordingBackend`]: records every submission for assertions in
//!     tests.

use std::io;
use std::io::{stdout, Stdout, Write};

use crossterm::{cursor, queue, style};
use glam::Vec2;

use crate::rendering::color::Color;

/// Target for transformed geometry emitted through a
/// [`RenderContext`](crate::rendering::context::RenderContext).
pub trait RenderBackend {
    /// Viewport size in device cells (terminal columns and rows for the
    /// terminal backend).
    fn viewport(&self) -> (usize, usize);

    /// Starts a fresh frame, discarding anything submitted for the previous
    /// one.
    fn begin_frame(&mut self);

    /// Submits one axis-aligned rectangle in world coordinates, `min`
    /// componentwise below `max`.
    fn submit_rect(&mut self, min: Vec2, max: Vec2, color: Color);

    /// Flushes the current frame to the output device.
    fn present(&mut self) -> io::Result<()>;
}

/// Terminal backend. Maps the world rectangle `[-world_size/2,
/// world_size/2]` onto the full viewport, with the world's y axis pointing
/// up.
///
/// Submitted rectangles are alpha-composited over the default background in
/// submission order, so transparent cells show the background and later
/// plugins draw over earlier ones.
pub struct TermBackend<W: Write> {
    width: usize,
    height: usize,
    world_size: Vec2,
    default_bg: Color,
    /// The frame being accumulated, in composited colors.
    frame: Vec<Color>,
    /// The previously flushed frame, used to only rewrite changed cells.
    prev: Vec<[u8; 3]>,
    last_bg: [u8; 3],
    sink: W,
}

impl TermBackend<Stdout> {
    /// Creates a backend writing to stdout, sized to the current terminal.
    pub fn stdout(world_size: Vec2) -> io::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::new_with_sink(
            width as usize,
            height as usize,
            world_size,
            stdout(),
        ))
    }
}

impl<W: Write> TermBackend<W> {
    pub fn new_with_sink(width: usize, height: usize, world_size: Vec2, sink: W) -> Self {
        Self {
            width,
            height,
            world_size,
            default_bg: Color::BLACK,
            frame: vec![Color::BLACK; width * height],
            // sentinel that differs from any real frame, forcing a full
            // redraw on the first present
            prev: vec![[1, 2, 3]; width * height],
            last_bg: [1, 2, 3],
            sink,
        }
    }

    /// Sets the background shown behind transparent cells. Takes effect on
    /// the next frame.
    pub fn set_default_bg(&mut self, color: Color) {
        self.default_bg = Color::rgb(color.r, color.g, color.b);
    }

    /// Resizes the viewport, discarding both buffers.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.frame = vec![self.default_bg; width * height];
        self.prev = vec![[1, 2, 3]; width * height];
    }

    fn world_to_screen(&self, p: Vec2) -> (f32, f32) {
        let x = (p.x / self.world_size.x + 0.5) * self.width as f32;
        let y = (0.5 - p.y / self.world_size.y) * self.height as f32;
        (x, y)
    }
}

impl<W: Write> RenderBackend for TermBackend<W> {
    fn viewport(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn begin_frame(&mut self) {
        self.frame.fill(self.default_bg);
    }

    fn submit_rect(&mut self, min: Vec2, max: Vec2, color: Color) {
        if color.is_transparent() {
            return;
        }
        // the y axis flips, so the rect corners swap roles vertically
        let (x0, y1) = self.world_to_screen(min);
        let (x1, y0) = self.world_to_screen(max);

        let x0 = (x0.round().max(0.0) as usize).min(self.width);
        let x1 = (x1.round().max(0.0) as usize).min(self.width);
        let y0 = (y0.round().max(0.0) as usize).min(self.height);
        let y1 = (y1.round().max(0.0) as usize).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let idx = y * self.width + x;
                self.frame[idx] = color.over(self.frame[idx]);
            }
        }
    }

    fn present(&mut self) -> io::Result<()> {
        queue!(self.sink, cursor::MoveTo(0, 0))?;
        let mut curr_pos = (0usize, 0usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let rgb = self.frame[idx].to_rgb8();
                if rgb == self.prev[idx] {
                    continue;
                }
                if curr_pos != (x, y) {
                    queue!(self.sink, cursor::MoveTo(x as u16, y as u16))?;
                }
                if rgb != self.last_bg {
                    queue!(
                        self.sink,
                        style::SetBackgroundColor(style::Color::Rgb {
                            r: rgb[0],
                            g: rgb[1],
                            b: rgb[2],
                        })
                    )?;
                    self.last_bg = rgb;
                }
                queue!(self.sink, style::Print(' '))?;
                self.prev[idx] = rgb;
                curr_pos = (x + 1, y);
            }
        }
        self.sink.flush()
    }
}

/// An axis-aligned rectangle captured by [`RecordingBackend`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubmittedRect {
    pub min: Vec2,
    pub max: Vec2,
    pub color: Color,
}

/// Backend that records every submission instead of drawing. Used in tests
/// to assert on exactly what a drawable emitted.
#[derive(Debug)]
pub struct RecordingBackend {
    pub submitted: Vec<SubmittedRect>,
    pub frames_begun: usize,
    pub presents: usize,
    viewport: (usize, usize),
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            submitted: Vec::new(),
            frames_begun: 0,
            presents: 0,
            viewport: (80, 24),
        }
    }
}

impl RecordingBackend {
    pub fn with_viewport(width: usize, height: usize) -> Self {
        Self {
            viewport: (width, height),
            ..Self::default()
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn viewport(&self) -> (usize, usize) {
        self.viewport
    }

    fn begin_frame(&mut self) {
        self.frames_begun += 1;
        self.submitted.clear();
    }

    fn submit_rect(&mut self, min: Vec2, max: Vec2, color: Color) {
        self.submitted.push(SubmittedRect { min, max, color });
    }

    fn present(&mut self) -> io::Result<()> {
        self.presents += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_backend_rasterizes_into_cells() {
        let mut backend =
            TermBackend::new_with_sink(10, 10, Vec2::new(1.0, 1.0), Vec::<u8>::new());
        backend.begin_frame();
        // right half of the world, full height
        backend.submit_rect(Vec2::new(0.0, -0.5), Vec2::new(0.5, 0.5), Color::WHITE);

        let white = backend
            .frame
            .iter()
            .filter(|&&c| c == Color::WHITE)
            .count();
        assert_eq!(white, 50);
        // top-left stays background, top-right is covered
        assert_eq!(backend.frame[0], Color::BLACK);
        assert_eq!(backend.frame[9], Color::WHITE);
    }

    #[test]
    fn term_backend_skips_transparent_rects() {
        let mut backend =
            TermBackend::new_with_sink(4, 4, Vec2::new(1.0, 1.0), Vec::<u8>::new());
        backend.begin_frame();
        backend.submit_rect(
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Color::TRANSPARENT,
        );
        assert!(backend.frame.iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn present_only_rewrites_changed_cells() {
        let mut backend =
            TermBackend::new_with_sink(4, 2, Vec2::new(1.0, 1.0), Vec::<u8>::new());
        backend.begin_frame();
        backend.present().unwrap();
        let first_len = backend.sink.len();
        assert!(first_len > 0);

        // identical second frame emits no cell writes
        backend.begin_frame();
        backend.present().unwrap();
        let second_len = backend.sink.len() - first_len;
        assert!(second_len < first_len);
    }

    #[test]
    fn recording_backend_clears_per_frame() {
        let mut backend = RecordingBackend::default();
        backend.begin_frame();
        backend.submit_rect(Vec2::ZERO, Vec2::ONE, Color::RED);
        assert_eq!(backend.submitted.len(), 1);

        backend.begin_frame();
        assert!(backend.submitted.is_empty());
        assert_eq!(backend.frames_begun, 2);
    }
}
