//! Render helpers for view tests
//!
//! ```ignore
//! let output = render_to_string(30, 8, |frame| {
//!     view.render(frame, frame.area(), props);
//! });
//! assert!(output.contains("Actions"));
//! ```

use ratatui::{backend::TestBackend, buffer::Buffer, Frame, Terminal};

/// Renders into an in-memory terminal of fixed size.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    /// Harness with a `width` x `height` screen.
    ///
    /// # Panics
    ///
    /// Panics if the test backend cannot be created.
    pub fn new(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .unwrap_or_else(|err| panic!("test backend: {err}"));
        Self { terminal }
    }

    /// Draw one frame and return the resulting buffer.
    pub fn render(&mut self, draw: impl FnOnce(&mut Frame)) -> &Buffer {
        self.terminal
            .draw(draw)
            .unwrap_or_else(|err| panic!("draw failed: {err}"));
        self.terminal.backend().buffer()
    }

    /// Draw one frame and return its text, one line per row.
    pub fn render_to_string(&mut self, draw: impl FnOnce(&mut Frame)) -> String {
        buffer_to_string(self.render(draw))
    }
}

/// Text content of a buffer, one line per row, styles dropped.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-shot [`RenderHarness::render_to_string`].
pub fn render_to_string(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> String {
    RenderHarness::new(width, height).render_to_string(draw)
}
