use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// before a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_rect_count: usize,
    pub last_line_count: usize,
    pub last_circle_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_rect_count = frame.layers().iter().map(|layer| layer.rects.len()).sum();
        self.last_line_count = frame.layers().iter().map(|layer| layer.lines.len()).sum();
        self.last_circle_count = frame.layers().iter().map(|layer| layer.circles.len()).sum();
        self.last_text_count = frame.layers().iter().map(|layer| layer.texts.len()).sum();
        Ok(())
    }
}
