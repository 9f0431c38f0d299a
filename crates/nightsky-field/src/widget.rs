//! Terminal presentation of a [`PixelCanvas`].

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::canvas::PixelCanvas;
use crate::color::to_terminal_color;

/// Glyph whose foreground paints the upper pixel and background the lower one.
const UPPER_HALF: &str = "▀";

/// Pixel size of a field that fills `area`: one column and two rows per cell.
pub fn viewport_for(area: Rect) -> (u32, u32) {
    (area.width as u32, area.height as u32 * 2)
}

/// Renders a canvas using half-block cells, two vertical pixels per cell.
#[derive(Debug, Clone, Copy)]
pub struct CanvasWidget<'a> {
    canvas: &'a PixelCanvas,
}

impl<'a> CanvasWidget<'a> {
    pub fn new(canvas: &'a PixelCanvas) -> Self {
        Self { canvas }
    }
}

impl Widget for CanvasWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = col as u32;
                let upper = self.canvas.pixel(x, row as u32 * 2);
                let lower = self.canvas.pixel(x, row as u32 * 2 + 1);
                let (Some(upper), Some(lower)) = (upper, lower) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF)
                        .set_fg(to_terminal_color(upper))
                        .set_bg(to_terminal_color(lower));
                }
            }
        }
    }
}
