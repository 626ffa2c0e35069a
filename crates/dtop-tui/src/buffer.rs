//! Row-major cell grid with width-aware text drawing.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cell::{CONTINUATION, Cell};
use crate::geometry::Rect;
use crate::style::Style;

/// A rectangular grid of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a blank buffer.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(); width as usize * height as usize],
        }
    }

    /// Buffer width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer area.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank());
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Write a cell; out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
    }

    /// Read a cell.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Apply a style to every cell in the region (content untouched).
    pub fn set_style(&mut self, area: Rect, style: Style) {
        let clipped = self.area().intersection(&area);
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                if let Some(idx) = self.index(x, y) {
                    self.cells[idx].style = self.cells[idx].style.patch(style);
                }
            }
        }
    }

    /// Fill a region with a character.
    pub fn fill(&mut self, area: Rect, ch: char, style: Style) {
        let clipped = self.area().intersection(&area);
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, Cell::styled(ch, style));
            }
        }
    }

    /// Draw a string starting at `(x, y)`, clipped to `max_width` columns
    /// and to the buffer. Wide characters occupy two columns, with the
    /// trailing column marked as a continuation. Returns columns written.
    pub fn draw_str(&mut self, x: u16, y: u16, text: &str, style: Style, max_width: u16) -> u16 {
        if y >= self.height || x >= self.width {
            return 0;
        }
        let limit = max_width.min(self.width - x);
        let mut col = 0u16;

        for grapheme in text.graphemes(true) {
            let w = grapheme.width() as u16;
            if w == 0 {
                continue;
            }
            if col + w > limit {
                break;
            }
            // The grid stores one char per cell; pick the grapheme's base
            // character (combining marks are dropped at this resolution).
            let ch = grapheme.chars().next().unwrap_or(' ');
            let ch_w = ch.width().unwrap_or(1).max(1) as u16;
            self.set(x + col, y, Cell::styled(ch, style));
            for extra in 1..ch_w.min(w) {
                self.set(x + col + extra, y, Cell::styled(CONTINUATION, style));
            }
            col += w;
        }
        col
    }
}

/// Truncate `text` to at most `max_width` display columns on a grapheme
/// boundary.
#[must_use]
pub fn fit_to_width(text: &str, max_width: u16) -> &str {
    if text.width() <= max_width as usize {
        return text;
    }
    let mut cols = 0usize;
    let mut end = 0usize;
    for (offset, grapheme) in text.grapheme_indices(true) {
        let w = grapheme.width();
        if cols + w > max_width as usize {
            break;
        }
        cols += w;
        end = offset + grapheme.len();
    }
    &text[..end]
}
