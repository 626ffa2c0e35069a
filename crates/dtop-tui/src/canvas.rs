//! Braille sub-pixel painter.
//!
//! Each terminal cell maps to a 2x4 grid of sub-pixels rendered with
//! Unicode Braille patterns (U+2800..U+28FF), giving line drawings eight
//! times the cell resolution.

use crate::buffer::Buffer;
use crate::cell::Cell;
use crate::geometry::Rect;
use crate::style::{Rgba, Style};

/// Sub-pixel columns per terminal cell.
pub const COLS_PER_CELL: u16 = 2;
/// Sub-pixel rows per terminal cell.
pub const ROWS_PER_CELL: u16 = 4;

/// Accumulates pixel-level drawing on a virtual grid, then rasterizes to
/// Braille cells.
#[derive(Debug, Clone)]
pub struct Painter {
    width: u16,
    height: u16,
    pixels: Vec<bool>,
    colors: Vec<Option<Rgba>>,
}

impl Painter {
    /// Create a painter with the given sub-pixel dimensions.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![false; len],
            colors: vec![None; len],
        }
    }

    /// Create a painter sized to fill a terminal area.
    #[must_use]
    pub fn for_area(area: Rect) -> Self {
        Self::new(area.width * COLS_PER_CELL, area.height * ROWS_PER_CELL)
    }

    /// Sub-pixel dimensions.
    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Clear all pixels.
    pub fn clear(&mut self) {
        self.pixels.fill(false);
        self.colors.fill(None);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Set a single pixel.
    pub fn point(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = true;
        }
    }

    /// Set a single pixel with a color.
    pub fn point_colored(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = true;
            self.colors[idx] = Some(color);
        }
    }

    /// True if a pixel is set.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.pixels[i]).unwrap_or(false)
    }

    /// Draw a line with Bresenham's algorithm.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Option<Rgba>) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx: i32 = if x0 < x1 { 1 } else { -1 };
        let sy: i32 = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut cx = x0;
        let mut cy = y0;

        loop {
            match color {
                Some(c) => self.point_colored(cx, cy, c),
                None => self.point(cx, cy),
            }
            if cx == x1 && cy == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                if cx == x1 {
                    break;
                }
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                if cy == y1 {
                    break;
                }
                err += dx;
                cy += sy;
            }
        }
    }

    /// Draw a polyline through the given sub-pixel points.
    pub fn polyline(&mut self, points: &[(i32, i32)], color: Option<Rgba>) {
        for pair in points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            self.line(x0, y0, x1, y1, color);
        }
    }

    /// Rasterize into a buffer region. Only cells with at least one lit
    /// pixel are written, so text drawn earlier survives underneath.
    pub fn render_to(&self, area: Rect, buffer: &mut Buffer, base: Style) {
        let cell_cols = area
            .width
            .min(self.width.div_ceil(COLS_PER_CELL));
        let cell_rows = area
            .height
            .min(self.height.div_ceil(ROWS_PER_CELL));

        for cy in 0..cell_rows {
            for cx in 0..cell_cols {
                let (ch, color) = self.braille_cell(
                    i32::from(cx) * i32::from(COLS_PER_CELL),
                    i32::from(cy) * i32::from(ROWS_PER_CELL),
                );
                if ch == ' ' {
                    continue;
                }
                let mut style = base;
                if let Some(c) = color {
                    style.fg = Some(c);
                }
                buffer.set(
                    area.x.saturating_add(cx),
                    area.y.saturating_add(cy),
                    Cell::styled(ch, style),
                );
            }
        }
    }

    // Braille dot numbering to bit mapping:
    // dot 1 (0,0) = bit 0    dot 4 (1,0) = bit 3
    // dot 2 (0,1) = bit 1    dot 5 (1,1) = bit 4
    // dot 3 (0,2) = bit 2    dot 6 (1,2) = bit 5
    // dot 7 (0,3) = bit 6    dot 8 (1,3) = bit 7
    fn braille_cell(&self, px_x: i32, px_y: i32) -> (char, Option<Rgba>) {
        const DOT_BITS: [[u8; 4]; 2] = [[0, 1, 2, 6], [3, 4, 5, 7]];

        let mut bits: u8 = 0;
        let mut first_color: Option<Rgba> = None;
        for col in 0..2i32 {
            for row in 0..4i32 {
                let x = px_x + col;
                let y = px_y + row;
                if self.get(x, y) {
                    bits |= 1 << DOT_BITS[col as usize][row as usize];
                    if first_color.is_none()
                        && let Some(idx) = self.index(x, y)
                    {
                        first_color = self.colors[idx];
                    }
                }
            }
        }

        if bits == 0 {
            (' ', None)
        } else {
            let ch = char::from_u32(0x2800 + u32::from(bits)).unwrap_or(' ');
            (ch, first_color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_and_get() {
        let mut p = Painter::new(10, 10);
        assert!(!p.get(5, 5));
        p.point(5, 5);
        assert!(p.get(5, 5));
    }

    #[test]
    fn out_of_bounds_ignored() {
        let mut p = Painter::new(10, 10);
        p.point(-1, 0);
        p.point(10, 0);
        assert!(!p.get(-1, 0));
        assert!(!p.get(10, 0));
    }

    #[test]
    fn bresenham_diagonal() {
        let mut p = Painter::new(10, 10);
        p.line(0, 0, 9, 9, None);
        for i in 0..10 {
            assert!(p.get(i, i), "pixel ({i}, {i}) should be set");
        }
    }

    #[test]
    fn bresenham_single_point() {
        let mut p = Painter::new(10, 10);
        p.line(5, 5, 5, 5, None);
        assert!(p.get(5, 5));
    }

    #[test]
    fn polyline_joins_segments() {
        let mut p = Painter::new(10, 10);
        p.polyline(&[(0, 0), (4, 0), (4, 4)], None);
        assert!(p.get(2, 0));
        assert!(p.get(4, 2));
    }

    #[test]
    fn braille_single_dot() {
        let mut p = Painter::new(2, 4);
        p.point(0, 0);
        assert_eq!(p.braille_cell(0, 0).0, '\u{2801}');
    }

    #[test]
    fn braille_all_dots() {
        let mut p = Painter::new(2, 4);
        for y in 0..4 {
            for x in 0..2 {
                p.point(x, y);
            }
        }
        assert_eq!(p.braille_cell(0, 0).0, '\u{28FF}');
    }

    #[test]
    fn render_skips_empty_cells() {
        let mut p = Painter::new(4, 8);
        p.point(0, 0);
        let mut buf = Buffer::new(2, 2);
        buf.set(1, 1, Cell::from_char('k'));
        p.render_to(Rect::new(0, 0, 2, 2), &mut buf, Style::new());
        assert_eq!(buf.get(0, 0).unwrap().ch, '\u{2801}');
        // Untouched cell keeps its prior content.
        assert_eq!(buf.get(1, 1).unwrap().ch, 'k');
    }

    #[test]
    fn colored_point_carries_into_cell() {
        let mut p = Painter::new(2, 4);
        let red = Rgba::rgb(255, 0, 0);
        p.point_colored(0, 0, red);
        let (_, color) = p.braille_cell(0, 0);
        assert_eq!(color, Some(red));
    }

    #[test]
    fn for_area_resolution() {
        let p = Painter::for_area(Rect::new(0, 0, 10, 5));
        assert_eq!(p.size(), (20, 20));
    }
}
