//! Bordered panel with an optional title.

use crate::Widget;
use crate::buffer::fit_to_width;
use crate::cell::Cell;
use crate::frame::Frame;
use crate::geometry::Rect;
use crate::style::Style;

/// A rectangular border with an optional title in the top edge.
#[derive(Debug, Clone, Default)]
pub struct Panel<'a> {
    title: Option<&'a str>,
    style: Style,
    border_style: Style,
}

impl<'a> Panel<'a> {
    /// Create an untitled panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Set the interior base style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the border style.
    #[must_use]
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    /// The drawable area inside the border.
    #[must_use]
    pub fn inner(area: Rect) -> Rect {
        area.inset(1)
    }
}

impl Widget for Panel<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.width < 2 || area.height < 2 {
            return;
        }
        let buf = &mut frame.buffer;
        let right = area.right() - 1;
        let bottom = area.bottom() - 1;

        buf.fill(area.inset(1), ' ', self.style);

        for x in (area.x + 1)..right {
            buf.set(x, area.y, Cell::styled('─', self.border_style));
            buf.set(x, bottom, Cell::styled('─', self.border_style));
        }
        for y in (area.y + 1)..bottom {
            buf.set(area.x, y, Cell::styled('│', self.border_style));
            buf.set(right, y, Cell::styled('│', self.border_style));
        }
        buf.set(area.x, area.y, Cell::styled('┌', self.border_style));
        buf.set(right, area.y, Cell::styled('┐', self.border_style));
        buf.set(area.x, bottom, Cell::styled('└', self.border_style));
        buf.set(right, bottom, Cell::styled('┘', self.border_style));

        if let Some(title) = self.title
            && area.width > 4
        {
            let max = area.width - 4;
            let text = fit_to_width(title, max);
            buf.draw_str(area.x + 2, area.y, text, self.border_style, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(frame: &Frame, y: u16) -> String {
        (0..frame.buffer.width())
            .filter_map(|x| frame.buffer.get(x, y))
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect()
    }

    #[test]
    fn draws_border() {
        let mut frame = Frame::new(5, 3);
        Panel::new().render(Rect::new(0, 0, 5, 3), &mut frame);
        assert_eq!(row(&frame, 0), "┌───┐");
        assert_eq!(row(&frame, 1), "│   │");
        assert_eq!(row(&frame, 2), "└───┘");
    }

    #[test]
    fn title_embedded_in_top_edge() {
        let mut frame = Frame::new(10, 3);
        Panel::new()
            .title("ab")
            .render(Rect::new(0, 0, 10, 3), &mut frame);
        assert_eq!(row(&frame, 0), "┌─ab─────┐");
    }

    #[test]
    fn long_title_truncated() {
        let mut frame = Frame::new(8, 3);
        Panel::new()
            .title("abcdefgh")
            .render(Rect::new(0, 0, 8, 3), &mut frame);
        assert_eq!(row(&frame, 0), "┌─abcd─┐");
    }

    #[test]
    fn degenerate_area_noop() {
        let mut frame = Frame::new(4, 4);
        Panel::new().render(Rect::new(0, 0, 1, 1), &mut frame);
        assert_eq!(row(&frame, 0), "    ");
    }

    #[test]
    fn inner_shrinks_by_one() {
        assert_eq!(Panel::inner(Rect::new(0, 0, 10, 6)), Rect::new(1, 1, 8, 4));
    }
}
