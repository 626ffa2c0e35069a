//! Selectable list widget.

use crate::buffer::fit_to_width;
use crate::frame::Frame;
use crate::geometry::Rect;
use crate::style::Style;

/// A single list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem<'a> {
    pub text: &'a str,
    pub style: Style,
    pub disabled: bool,
}

impl<'a> ListItem<'a> {
    /// Create an enabled item.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default(),
            disabled: false,
        }
    }

    /// Set the item style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Mark the item disabled (rendered dim, skipped by activation).
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl<'a> From<&'a str> for ListItem<'a> {
    fn from(s: &'a str) -> Self {
        Self::new(s)
    }
}

/// Selection and scroll state for a [`List`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub selected: Option<usize>,
    pub offset: usize,
}

impl ListState {
    /// Move the cursor down, clamped to the last of `len` items.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        });
    }

    /// Move the cursor up.
    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        });
    }

    /// Clamp the cursor after the item list shrank.
    pub fn clamp(&mut self, len: usize) {
        match (self.selected, len) {
            (_, 0) => self.selected = None,
            (Some(i), _) if i >= len => self.selected = Some(len - 1),
            (None, _) => self.selected = Some(0),
            _ => {}
        }
    }

    /// Adjust the scroll offset so the selection is visible in a viewport
    /// of `visible` rows. Call after moving the selection; rendering never
    /// mutates state.
    pub fn scroll_into_view(&mut self, visible: usize) {
        let Some(selected) = self.selected else {
            return;
        };
        if visible == 0 {
            return;
        }
        if selected < self.offset {
            self.offset = selected;
        } else if selected >= self.offset + visible {
            self.offset = selected + 1 - visible;
        }
    }
}

/// A vertical list of rows with a highlighted cursor.
#[derive(Debug, Clone, Default)]
pub struct List<'a> {
    items: Vec<ListItem<'a>>,
    highlight_style: Style,
    highlight_symbol: &'a str,
}

impl<'a> List<'a> {
    /// Create a list from items.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = impl Into<ListItem<'a>>>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            highlight_style: Style::default(),
            highlight_symbol: "",
        }
    }

    /// Style applied to the selected row.
    #[must_use]
    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    /// Symbol drawn before the selected row.
    #[must_use]
    pub fn highlight_symbol(mut self, symbol: &'a str) -> Self {
        self.highlight_symbol = symbol;
        self
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render into `area` with the given selection/scroll state.
    pub fn render(&self, area: Rect, frame: &mut Frame, state: &ListState) {
        if area.is_empty() {
            return;
        }

        let gutter = self.highlight_symbol.len() as u16;
        for (row, item) in self
            .items
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(area.height as usize)
        {
            let y = area.y + (row - state.offset) as u16;
            let selected = state.selected == Some(row);
            let mut style = item.style;
            if item.disabled {
                style = style.dim();
            }
            if selected {
                style = style.patch(self.highlight_style);
                frame.buffer.fill(Rect::new(area.x, y, area.width, 1), ' ', style);
                frame
                    .buffer
                    .draw_str(area.x, y, self.highlight_symbol, style, area.width);
            }
            let x = area.x + if selected { gutter } else { gutter.min(area.width) };
            let max = area.width.saturating_sub(x - area.x);
            let text = fit_to_width(item.text, max);
            frame.buffer.draw_str(x, y, text, style, max);
        }
    }
}
