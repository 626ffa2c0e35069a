//! Application color palette.

use dtop_tui::{Rgba, Style};

/// Header/title text.
#[must_use]
pub fn header() -> Style {
    Style::new().fg(Rgba::rgb(220, 220, 235)).bold()
}

/// Panel borders.
#[must_use]
pub fn border() -> Style {
    Style::new().fg(Rgba::rgb(110, 110, 130))
}

/// Border of the focused panel.
#[must_use]
pub fn border_focused() -> Style {
    Style::new().fg(Rgba::rgb(120, 170, 255))
}

/// Default body text.
#[must_use]
pub fn text() -> Style {
    Style::new().fg(Rgba::rgb(190, 190, 200))
}

/// De-emphasized text (hints, background dots).
#[must_use]
pub fn muted() -> Style {
    Style::new().fg(Rgba::rgb(110, 110, 120)).dim()
}

/// Selected row / vertex highlight.
#[must_use]
pub fn selected() -> Style {
    Style::new().fg(Rgba::rgb(120, 170, 255)).bold()
}

/// Graph edge lines.
#[must_use]
pub fn edge() -> Style {
    Style::new().fg(Rgba::rgb(140, 140, 160))
}

/// Vertex capability glyphs.
#[must_use]
pub fn glyph() -> Style {
    Style::new().fg(Rgba::rgb(180, 160, 90))
}

/// Loading indicator.
#[must_use]
pub fn loading() -> Style {
    Style::new().fg(Rgba::rgb(120, 170, 255))
}
