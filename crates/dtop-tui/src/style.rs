//! Colors and text styling.

/// A packed RGBA color (`0xRRGGBBAA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(u32);

impl Rgba {
    /// Create an opaque color from RGB components.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | 0xFF)
    }

    /// Red component.
    #[inline]
    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green component.
    #[inline]
    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue component.
    #[inline]
    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }
}

/// Text style: optional foreground/background plus attribute flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub bold: bool,
    pub dim: bool,
    pub reversed: bool,
}

impl Style {
    /// An empty style (terminal defaults).
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            dim: false,
            reversed: false,
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Rgba) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Rgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Enable bold.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Enable dim.
    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    /// Enable reverse video.
    #[must_use]
    pub const fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    /// Overlay `other` on top of this style: set fields win.
    #[must_use]
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            bold: self.bold || other.bold,
            dim: self.dim || other.dim,
            reversed: self.reversed || other.reversed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_components_roundtrip() {
        let c = Rgba::rgb(12, 200, 255);
        assert_eq!((c.r(), c.g(), c.b()), (12, 200, 255));
    }

    #[test]
    fn style_builder_chain() {
        let s = Style::new().fg(Rgba::rgb(1, 2, 3)).bold().dim();
        assert_eq!(s.fg, Some(Rgba::rgb(1, 2, 3)));
        assert!(s.bold && s.dim && !s.reversed);
    }

    #[test]
    fn patch_prefers_overlay() {
        let base = Style::new().fg(Rgba::rgb(1, 1, 1)).bg(Rgba::rgb(2, 2, 2));
        let overlay = Style::new().fg(Rgba::rgb(9, 9, 9)).bold();
        let merged = base.patch(overlay);
        assert_eq!(merged.fg, Some(Rgba::rgb(9, 9, 9)));
        assert_eq!(merged.bg, Some(Rgba::rgb(2, 2, 2)));
        assert!(merged.bold);
    }
}
