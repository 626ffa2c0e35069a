//! Indeterminate-progress spinner frames.

/// Braille dot spinner animation frames.
pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// ASCII fallback frames.
pub const LINE: &[&str] = &["|", "/", "-", "\\"];

/// A tick-driven spinner.
#[derive(Debug, Clone, Copy)]
pub struct Spinner<'a> {
    frames: &'a [&'a str],
}

impl Default for Spinner<'_> {
    fn default() -> Self {
        Self { frames: DOTS }
    }
}

impl<'a> Spinner<'a> {
    /// Create a spinner with the default dot frames.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom frame set.
    #[must_use]
    pub fn frames(mut self, frames: &'a [&'a str]) -> Self {
        self.frames = frames;
        self
    }

    /// The frame for a given tick count.
    #[must_use]
    pub fn frame(&self, tick: u64) -> &'a str {
        if self.frames.is_empty() {
            return "";
        }
        self.frames[(tick as usize) % self.frames.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_frames() {
        let s = Spinner::new();
        assert_eq!(s.frame(0), DOTS[0]);
        assert_eq!(s.frame(3), DOTS[3]);
        assert_eq!(s.frame(DOTS.len() as u64), DOTS[0]);
    }

    #[test]
    fn custom_frames() {
        let s = Spinner::new().frames(LINE);
        assert_eq!(s.frame(1), "/");
    }

    #[test]
    fn empty_frames_safe() {
        let s = Spinner::new().frames(&[]);
        assert_eq!(s.frame(7), "");
    }
}
