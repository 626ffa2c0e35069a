//! Transient toast notifications.
//!
//! Fire-and-forget: callers push `{message, severity}` and the manager
//! expires entries after a fixed number of runtime ticks. Rendered stacked
//! in the top-right corner.

use std::collections::VecDeque;

use unicode_width::UnicodeWidthStr;

use crate::buffer::fit_to_width;
use crate::frame::Frame;
use crate::geometry::Rect;
use crate::style::{Rgba, Style};

/// Message severity, mirrored in the icon and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    /// Icon shown before the message.
    #[must_use]
    pub const fn icon(self) -> char {
        match self {
            Self::Success => '\u{2713}', // ✓
            Self::Error => '\u{2717}',   // ✗
        }
    }

    /// Accent style for the toast.
    #[must_use]
    pub const fn style(self) -> Style {
        match self {
            Self::Success => Style::new().fg(Rgba::rgb(80, 200, 120)),
            Self::Error => Style::new().fg(Rgba::rgb(230, 90, 90)),
        }
    }
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    age_ticks: u32,
}

/// Queue of live toasts with timed expiry.
#[derive(Debug, Clone)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
    ttl_ticks: u32,
    max_visible: usize,
}

impl Default for ToastManager {
    fn default() -> Self {
        // 16 ticks at the runtime's 250ms cadence is four seconds.
        Self::new(16, 4)
    }
}

impl ToastManager {
    /// Create a manager with an explicit time-to-live and stack depth.
    #[must_use]
    pub fn new(ttl_ticks: u32, max_visible: usize) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl_ticks,
            max_visible,
        }
    }

    /// Enqueue a notification.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        self.toasts.push_back(Toast {
            message: message.into(),
            severity,
            age_ticks: 0,
        });
        while self.toasts.len() > self.max_visible {
            self.toasts.pop_front();
        }
    }

    /// Advance one tick, dropping expired toasts.
    pub fn tick(&mut self) {
        for toast in &mut self.toasts {
            toast.age_ticks += 1;
        }
        let ttl = self.ttl_ticks;
        self.toasts.retain(|t| t.age_ticks < ttl);
    }

    /// Live toasts, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Number of live toasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// True when no toasts are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Render the stack into the top-right corner of `area`.
    pub fn render(&self, area: Rect, frame: &mut Frame) {
        let margin = 1u16;
        let mut y = area.y + margin;
        for toast in &self.toasts {
            if y >= area.bottom() {
                break;
            }
            let icon_and_pad = 3u16; // "✓ " + trailing space
            let max_text = area.width.saturating_sub(margin + icon_and_pad + 1);
            let text = fit_to_width(&toast.message, max_text);
            let width = (text.width() as u16 + icon_and_pad + 1).min(area.width);
            let x = area
                .right()
                .saturating_sub(width)
                .saturating_sub(margin)
                .max(area.x);
            let style = toast.severity.style().reversed();
            frame
                .buffer
                .fill(Rect::new(x, y, width, 1), ' ', style);
            let mut col = x + 1;
            frame.buffer.set(
                col,
                y,
                crate::cell::Cell::styled(toast.severity.icon(), style),
            );
            col += 2;
            frame.buffer.draw_str(col, y, text, style, max_text);
            y += 2;
        }
    }
}
