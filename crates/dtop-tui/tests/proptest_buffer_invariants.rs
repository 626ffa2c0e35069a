//! Property-based invariant tests for the cell buffer and text fitting.
//!
//! 1. Drawing never panics and never writes outside the buffer.
//! 2. Reported column counts never exceed the clip width.
//! 3. `fit_to_width` results always fit and are prefixes of the input.

use dtop_tui::buffer::{Buffer, fit_to_width};
use dtop_tui::style::Style;
use proptest::prelude::*;
use unicode_width::UnicodeWidthStr;

proptest! {
    #[test]
    fn draw_str_stays_in_bounds(
        w in 0u16..40,
        h in 0u16..10,
        x in 0u16..50,
        y in 0u16..15,
        max in 0u16..50,
        text in "\\PC{0,40}",
    ) {
        let mut buf = Buffer::new(w, h);
        let cols = buf.draw_str(x, y, &text, Style::new(), max);
        prop_assert!(cols <= max);
        if w > 0 {
            prop_assert!(cols <= w.saturating_sub(x.min(w)));
        }
        // Out-of-bounds cells are unreadable, in-bounds cells always are.
        prop_assert!(buf.get(w, 0).is_none());
        if w > 0 && h > 0 {
            prop_assert!(buf.get(w - 1, h - 1).is_some());
        }
    }

    #[test]
    fn fit_to_width_respects_limit(text in "\\PC{0,60}", max in 0u16..30) {
        let fitted = fit_to_width(&text, max);
        prop_assert!(fitted.width() <= max as usize);
        prop_assert!(text.starts_with(fitted));
    }

    #[test]
    fn fit_to_width_is_identity_when_it_fits(text in "[a-z]{0,10}") {
        let fitted = fit_to_width(&text, 10);
        prop_assert_eq!(fitted, text.as_str());
    }
}
