//! Canonical input events, mapped from crossterm.
//!
//! Mouse coordinates are 0-indexed. Key release events are dropped at the
//! mapping layer; the application only ever sees presses and repeats.

use bitflags::bitflags;
use crossterm::event as cte;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize { width: u16, height: u16 },
    /// A scheduled tick elapsed.
    Tick,
}

impl Event {
    /// Convert a crossterm event; `None` for events this kit ignores.
    #[must_use]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => map_key_event(key).map(Event::Key),
            cte::Event::Mouse(mouse) => Some(Event::Mouse(map_mouse_event(mouse))),
            cte::Event::Resize(width, height) => Some(Event::Resize { width, height }),
            _ => None,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// True if this is the given character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// True if Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b000;
        const SHIFT = 0b001;
        const ALT   = 0b010;
        const CTRL  = 0b100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A mouse event (0-indexed cell coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
}

/// The type of mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

fn map_key_event(event: cte::KeyEvent) -> Option<KeyEvent> {
    if event.kind == cte::KeyEventKind::Release {
        return None;
    }
    let code = match event.code {
        cte::KeyCode::Char(c) => KeyCode::Char(c),
        cte::KeyCode::Enter => KeyCode::Enter,
        cte::KeyCode::Esc => KeyCode::Escape,
        cte::KeyCode::Backspace => KeyCode::Backspace,
        cte::KeyCode::Tab => KeyCode::Tab,
        cte::KeyCode::Up => KeyCode::Up,
        cte::KeyCode::Down => KeyCode::Down,
        cte::KeyCode::Left => KeyCode::Left,
        cte::KeyCode::Right => KeyCode::Right,
        cte::KeyCode::Home => KeyCode::Home,
        cte::KeyCode::End => KeyCode::End,
        cte::KeyCode::PageUp => KeyCode::PageUp,
        cte::KeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    Some(KeyEvent {
        code,
        modifiers: map_modifiers(event.modifiers),
    })
}

fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(cte::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(cte::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(cte::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    mapped
}

fn map_mouse_event(event: cte::MouseEvent) -> MouseEvent {
    let kind = match event.kind {
        cte::MouseEventKind::Down(b) => MouseEventKind::Down(map_button(b)),
        cte::MouseEventKind::Up(b) => MouseEventKind::Up(map_button(b)),
        cte::MouseEventKind::Drag(b) => MouseEventKind::Drag(map_button(b)),
        cte::MouseEventKind::Moved => MouseEventKind::Moved,
        cte::MouseEventKind::ScrollUp | cte::MouseEventKind::ScrollLeft => {
            MouseEventKind::ScrollUp
        }
        cte::MouseEventKind::ScrollDown | cte::MouseEventKind::ScrollRight => {
            MouseEventKind::ScrollDown
        }
    };
    MouseEvent {
        kind,
        x: event.column,
        y: event.row,
    }
}

fn map_button(button: cte::MouseButton) -> MouseButton {
    match button {
        cte::MouseButton::Left => MouseButton::Left,
        cte::MouseButton::Right => MouseButton::Right,
        cte::MouseButton::Middle => MouseButton::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_is_char() {
        let event = KeyEvent::new(KeyCode::Char('q'));
        assert!(event.is_char('q'));
        assert!(!event.is_char('x'));
    }

    #[test]
    fn key_event_ctrl() {
        let event = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(event.ctrl());
    }

    #[test]
    fn map_release_dropped() {
        let ct = cte::KeyEvent {
            code: cte::KeyCode::Char('a'),
            modifiers: cte::KeyModifiers::NONE,
            kind: cte::KeyEventKind::Release,
            state: cte::KeyEventState::NONE,
        };
        assert!(map_key_event(ct).is_none());
    }

    #[test]
    fn map_key_with_modifiers() {
        let ct = cte::KeyEvent {
            code: cte::KeyCode::Char('x'),
            modifiers: cte::KeyModifiers::CONTROL | cte::KeyModifiers::SHIFT,
            kind: cte::KeyEventKind::Press,
            state: cte::KeyEventState::NONE,
        };
        let mapped = map_key_event(ct).unwrap();
        assert_eq!(mapped.code, KeyCode::Char('x'));
        assert!(mapped.modifiers.contains(Modifiers::CTRL));
        assert!(mapped.modifiers.contains(Modifiers::SHIFT));
    }

    #[test]
    fn map_mouse_down() {
        let ct = cte::Event::Mouse(cte::MouseEvent {
            kind: cte::MouseEventKind::Down(cte::MouseButton::Left),
            column: 7,
            row: 3,
            modifiers: cte::KeyModifiers::NONE,
        });
        match Event::from_crossterm(ct) {
            Some(Event::Mouse(m)) => {
                assert_eq!((m.x, m.y), (7, 3));
                assert_eq!(m.kind, MouseEventKind::Down(MouseButton::Left));
            }
            other => panic!("expected mouse event, got {other:?}"),
        }
    }

    #[test]
    fn map_resize() {
        let mapped = Event::from_crossterm(cte::Event::Resize(80, 24));
        assert_eq!(
            mapped,
            Some(Event::Resize {
                width: 80,
                height: 24
            })
        );
    }

    #[test]
    fn unknown_events_ignored() {
        assert!(Event::from_crossterm(cte::Event::FocusGained).is_none());
    }
}
