use crossterm::event::{Event as CrosstermEvent, KeyEventKind, MouseEventKind};

/// Input events delivered to the root surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Key press, implicitly targeted at the focused element
    Key { key: Key, modifiers: Modifiers },
    /// Pointer button pressed over `target` (None when over nothing)
    PointerDown { target: Option<String>, x: u16, y: u16 },
    /// Touch contact started over `target`
    TouchStart { target: Option<String> },
    /// Pointer moved
    PointerMove { x: u16, y: u16 },
}

impl SurfaceEvent {
    pub fn key(key: Key) -> Self {
        Self::Key {
            key,
            modifiers: Modifiers::new(),
        }
    }

    pub fn pointer_down(target: impl Into<String>) -> Self {
        Self::PointerDown {
            target: Some(target.into()),
            x: 0,
            y: 0,
        }
    }

    /// Events that count as user interaction with the root surface.
    pub fn is_interaction(&self) -> bool {
        matches!(
            self,
            Self::PointerDown { .. } | Self::TouchStart { .. } | Self::PointerMove { .. }
        )
    }

    /// Convert a raw crossterm event.
    ///
    /// `target_at` resolves screen coordinates to the element under them.
    /// Returns None for events the surface does not care about.
    pub fn from_crossterm(
        raw: CrosstermEvent,
        target_at: impl Fn(u16, u16) -> Option<String>,
    ) -> Option<Self> {
        match raw {
            CrosstermEvent::Key(key_event) => {
                // Only process key press events (not release/repeat on some terminals)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(Self::Key {
                    key: key_event.code.into(),
                    modifiers: key_event.modifiers.into(),
                })
            }
            CrosstermEvent::Mouse(mouse_event) => {
                let x = mouse_event.column;
                let y = mouse_event.row;
                match mouse_event.kind {
                    MouseEventKind::Down(_) => Some(Self::PointerDown {
                        target: target_at(x, y),
                        x,
                        y,
                    }),
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        Some(Self::PointerMove { x, y })
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Simplified key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
}

/// Key modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    pub fn none(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }
}

// Conversion from crossterm types
impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Esc => Key::Escape,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Insert => Key::Insert,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Char('\0'), // Placeholder for unsupported keys
        }
    }
}

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(mods: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers;
        Self {
            shift: mods.contains(KeyModifiers::SHIFT),
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
        }
    }
}
