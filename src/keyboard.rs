//! Key bindings of the presentation view.
//!
//! | Key                 | Command            |
//! |---------------------|--------------------|
//! | ArrowRight, Space   | `Next`             |
//! | ArrowLeft           | `Previous`         |
//! | PageDown            | `Next`             |
//! | PageUp              | `Previous`         |
//! | Home                | `First`            |
//! | End                 | `Last`             |
//! | Escape, F, f        | `ToggleFullscreen` |
//! | R, r                | `Reset`            |
//! | P, p                | `ToggleAutoPlay`   |

use parse_display::{Display, FromStr};


/// One controller operation reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
#[display(style = "kebab-case")]
pub enum Command {
    Next,
    Previous,
    First,
    Last,
    ToggleFullscreen,
    Reset,
    ToggleAutoPlay,
}

/// A key press, identified by its platform key value (`"ArrowRight"`, `" "`, `"f"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Maps a key value to its command.
pub fn command_for_key(key: &str) -> Option<Command> {
    let command = match key {
        "ArrowRight" | " " | "Space" | "Spacebar" | "PageDown" => Command::Next,
        "ArrowLeft" | "PageUp" => Command::Previous,
        "Home" => Command::First,
        "End" => Command::Last,
        "Escape" | "F" | "f" => Command::ToggleFullscreen,
        "R" | "r" => Command::Reset,
        "P" | "p" => Command::ToggleAutoPlay,
        _ => return None,
    };
    Some(command)
}

/// Maps a key event to its command.
///
/// Chords with Ctrl, Alt or Meta are left to the platform.
pub fn map_key(event: &KeyEvent) -> Option<Command> {
    if event.has_command_modifier() {
        return None;
    }
    command_for_key(&event.key)
}
