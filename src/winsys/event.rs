pub use crate::Result;

use crate::geometry::Pos;
use crate::input::ButtonCode;
use crate::input::KeyCode;
use crate::window::Window;
use crate::window::WindowState;

#[derive(Debug, Clone)]
pub enum Event {
    Key {
        key_code: KeyCode,
    },
    Button {
        button_code: ButtonCode,
        window: Option<Window>,
        root_pos: Pos,
    },
    ButtonRelease,
    Motion {
        root_pos: Pos,
    },
    MapRequest {
        window: Window,
    },
    Map {
        window: Window,
    },
    Unmap {
        window: Window,
    },
    Destroy {
        window: Window,
    },
    StateRequest {
        window: Window,
        state: WindowState,
        action: ToggleAction,
    },
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum ToggleAction {
    Toggle,
    Add,
    Remove,
}
