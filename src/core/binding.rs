use crate::common::Change;
use crate::common::Direction;

use winsys::geometry::Anchor;
use winsys::geometry::Axis;
use winsys::geometry::Edge;
use winsys::input::ButtonCode;
use winsys::input::KeyCode;

/// Everything a key or button chord may be bound to. The binding
/// tables stay data-only; a single dispatch function in the model maps
/// each variant onto its handler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    MoveClient(Edge),
    ResizeClient(Axis, Change),
    Maximize,
    MaximizeAxis(Axis),
    Teleport(Anchor),
    ToggleSticky,
    ToggleFixed,
    FocusStack(Direction),
    SelectWorkspace(usize),
    SelectPreviousWorkspace,
    SendToWorkspace(usize),
    Spawn(&'static str),
    KillFocus,
    Quit,
    Restart,
    DragMove,
    DragResize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub key_code: KeyCode,
    pub action: Action,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ButtonBinding {
    pub button_code: ButtonCode,
    pub action: Action,
}

pub type KeyBindings = Vec<KeyBinding>;
pub type ButtonBindings = Vec<ButtonBinding>;

/// First matching entry in table order wins; masks are compared with
/// lock bits stripped.
pub fn match_key(
    bindings: &[KeyBinding],
    key_code: KeyCode,
) -> Option<Action> {
    let key_code = key_code.cleaned();

    bindings
        .iter()
        .find(|binding| binding.key_code.cleaned() == key_code)
        .map(|binding| binding.action)
}

pub fn match_button(
    bindings: &[ButtonBinding],
    button_code: ButtonCode,
) -> Option<Action> {
    let button_code = button_code.cleaned();

    bindings
        .iter()
        .find(|binding| binding.button_code.cleaned() == button_code)
        .map(|binding| binding.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_in_table_order_wins() {
        let bindings = vec![
            KeyBinding {
                key_code: KeyCode {
                    mask: 0x40,
                    code: 44,
                },
                action: Action::Maximize,
            },
            KeyBinding {
                key_code: KeyCode {
                    mask: 0x40,
                    code: 44,
                },
                action: Action::Quit,
            },
        ];

        assert_eq!(
            match_key(&bindings, KeyCode {
                mask: 0x40,
                code: 44,
            }),
            Some(Action::Maximize)
        );
    }

    #[test]
    fn unmatched_input_resolves_to_none() {
        let bindings = vec![KeyBinding {
            key_code: KeyCode {
                mask: 0x40,
                code: 44,
            },
            action: Action::Maximize,
        }];

        assert_eq!(
            match_key(&bindings, KeyCode {
                mask: 0x40,
                code: 45,
            }),
            None
        );

        assert_eq!(
            match_key(&bindings, KeyCode {
                mask: 0x44,
                code: 44,
            }),
            None
        );
    }

    #[test]
    fn lock_bits_are_ignored_when_matching() {
        let bindings = vec![KeyBinding {
            key_code: KeyCode {
                mask: 0x40,
                code: 44,
            },
            action: Action::Maximize,
        }];

        // NumLock (Mod2, 0x10) and CapsLock (0x02) held
        assert_eq!(
            match_key(&bindings, KeyCode {
                mask: 0x40 | 0x10 | 0x02,
                code: 44,
            }),
            Some(Action::Maximize)
        );
    }
}
