use std::collections::HashMap;

use x11rb::protocol::xproto::ModMask;

/// keysym name (as reported by `xmodmap -pke`) to keycode
pub type CodeMap = HashMap<String, u8>;

/// Modifier bits ignored when matching bindings against input events.
#[inline]
pub fn ignored_modifier_mask() -> u16 {
    u16::from(ModMask::M2) | u16::from(ModMask::LOCK)
}

/// Strips NumLock and CapsLock from a modifier state so that bindings
/// match regardless of lock-key state.
#[inline]
pub fn clean_mask(mask: u16) -> u16 {
    mask & !ignored_modifier_mask() & 0x00ff
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct KeyCode {
    pub mask: u16,
    pub code: u8,
}

impl KeyCode {
    #[inline]
    pub fn cleaned(self) -> Self {
        Self {
            mask: clean_mask(self.mask),
            ..self
        }
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct ButtonCode {
    pub mask: u16,
    pub button: u8,
}

impl ButtonCode {
    #[inline]
    pub fn cleaned(self) -> Self {
        Self {
            mask: clean_mask(self.mask),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaning_lock_modifiers() {
        let mask = u16::from(ModMask::M1) | u16::from(ModMask::M2) | u16::from(ModMask::LOCK);

        assert_eq!(clean_mask(mask), u16::from(ModMask::M1));
    }

    #[test]
    fn key_codes_compare_after_cleaning() {
        let bound = KeyCode {
            mask: u16::from(ModMask::M4),
            code: 44,
        };

        let received = KeyCode {
            mask: u16::from(ModMask::M4) | u16::from(ModMask::M2),
            code: 44,
        };

        assert_ne!(bound, received);
        assert_eq!(bound.cleaned(), received.cleaned());
    }
}
