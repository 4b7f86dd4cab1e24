use winsys::input::ButtonCode;
use winsys::input::CodeMap;
use winsys::input::KeyCode;

use std::hash::BuildHasher;
use std::hash::Hasher;
use std::process::Command;
use std::process::Stdio;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use nix::sys::signal;

use x11rb::protocol::xproto::ModMask;

static ALIVE: AtomicBool = AtomicBool::new(true);

extern "C" fn on_termination_signal(_: i32) {
    ALIVE.store(false, Ordering::SeqCst);
}

#[derive(Default)]
pub struct IdHasher {
    state: u64,
}

impl Hasher for IdHasher {
    #[inline]
    fn write(
        &mut self,
        bytes: &[u8],
    ) {
        for &byte in bytes {
            self.state = self.state.rotate_left(8) + u64::from(byte);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

#[derive(Default, Clone)]
pub struct BuildIdHasher;

impl BuildHasher for BuildIdHasher {
    type Hasher = IdHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        Self::Hasher {
            state: 0,
        }
    }
}

pub struct Util;

impl Util {
    pub fn init_signal_handlers() {
        let action = signal::SigAction::new(
            signal::SigHandler::Handler(on_termination_signal),
            signal::SaFlags::empty(),
            signal::SigSet::empty(),
        );

        unsafe {
            drop(signal::sigaction(signal::Signal::SIGINT, &action));
            drop(signal::sigaction(signal::Signal::SIGTERM, &action));
        }
    }

    #[inline]
    pub fn alive() -> bool {
        ALIVE.load(Ordering::SeqCst)
    }

    pub fn spawn<S: Into<String>>(cmd: S) {
        let cmd = cmd.into();
        let args: Vec<&str> = cmd.split_whitespace().collect();

        if args.len() > 1 {
            Command::new(args[0])
                .args(&args[1..])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .ok();
        } else {
            Command::new(args[0])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .ok();
        };
    }

    pub fn spawn_shell<S: Into<String>>(cmd: S) {
        let cmd = cmd.into();

        Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .ok();
    }

    /// Replaces this process with a fresh image of itself.
    pub fn restart() {
        use std::os::unix::process::CommandExt;

        if let Ok(exe) = std::env::current_exe() {
            drop(Command::new(exe).exec());
        }
    }

    pub fn system_keycodes() -> CodeMap {
        match Command::new("xmodmap").arg("-pke").output() {
            Err(e) => panic!("unable to fetch keycodes via xmodmap: {}", e),
            Ok(o) => match String::from_utf8(o.stdout) {
                Err(e) => panic!("invalid utf8 from xmodmap: {}", e),
                Ok(s) => s
                    .lines()
                    .flat_map(|l| {
                        let mut words = l.split_whitespace();
                        let key_code: u8 = words.nth(1).unwrap().parse().unwrap();

                        words.skip(1).map(move |name| (name.into(), key_code))
                    })
                    .collect::<CodeMap>(),
            },
        }
    }

    fn parse_modifier_mask(constituents: &[&str]) -> u16 {
        constituents
            .iter()
            .map(|&modifier| match modifier {
                "A" | "Alt" | "Meta" => u16::from(ModMask::M1),
                "M" | "Super" => u16::from(ModMask::M4),
                "S" | "Shift" => u16::from(ModMask::SHIFT),
                "C" | "Ctrl" | "Control" => u16::from(ModMask::CONTROL),
                "1" | "Mod" => u16::from(if cfg!(debug_assertions) {
                    ModMask::M1
                } else {
                    ModMask::M4
                }),
                "2" | "Sec" => u16::from(if cfg!(debug_assertions) {
                    ModMask::M4
                } else {
                    ModMask::M1
                }),
                _ => panic!("invalid modifier: {}", modifier),
            })
            .fold(0, |acc, modifier| acc | modifier)
    }

    pub fn parse_key_binding(
        key_binding: impl Into<String>,
        keycodes: &CodeMap,
    ) -> Option<KeyCode> {
        let s = key_binding.into();
        let mut constituents: Vec<&str> = s.split('-').collect();

        match keycodes.get(constituents.remove(constituents.len() - 1)) {
            Some(&code) => Some(KeyCode {
                mask: Self::parse_modifier_mask(&constituents),
                code,
            }),
            None => None,
        }
    }

    pub fn parse_button_binding(button_binding: impl Into<String>) -> Option<ButtonCode> {
        let s = button_binding.into();
        let mut constituents: Vec<&str> = s.split('-').collect();

        let button = match constituents.remove(constituents.len() - 1) {
            "1" | "Left" => 1,
            "2" | "Middle" => 2,
            "3" | "Right" => 3,
            "4" | "ScrollUp" => 4,
            "5" | "ScrollDown" => 5,
            _ => return None,
        };

        Some(ButtonCode {
            mask: Self::parse_modifier_mask(&constituents),
            button,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_a_key_chord() {
        let mut keycodes = CodeMap::new();
        keycodes.insert("h".into(), 43);

        let key_code = Util::parse_key_binding("M-S-h", &keycodes).unwrap();

        assert_eq!(key_code.code, 43);
        assert_eq!(
            key_code.mask,
            u16::from(ModMask::M4) | u16::from(ModMask::SHIFT)
        );

        assert!(Util::parse_key_binding("M-unknown", &keycodes).is_none());
    }

    #[test]
    fn parsing_a_button_chord() {
        let button_code = Util::parse_button_binding("M-Left").unwrap();

        assert_eq!(button_code.button, 1);
        assert_eq!(button_code.mask, u16::from(ModMask::M4));

        assert!(Util::parse_button_binding("M-Sideways").is_none());
    }
}
