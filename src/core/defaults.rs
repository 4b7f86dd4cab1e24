use crate::rule::Rule;

/// Per-press move and resize deltas, in pixels.
pub const MOVE_STEP: i32 = 30;
pub const RESIZE_STEP: i32 = 30;

pub const BORDER_WIDTH: u32 = 2;
pub const FOCUS_COLOR: u32 = 0xe78a53;
pub const UNFOCUS_COLOR: u32 = 0x333333;

pub const WORKSPACE_NAMES: [&str; 5] = ["main", "web", "term", "4", "5"];

/// Advertise the root WM name as LG3D so Java applications do not
/// blank their windows under an unknown window manager.
pub const JAVA_WORKAROUND: bool = true;

pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            class: "firefox",
            workspace: Some(1),
            bordered: true,
        },
        Rule {
            class: "mpv",
            workspace: None,
            bordered: false,
        },
    ]
}
