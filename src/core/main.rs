#![deny(clippy::all)]
#![allow(dead_code)]

#[macro_use]
extern crate log;

#[allow(unused_imports)]
use simplelog::LevelFilter;
#[allow(unused_imports)]
use simplelog::SimpleLogger;

use winsys::xdata::xconnection::XConnection;
pub use winsys::Result;

#[macro_use]
mod macros;

#[macro_use]
mod common;

mod binding;
mod client;
mod defaults;
mod model;
mod registry;
mod rule;
mod util;

use binding::Action;
use binding::ButtonBindings;
use binding::KeyBindings;
use common::Change;
use common::Direction;
use model::Model;
use util::Util;

use winsys::geometry::Anchor;
use winsys::geometry::Axis;
use winsys::geometry::Edge;

pub fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    SimpleLogger::init(LevelFilter::Debug, simplelog::Config::default())?;

    Util::init_signal_handlers();

    let (conn, screen_num) = x11rb::connect(None)?;
    let xconn = XConnection::new(&conn, screen_num)?;

    let (key_bindings, button_bindings) = init_bindings();

    let must_restart = Model::new(
        &xconn,
        key_bindings,
        button_bindings,
        defaults::default_rules(),
    )
    .run();

    if must_restart {
        info!("restarting");
        Util::restart();
    }

    Ok(())
}

fn init_bindings() -> (KeyBindings, ButtonBindings) {
    // "[modifiers]-key" => action; first matching entry wins
    let key_bindings = build_key_bindings!(
        // free client arrangers
        "1-h" => Action::MoveClient(Edge::Left),
        "1-j" => Action::MoveClient(Edge::Bottom),
        "1-k" => Action::MoveClient(Edge::Top),
        "1-l" => Action::MoveClient(Edge::Right),
        "1-S-h" => Action::ResizeClient(Axis::Horizontal, Change::Dec),
        "1-S-j" => Action::ResizeClient(Axis::Vertical, Change::Inc),
        "1-S-k" => Action::ResizeClient(Axis::Vertical, Change::Dec),
        "1-S-l" => Action::ResizeClient(Axis::Horizontal, Change::Inc),

        "1-s" => Action::Teleport(Anchor::Center),
        "1-C-y" => Action::Teleport(Anchor::TopLeft),
        "1-C-u" => Action::Teleport(Anchor::TopRight),
        "1-C-b" => Action::Teleport(Anchor::BottomLeft),
        "1-C-n" => Action::Teleport(Anchor::BottomRight),

        // client state modifiers
        "1-a" => Action::Maximize,
        "1-m" => Action::MaximizeAxis(Axis::Vertical),
        "1-n" => Action::MaximizeAxis(Axis::Horizontal),
        "1-x" => Action::ToggleSticky,
        "1-o" => Action::ToggleFixed,
        "1-q" => Action::KillFocus,

        // client order modifiers
        "1-Tab" => Action::FocusStack(Direction::Forward),
        "1-S-Tab" => Action::FocusStack(Direction::Backward),

        // workspace activators
        "1-grave" => Action::SelectPreviousWorkspace,
        "1-1" => Action::SelectWorkspace(0),
        "1-2" => Action::SelectWorkspace(1),
        "1-3" => Action::SelectWorkspace(2),
        "1-4" => Action::SelectWorkspace(3),
        "1-5" => Action::SelectWorkspace(4),

        // workspace client movement
        "1-S-1" => Action::SendToWorkspace(0),
        "1-S-2" => Action::SendToWorkspace(1),
        "1-S-3" => Action::SendToWorkspace(2),
        "1-S-4" => Action::SendToWorkspace(3),
        "1-S-5" => Action::SendToWorkspace(4),

        // external spawn commands
        "1-Return" => Action::Spawn("st"),
        "1-p" => Action::Spawn("dmenu_run"),

        // session control
        "1-S-r" => Action::Restart,
        "1-S-e" => Action::Quit,
    );

    // "[modifiers]-button" => action
    let button_bindings = build_button_bindings!(
        "1-Left" => Action::DragMove,
        "1-Right" => Action::DragResize,
    );

    (key_bindings, button_bindings)
}
