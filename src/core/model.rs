use crate::binding::match_button;
use crate::binding::match_key;
use crate::binding::Action;
use crate::binding::ButtonBindings;
use crate::binding::KeyBindings;
use crate::client::Client;
use crate::common::Change;
use crate::common::Direction;
use crate::common::Toggle;
use crate::defaults;
use crate::registry::Registry;
use crate::rule::Rule;
use crate::util::Util;

use winsys::connection::Connection;
use winsys::event::Event;
use winsys::event::ToggleAction;
use winsys::geometry::Anchor;
use winsys::geometry::Axis;
use winsys::geometry::Dim;
use winsys::geometry::Edge;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::input::ButtonCode;
use winsys::input::KeyCode;
use winsys::window::Window;
use winsys::window::WindowState;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DragKind {
    Move,
    Resize,
}

#[derive(Debug, Copy, Clone)]
struct Drag {
    window: Window,
    kind: DragKind,
    start_pos: Pos,
    start_geometry: Region,
}

pub struct Model<'a> {
    conn: &'a dyn Connection,
    registry: Registry,
    key_bindings: KeyBindings,
    button_bindings: ButtonBindings,
    rules: Vec<Rule>,
    selected_workspace: usize,
    previous_workspace: usize,
    focus: Option<Window>,
    drag: Option<Drag>,
    running: bool,
    must_restart: bool,
}

impl<'a> Model<'a> {
    pub fn new(
        conn: &'a dyn Connection,
        key_bindings: KeyBindings,
        button_bindings: ButtonBindings,
        rules: Vec<Rule>,
    ) -> Self {
        Self::init(Self {
            conn,
            registry: Registry::new(),
            key_bindings,
            button_bindings,
            rules,
            selected_workspace: 0,
            previous_workspace: 0,
            focus: None,
            drag: None,
            running: true,
            must_restart: false,
        })
    }

    fn init(mut model: Self) -> Self {
        info!("initializing window manager");

        model
            .conn
            .screen()
            .compute_placeable_region(defaults::BORDER_WIDTH);

        model.conn.init_wm_properties(
            if defaults::JAVA_WORKAROUND {
                "LG3D"
            } else {
                WM_NAME!()
            },
            &defaults::WORKSPACE_NAMES,
        );

        model.conn.grab_bindings(
            &model
                .key_bindings
                .iter()
                .map(|binding| binding.key_code)
                .collect::<Vec<KeyCode>>(),
            &model
                .button_bindings
                .iter()
                .map(|binding| binding.button_code)
                .collect::<Vec<ButtonCode>>(),
        );

        for window in model.conn.top_level_windows() {
            model.manage(window);
        }

        model.conn.flush();
        model
    }

    /// The dispatch loop: wait for one event, resolve it to at most
    /// one operation, run that operation to completion, flush. Returns
    /// whether a restart was requested.
    pub fn run(&mut self) -> bool {
        while self.running && Util::alive() {
            if let Some(event) = self.conn.step() {
                trace!("received event: {:?}", event);

                match event {
                    Event::Key {
                        key_code,
                    } => self.handle_key(key_code),
                    Event::Button {
                        button_code,
                        window,
                        root_pos,
                    } => self.handle_button(button_code, window, root_pos),
                    Event::ButtonRelease => self.handle_button_release(),
                    Event::Motion {
                        root_pos,
                    } => self.handle_motion(root_pos),
                    Event::MapRequest {
                        window,
                    } => self.handle_map_request(window),
                    Event::Map {
                        window,
                    } => self.handle_map(window),
                    Event::Unmap {
                        window,
                    } => self.handle_unmap(window),
                    Event::Destroy {
                        window,
                    } => self.handle_destroy(window),
                    Event::StateRequest {
                        window,
                        state,
                        action,
                    } => self.handle_state_request(window, state, action),
                }
            }

            self.conn.flush();
        }

        info!("shutting down");
        self.conn.cleanup();
        self.conn.flush();

        self.must_restart
    }

    fn handle_key(
        &mut self,
        key_code: KeyCode,
    ) {
        if let Some(action) = match_key(&self.key_bindings, key_code) {
            debug!("dispatching {:?}", action);
            self.dispatch(action);
        }
    }

    fn handle_button(
        &mut self,
        button_code: ButtonCode,
        window: Option<Window>,
        root_pos: Pos,
    ) {
        if let Some(action) = match_button(&self.button_bindings, button_code) {
            match action {
                Action::DragMove => self.start_drag(window, root_pos, DragKind::Move),
                Action::DragResize => self.start_drag(window, root_pos, DragKind::Resize),
                action => self.dispatch(action),
            }
        }
    }

    fn dispatch(
        &mut self,
        action: Action,
    ) {
        match action {
            Action::MoveClient(edge) => self.move_client(edge),
            Action::ResizeClient(axis, change) => self.resize_client(axis, change),
            Action::Maximize => self.toggle_maximize(),
            Action::MaximizeAxis(axis) => self.toggle_maximize_axis(axis),
            Action::Teleport(anchor) => self.teleport(anchor),
            Action::ToggleSticky => self.toggle_sticky(),
            Action::ToggleFixed => self.toggle_fixed(),
            Action::FocusStack(direction) => self.focus_stack(direction),
            Action::SelectWorkspace(workspace) => self.select_workspace(workspace),
            Action::SelectPreviousWorkspace => self.select_previous_workspace(),
            Action::SendToWorkspace(workspace) => self.send_focus_to_workspace(workspace),
            Action::Spawn(cmd) => Util::spawn(cmd),
            Action::KillFocus => self.kill_focus(),
            Action::Quit => self.quit(),
            Action::Restart => self.restart(),
            Action::DragMove | Action::DragResize => {},
        }
    }

    fn handle_map_request(
        &mut self,
        window: Window,
    ) {
        if self.registry.contains(window) {
            self.apply_visibility(window);
            return;
        }

        self.manage(window);
    }

    fn manage(
        &mut self,
        window: Window,
    ) {
        if !self.conn.must_manage_window(window) {
            return;
        }

        // checked query: a failed lookup seeds a zero rectangle
        let geometry = self.conn.get_window_geometry(window).unwrap_or_default();
        let class = self.conn.get_window_class(window);
        let size_hints = self.conn.get_window_size_hints(window);

        info!("managing client {:#0x} ({})", window, class);

        let client = Client::new(window, class, self.selected_workspace, geometry, size_hints);

        if let Some(rule) = self.rules.iter().find(|rule| rule.applies_to(&client.class())) {
            rule.propagate(&client);
        }

        let bordered = client.is_bordered();
        let workspace = client.workspace();
        let visible = client.is_visible_on(self.selected_workspace);

        self.registry.attach(client);
        self.registry.attach_stack(window);

        self.conn.init_window(window);
        self.conn
            .set_window_border_width(window, if bordered { defaults::BORDER_WIDTH } else { 0 });
        self.conn
            .set_window_border_color(window, defaults::UNFOCUS_COLOR);
        self.conn.set_window_desktop(window, workspace);

        self.map_client(window);
        self.publish_client_list();

        if visible {
            self.focus(Some(window));
        } else {
            self.hide_client(window);
        }

        self.export(window);
    }

    fn handle_map(
        &mut self,
        _window: Window,
    ) {
        // re-assert input focus once the window is viewable
        self.focus(self.focus);
    }

    fn handle_unmap(
        &mut self,
        window: Window,
    ) {
        if let Some(client) = self.registry.find(window) {
            if client.consume_unmap_if_expecting() {
                return;
            }

            self.unmanage(window);
        }
    }

    fn handle_destroy(
        &mut self,
        window: Window,
    ) {
        if self.registry.contains(window) {
            self.unmanage(window);
        }
    }

    fn unmanage(
        &mut self,
        window: Window,
    ) {
        info!("unmanaging client {:#0x}", window);

        let workspace = self.selected_workspace;
        let was_focused = self.focus == Some(window);
        let successor = self
            .registry
            .focus_successor_of(window, |client| client.is_visible_on(workspace));

        self.registry.detach(window);
        self.registry.detach_stack(window);

        self.publish_client_list();

        if was_focused {
            self.focus(successor);
        }
    }

    fn handle_state_request(
        &mut self,
        window: Window,
        state: WindowState,
        action: ToggleAction,
    ) {
        if !self.registry.contains(window) {
            return;
        }

        let toggle = match action {
            ToggleAction::Add => Toggle::On,
            ToggleAction::Remove => Toggle::Off,
            ToggleAction::Toggle => Toggle::Reverse,
        };

        debug!(
            "state request for client {:#0x}: {:?} {:?}",
            window, action, state
        );

        match state {
            WindowState::Fullscreen => {
                let resulting = self.registry.find(window).map(|client| {
                    let on = toggle.eval(client.is_fullscreen());
                    client.set_fullscreen(Toggle::from(on));
                    on
                });

                if let Some(on) = resulting {
                    self.set_maximize(window, Toggle::from(on));
                }
            },
            // the remaining states update flags without any geometry
            // effect; see DESIGN.md
            WindowState::MaximizedVert => {
                if let Some(client) = self.registry.find(window) {
                    client.set_maximized_axis(Axis::Vertical, toggle);
                }
            },
            WindowState::MaximizedHorz => {
                if let Some(client) = self.registry.find(window) {
                    client.set_maximized_axis(Axis::Horizontal, toggle);
                }
            },
            WindowState::Above => {
                if let Some(client) = self.registry.find(window) {
                    client.set_above(toggle);
                }
            },
            WindowState::Below => {
                if let Some(client) = self.registry.find(window) {
                    client.set_below(toggle);
                }
            },
            WindowState::Hidden => {},
        }

        self.export(window);
    }

    fn start_drag(
        &mut self,
        window: Option<Window>,
        root_pos: Pos,
        kind: DragKind,
    ) {
        let window = match window {
            Some(window) if self.registry.contains(window) => window,
            _ => return,
        };

        self.focus(Some(window));

        if let Some(client) = self.registry.find(window) {
            self.drag = Some(Drag {
                window,
                kind,
                start_pos: root_pos,
                start_geometry: client.geometry(),
            });
        }

        self.conn.grab_pointer();
    }

    fn handle_motion(
        &mut self,
        root_pos: Pos,
    ) {
        let drag = match self.drag {
            Some(drag) => drag,
            None => return,
        };

        let dist = drag.start_pos.dist(root_pos);

        if let Some(client) = self.registry.find(drag.window) {
            match drag.kind {
                DragKind::Move => {
                    let mut geometry = client.geometry();
                    geometry.pos = drag.start_geometry.pos + dist;

                    client.set_geometry(geometry);
                    self.conn.move_window(drag.window, geometry.pos);
                },
                DragKind::Resize => {
                    let mut geometry = client.geometry();
                    geometry.dim = Dim {
                        w: drag.start_geometry.dim.w + dist.dx,
                        h: drag.start_geometry.dim.h + dist.dy,
                    };

                    if geometry.dim.w < 1 || geometry.dim.h < 1 {
                        return;
                    }

                    let geometry = geometry.with_size_hints(&client.size_hints());

                    client.set_geometry(geometry);
                    self.conn.resize_window(drag.window, geometry.dim);
                },
            }
        }
    }

    fn handle_button_release(&mut self) {
        if self.drag.take().is_some() {
            self.conn.ungrab_pointer();
        }
    }

    fn map_client(
        &self,
        window: Window,
    ) {
        if let Some(client) = self.registry.find(window) {
            if !client.is_mapped() {
                client.set_mapped(Toggle::On);
                self.conn.map_window(window);
            }
        }
    }

    fn hide_client(
        &self,
        window: Window,
    ) {
        if let Some(client) = self.registry.find(window) {
            if client.is_mapped() {
                client.expect_unmap();
                client.set_mapped(Toggle::Off);
                self.conn.unmap_window(window);
            }
        }
    }

    /// Maps or hides a client according to the visibility predicate,
    /// handing focus to the detach-successor when the focused client
    /// goes out of view.
    fn apply_visibility(
        &mut self,
        window: Window,
    ) {
        let workspace = self.selected_workspace;

        let visible = match self.registry.find(window) {
            Some(client) => client.is_visible_on(workspace),
            None => return,
        };

        if visible {
            self.map_client(window);
        } else {
            self.hide_client(window);

            if self.focus == Some(window) {
                let successor = self
                    .registry
                    .focus_successor_of(window, |client| client.is_visible_on(workspace));

                self.focus(successor);
            }
        }
    }

    pub fn focus(
        &mut self,
        window: Option<Window>,
    ) {
        if let Some(prev) = self.focus {
            if Some(prev) != window {
                if let Some(client) = self.registry.find(prev) {
                    client.set_focused(Toggle::Off);
                    self.conn
                        .set_window_border_color(prev, defaults::UNFOCUS_COLOR);
                }
            }
        }

        match window {
            Some(window) if self.registry.contains(window) => {
                self.registry.raise_to_top(window);

                if let Some(client) = self.registry.find(window) {
                    client.set_focused(Toggle::On);
                }

                self.conn
                    .set_window_border_color(window, defaults::FOCUS_COLOR);
                self.conn.stack_window_above(window);
                self.conn.focus_window(window);

                self.focus = Some(window);
            },
            _ => {
                self.conn.unfocus();
                self.focus = None;
            },
        }
    }

    pub fn focus_stack(
        &mut self,
        direction: Direction,
    ) {
        let workspace = self.selected_workspace;

        let visible: Vec<Window> = self
            .registry
            .visible(workspace)
            .map(|client| client.window())
            .collect();

        if visible.len() <= 1 {
            return;
        }

        let index = match self
            .focus
            .and_then(|focus| visible.iter().position(|&window| window == focus))
        {
            Some(index) => match direction {
                Direction::Forward => (index + 1) % visible.len(),
                Direction::Backward => (index + visible.len() - 1) % visible.len(),
            },
            None => 0,
        };

        self.focus(Some(visible[index]));
    }

    pub fn select_workspace(
        &mut self,
        workspace: usize,
    ) {
        if workspace >= defaults::WORKSPACE_NAMES.len() || workspace == self.selected_workspace {
            return;
        }

        info!("activating workspace {}", workspace);

        self.previous_workspace = self.selected_workspace;
        self.selected_workspace = workspace;
        self.conn.set_current_desktop(workspace);

        let windows = self.registry.attach_order().to_vec();

        for window in windows {
            let visible = self
                .registry
                .find(window)
                .map_or(false, |client| client.is_visible_on(workspace));

            if visible {
                self.map_client(window);
            } else {
                self.hide_client(window);
            }

            self.export(window);
        }

        let next = self
            .registry
            .most_recent(|client| client.is_visible_on(workspace));

        self.focus(next);
    }

    pub fn select_previous_workspace(&mut self) {
        self.select_workspace(self.previous_workspace);
    }

    pub fn send_focus_to_workspace(
        &mut self,
        workspace: usize,
    ) {
        if workspace >= defaults::WORKSPACE_NAMES.len() {
            return;
        }

        let window = match self.focus {
            Some(window) => window,
            None => return,
        };

        match self.registry.find(window) {
            Some(client) if client.workspace() != workspace => {
                client.set_workspace(workspace);
            },
            _ => return,
        }

        debug!("sending client {:#0x} to workspace {}", window, workspace);

        self.conn.set_window_desktop(window, workspace);
        self.apply_visibility(window);
        self.export(window);
    }

    pub fn move_client(
        &mut self,
        edge: Edge,
    ) {
        let window = match self.focus {
            Some(window) => window,
            None => return,
        };

        if let Some(client) = self.registry.find(window) {
            let mut geometry = client.geometry();

            match edge {
                Edge::Top => geometry.pos.y -= defaults::MOVE_STEP,
                Edge::Bottom => geometry.pos.y += defaults::MOVE_STEP,
                Edge::Left => geometry.pos.x -= defaults::MOVE_STEP,
                Edge::Right => geometry.pos.x += defaults::MOVE_STEP,
            }

            client.set_geometry(geometry);
            self.conn.move_window(window, geometry.pos);
        }

        self.export(window);
    }

    pub fn resize_client(
        &mut self,
        axis: Axis,
        change: Change,
    ) {
        let window = match self.focus {
            Some(window) => window,
            None => return,
        };

        if let Some(client) = self.registry.find(window) {
            let delta = match change {
                Change::Inc => defaults::RESIZE_STEP,
                Change::Dec => -defaults::RESIZE_STEP,
            };

            let mut geometry = client.geometry();

            match axis {
                Axis::Horizontal => geometry.dim.w += delta,
                Axis::Vertical => geometry.dim.h += delta,
            }

            // extents never reach zero
            if geometry.dim.w < 1 || geometry.dim.h < 1 {
                return;
            }

            if let Some(size_hints) = client.size_hints() {
                match change {
                    Change::Dec => {
                        let min = size_hints.min_dim();

                        if geometry.dim.w < min.w || geometry.dim.h < min.h {
                            return;
                        }
                    },
                    Change::Inc => {
                        if let Some(max) = size_hints.max_dim() {
                            geometry.dim.w = std::cmp::min(geometry.dim.w, max.w);
                            geometry.dim.h = std::cmp::min(geometry.dim.h, max.h);
                        }
                    },
                }
            }

            client.set_geometry(geometry);
            self.conn.resize_window(window, geometry.dim);
        }

        self.export(window);
    }

    pub fn toggle_maximize(&mut self) {
        if let Some(window) = self.focus {
            self.set_maximize(window, Toggle::Reverse);
        }
    }

    fn set_maximize(
        &mut self,
        window: Window,
        toggle: Toggle,
    ) {
        let area = self.conn.screen().placeable_region();

        if let Some(client) = self.registry.find(window) {
            let on = toggle.eval(client.is_maximized());

            if on != client.is_maximized() {
                if on {
                    client.save_axis(Axis::Vertical);
                    client.save_axis(Axis::Horizontal);
                    client.set_maximized(Toggle::On);
                    client.set_geometry(area);

                    self.conn.place_window(window, &area);
                    self.conn.stack_window_above(window);
                } else {
                    client.set_maximized(Toggle::Off);
                    client.restore_axis(Axis::Vertical);
                    client.restore_axis(Axis::Horizontal);
                    client.discard_saved_geometry();

                    let geometry = client.geometry();
                    self.conn.place_window(window, &geometry);
                }
            }
        }

        self.export(window);
    }

    pub fn toggle_maximize_axis(
        &mut self,
        axis: Axis,
    ) {
        let window = match self.focus {
            Some(window) => window,
            None => return,
        };

        let area = self.conn.screen().placeable_region();

        if let Some(client) = self.registry.find(window) {
            if client.is_maximized_axis(axis) {
                client.set_maximized_axis(axis, Toggle::Off);
                client.restore_axis(axis);
                client.discard_saved_geometry();
            } else {
                client.save_axis(axis);
                client.set_maximized_axis(axis, Toggle::On);

                let mut geometry = client.geometry();

                match axis {
                    Axis::Vertical => {
                        geometry.pos.y = area.pos.y;
                        geometry.dim.h = area.dim.h;
                    },
                    Axis::Horizontal => {
                        geometry.pos.x = area.pos.x;
                        geometry.dim.w = area.dim.w;
                    },
                }

                client.set_geometry(geometry);
            }

            let geometry = client.geometry();
            self.conn.place_window(window, &geometry);
        }

        self.export(window);
    }

    pub fn teleport(
        &mut self,
        anchor: Anchor,
    ) {
        let window = match self.focus {
            Some(window) => window,
            None => return,
        };

        let area = self.conn.screen().placeable_region();

        if let Some(client) = self.registry.find(window) {
            let geometry = client.geometry().anchored_within(area, anchor);

            client.set_geometry(geometry);
            self.conn.move_window(window, geometry.pos);
        }

        self.export(window);
    }

    pub fn toggle_sticky(&mut self) {
        let window = match self.focus {
            Some(window) => window,
            None => return,
        };

        if let Some(client) = self.registry.find(window) {
            client.set_sticky(Toggle::Reverse);
        }

        self.apply_visibility(window);
        self.export(window);
    }

    pub fn toggle_fixed(&mut self) {
        let window = match self.focus {
            Some(window) => window,
            None => return,
        };

        if let Some(client) = self.registry.find(window) {
            client.set_fixed(Toggle::Reverse);
        }

        self.apply_visibility(window);
        self.export(window);
    }

    pub fn kill_focus(&mut self) {
        if let Some(window) = self.focus {
            self.conn.kill_window(window);
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn restart(&mut self) {
        self.running = false;
        self.must_restart = true;
    }

    fn export(
        &self,
        window: Window,
    ) {
        if let Some(client) = self.registry.find(window) {
            self.conn
                .update_window_states(window, &client.states(self.selected_workspace));
        }
    }

    fn publish_client_list(&self) {
        self.conn.update_client_list(self.registry.attach_order());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use winsys::hints::SizeHints;
    use winsys::screen::Screen;

    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq)]
    enum Request {
        Place(Window, Region),
        Move(Window, Pos),
        Resize(Window, Dim),
        Raise(Window),
        SetFocus(Window),
        Unfocus,
        Map(Window),
        Unmap(Window),
        BorderColor(Window, u32),
        BorderWidth(Window, u32),
        States(Window, Vec<WindowState>),
        ClientList(Vec<Window>),
        CurrentDesktop(usize),
        WindowDesktop(Window, usize),
        Kill(Window),
    }

    struct RecordingConn {
        screen: Screen,
        geometries: RefCell<HashMap<Window, Region>>,
        size_hints: RefCell<HashMap<Window, SizeHints>>,
        requests: RefCell<Vec<Request>>,
    }

    impl RecordingConn {
        fn new() -> Self {
            Self {
                screen: Screen::new(Region::new(0, 0, 1920, 1080), 0),
                geometries: RefCell::new(HashMap::new()),
                size_hints: RefCell::new(HashMap::new()),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn set_geometry(
            &self,
            window: Window,
            region: Region,
        ) {
            self.geometries.borrow_mut().insert(window, region);
        }

        fn record(
            &self,
            request: Request,
        ) {
            self.requests.borrow_mut().push(request);
        }

        fn requests(&self) -> Vec<Request> {
            self.requests.borrow().clone()
        }

        fn clear_requests(&self) {
            self.requests.borrow_mut().clear();
        }
    }

    impl Connection for RecordingConn {
        fn flush(&self) -> bool {
            true
        }

        fn step(&self) -> Option<Event> {
            None
        }

        fn screen(&self) -> &Screen {
            &self.screen
        }

        fn top_level_windows(&self) -> Vec<Window> {
            Vec::new()
        }

        fn cleanup(&self) {}

        fn init_window(
            &self,
            _: Window,
        ) {
        }

        fn map_window(
            &self,
            window: Window,
        ) {
            self.record(Request::Map(window));
        }

        fn unmap_window(
            &self,
            window: Window,
        ) {
            self.record(Request::Unmap(window));
        }

        fn kill_window(
            &self,
            window: Window,
        ) {
            self.record(Request::Kill(window));
        }

        fn place_window(
            &self,
            window: Window,
            region: &Region,
        ) {
            self.record(Request::Place(window, *region));
        }

        fn move_window(
            &self,
            window: Window,
            pos: Pos,
        ) {
            self.record(Request::Move(window, pos));
        }

        fn resize_window(
            &self,
            window: Window,
            dim: Dim,
        ) {
            self.record(Request::Resize(window, dim));
        }

        fn stack_window_above(
            &self,
            window: Window,
        ) {
            self.record(Request::Raise(window));
        }

        fn focus_window(
            &self,
            window: Window,
        ) {
            self.record(Request::SetFocus(window));
        }

        fn unfocus(&self) {
            self.record(Request::Unfocus);
        }

        fn set_window_border_width(
            &self,
            window: Window,
            width: u32,
        ) {
            self.record(Request::BorderWidth(window, width));
        }

        fn set_window_border_color(
            &self,
            window: Window,
            color: u32,
        ) {
            self.record(Request::BorderColor(window, color));
        }

        fn grab_bindings(
            &self,
            _: &[KeyCode],
            _: &[ButtonCode],
        ) {
        }

        fn grab_pointer(&self) {}

        fn ungrab_pointer(&self) {}

        fn get_pointer_position(&self) -> Pos {
            Pos::default()
        }

        fn get_window_geometry(
            &self,
            window: Window,
        ) -> winsys::Result<Region> {
            self.geometries
                .borrow()
                .get(&window)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("no geometry for window {}", window))
        }

        fn get_window_class(
            &self,
            _: Window,
        ) -> String {
            String::new()
        }

        fn get_window_size_hints(
            &self,
            window: Window,
        ) -> Option<SizeHints> {
            self.size_hints.borrow().get(&window).copied()
        }

        fn must_manage_window(
            &self,
            _: Window,
        ) -> bool {
            true
        }

        fn init_wm_properties(
            &self,
            _: &str,
            _: &[&str],
        ) {
        }

        fn set_current_desktop(
            &self,
            index: usize,
        ) {
            self.record(Request::CurrentDesktop(index));
        }

        fn set_window_desktop(
            &self,
            window: Window,
            index: usize,
        ) {
            self.record(Request::WindowDesktop(window, index));
        }

        fn update_window_states(
            &self,
            window: Window,
            states: &[WindowState],
        ) {
            self.record(Request::States(window, states.to_vec()));
        }

        fn update_client_list(
            &self,
            clients: &[Window],
        ) {
            self.record(Request::ClientList(clients.to_vec()));
        }
    }

    fn managed<'a>(
        conn: &'a RecordingConn,
        windows: &[(Window, Region)],
    ) -> Model<'a> {
        let mut model = Model::new(conn, Vec::new(), Vec::new(), Vec::new());

        for &(window, region) in windows {
            conn.set_geometry(window, region);
            model.handle_map_request(window);
        }

        conn.clear_requests();
        model
    }

    fn geometry_of(
        model: &Model,
        window: Window,
    ) -> Region {
        model.registry.find(window).unwrap().geometry()
    }

    const GEOMETRY: Region = Region {
        pos: Pos {
            x: 100,
            y: 50,
        },
        dim: Dim {
            w: 300,
            h: 200,
        },
    };

    #[test]
    fn attaching_prepends_and_focuses_the_newest_client() {
        let conn = RecordingConn::new();
        let model = managed(&conn, &[(1, GEOMETRY), (2, GEOMETRY), (3, GEOMETRY)]);

        assert_eq!(model.registry.attach_order(), &[3, 2, 1]);
        assert_eq!(model.focus, Some(3));
    }

    #[test]
    fn detaching_an_unfocused_client_leaves_focus_alone() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY), (2, GEOMETRY), (3, GEOMETRY)]);

        model.handle_destroy(2);

        assert_eq!(model.registry.attach_order(), &[3, 1]);
        assert_eq!(model.focus, Some(3));
        assert!(conn.requests().contains(&Request::ClientList(vec![3, 1])));
    }

    #[test]
    fn detaching_the_focused_head_hands_focus_to_its_successor() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY), (2, GEOMETRY), (3, GEOMETRY)]);

        model.handle_destroy(3);

        assert_eq!(model.focus, Some(2));
        assert!(conn.requests().contains(&Request::SetFocus(2)));
    }

    #[test]
    fn destroy_of_an_unknown_handle_is_a_noop() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        model.handle_destroy(99);
        model.handle_unmap(99);

        assert_eq!(model.registry.attach_order(), &[1]);
        assert!(conn.requests().is_empty());
    }

    #[test]
    fn maximize_round_trips_exactly() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        let area = conn.screen().placeable_region();

        model.toggle_maximize();

        {
            let client = model.registry.find(1).unwrap();
            assert_eq!(client.geometry(), area);
            assert!(client.is_maximized());
            assert_eq!(client.saved_geometry(), Some(GEOMETRY));
        }

        assert!(conn.requests().contains(&Request::Place(1, area)));
        assert!(conn.requests().contains(&Request::Raise(1)));

        model.toggle_maximize();

        let client = model.registry.find(1).unwrap();
        assert_eq!(client.geometry(), GEOMETRY);
        assert!(!client.is_maximized());
        assert_eq!(client.saved_geometry(), None);
    }

    #[test]
    fn axis_maximizations_conjoin_into_a_full_maximize() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        model.toggle_maximize_axis(Axis::Vertical);
        assert!(!model.registry.find(1).unwrap().is_maximized());

        model.toggle_maximize_axis(Axis::Horizontal);
        assert!(model.registry.find(1).unwrap().is_maximized());

        // a full restore undoes both axis maximizations
        model.toggle_maximize();

        let client = model.registry.find(1).unwrap();
        assert_eq!(client.geometry(), GEOMETRY);
        assert!(!client.is_maximized_axis(Axis::Vertical));
        assert!(!client.is_maximized_axis(Axis::Horizontal));
    }

    #[test]
    fn moving_steps_the_position_without_clamping() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, Region::new(200, 0, 100, 100))]);

        for _ in 0..4 {
            model.move_client(Edge::Right);
        }
        assert_eq!(geometry_of(&model, 1).pos.x, 320);

        model.move_client(Edge::Left);
        assert_eq!(geometry_of(&model, 1).pos.x, 290);

        assert!(conn.requests().contains(&Request::Move(1, Pos {
            x: 290,
            y: 0,
        })));

        // off-screen positions are legal
        for _ in 0..20 {
            model.move_client(Edge::Left);
        }
        assert_eq!(geometry_of(&model, 1).pos.x, -310);
    }

    #[test]
    fn resizing_never_collapses_an_extent() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, Region::new(0, 0, 40, 40))]);

        model.resize_client(Axis::Horizontal, Change::Dec);
        assert_eq!(geometry_of(&model, 1).dim.w, 10);

        // a further shrink would go below a single pixel
        model.resize_client(Axis::Horizontal, Change::Dec);
        assert_eq!(geometry_of(&model, 1).dim.w, 10);

        model.resize_client(Axis::Vertical, Change::Inc);
        assert_eq!(geometry_of(&model, 1).dim.h, 70);
    }

    #[test]
    fn resizing_honors_size_hints() {
        let conn = RecordingConn::new();

        conn.size_hints.borrow_mut().insert(
            1,
            SizeHints::new(
                Some(100),
                Some(100),
                Some(320),
                Some(320),
                None,
                None,
                None,
                None,
            ),
        );

        let mut model = managed(&conn, &[(1, Region::new(0, 0, 120, 300))]);

        // 120 - 30 would violate the minimum width of 100
        model.resize_client(Axis::Horizontal, Change::Dec);
        assert_eq!(geometry_of(&model, 1).dim.w, 120);

        // 300 + 30 caps at the maximum height of 320
        model.resize_client(Axis::Vertical, Change::Inc);
        assert_eq!(geometry_of(&model, 1).dim.h, 320);
    }

    #[test]
    fn teleporting_centers_without_resizing() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        let area = conn.screen().placeable_region();

        model.teleport(Anchor::Center);

        let geometry = geometry_of(&model, 1);
        assert_eq!(geometry.dim, GEOMETRY.dim);
        assert_eq!(geometry.pos.x, (area.dim.w - GEOMETRY.dim.w) / 2);
        assert_eq!(geometry.pos.y, (area.dim.h - GEOMETRY.dim.h) / 2);

        model.teleport(Anchor::BottomRight);

        let geometry = geometry_of(&model, 1);
        assert_eq!(geometry.dim, GEOMETRY.dim);
        assert_eq!(geometry.bottom_right(), area.bottom_right());
    }

    #[test]
    fn sending_the_last_client_away_clears_focus() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        model.send_focus_to_workspace(1);

        assert_eq!(model.focus, None);
        assert!(conn.requests().contains(&Request::Unmap(1)));
        assert!(conn.requests().contains(&Request::Unfocus));
        assert!(conn.requests().contains(&Request::States(1, vec![
            WindowState::Hidden
        ])));

        conn.clear_requests();
        model.select_workspace(1);

        assert_eq!(model.focus, Some(1));
        assert!(conn.requests().contains(&Request::Map(1)));
        assert!(conn.requests().contains(&Request::SetFocus(1)));
    }

    #[test]
    fn cycling_with_a_single_visible_client_is_a_noop() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        model.focus_stack(Direction::Forward);
        model.focus_stack(Direction::Backward);

        assert_eq!(model.focus, Some(1));
        assert!(conn.requests().is_empty());
    }

    #[test]
    fn cycling_wraps_around_the_visible_clients() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY), (2, GEOMETRY), (3, GEOMETRY)]);

        // attach order is [3, 2, 1], focus on 3
        model.focus_stack(Direction::Forward);
        assert_eq!(model.focus, Some(2));

        model.focus_stack(Direction::Backward);
        assert_eq!(model.focus, Some(3));

        model.focus_stack(Direction::Backward);
        assert_eq!(model.focus, Some(1));
    }

    #[test]
    fn cycling_skips_clients_on_other_workspaces() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY), (2, GEOMETRY), (3, GEOMETRY)]);

        model.send_focus_to_workspace(1);

        // 3 is gone from view; cycling alternates between 2 and 1
        assert_eq!(model.focus, Some(2));
        model.focus_stack(Direction::Forward);
        assert_eq!(model.focus, Some(1));
        model.focus_stack(Direction::Forward);
        assert_eq!(model.focus, Some(2));
    }

    #[test]
    fn workspace_selection_is_idempotent() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY), (2, GEOMETRY)]);

        model.select_workspace(1);

        assert_eq!(model.focus, None);
        let visible: Vec<Window> = model.registry.visible(1).map(|c| c.window()).collect();

        conn.clear_requests();
        model.select_workspace(1);

        assert!(conn.requests().is_empty());
        assert_eq!(
            model.registry.visible(1).map(|c| c.window()).collect::<Vec<Window>>(),
            visible
        );
    }

    #[test]
    fn previous_workspace_selection_swaps_back_and_forth() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        model.select_workspace(3);
        assert_eq!(model.selected_workspace, 3);
        assert_eq!(model.previous_workspace, 0);

        model.select_previous_workspace();
        assert_eq!(model.selected_workspace, 0);
        assert_eq!(model.previous_workspace, 3);

        assert_eq!(model.focus, Some(1));
    }

    #[test]
    fn sticky_clients_remain_visible_and_focused_across_workspaces() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        model.toggle_sticky();
        conn.clear_requests();

        model.select_workspace(2);

        assert_eq!(model.focus, Some(1));
        assert!(!conn.requests().contains(&Request::Unmap(1)));
    }

    #[test]
    fn fullscreen_import_acts_through_maximize() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        let area = conn.screen().placeable_region();

        model.handle_state_request(1, WindowState::Fullscreen, ToggleAction::Add);

        {
            let client = model.registry.find(1).unwrap();
            assert!(client.is_fullscreen());
            assert_eq!(client.geometry(), area);
        }

        assert!(conn.requests().contains(&Request::States(1, vec![
            WindowState::MaximizedVert,
            WindowState::MaximizedHorz,
            WindowState::Fullscreen,
        ])));

        model.handle_state_request(1, WindowState::Fullscreen, ToggleAction::Toggle);

        let client = model.registry.find(1).unwrap();
        assert!(!client.is_fullscreen());
        assert_eq!(client.geometry(), GEOMETRY);
    }

    #[test]
    fn flag_only_imports_have_no_geometry_effect() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        model.handle_state_request(1, WindowState::Above, ToggleAction::Add);
        model.handle_state_request(1, WindowState::Below, ToggleAction::Toggle);

        assert_eq!(geometry_of(&model, 1), GEOMETRY);
        assert!(conn.requests().iter().all(|request| match request {
            Request::Place(..) | Request::Move(..) | Request::Resize(..) => false,
            _ => true,
        }));
        assert!(conn.requests().contains(&Request::States(1, vec![
            WindowState::Below,
            WindowState::Above,
        ])));
    }

    #[test]
    fn state_requests_for_unknown_windows_are_ignored() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY)]);

        model.handle_state_request(99, WindowState::Fullscreen, ToggleAction::Add);

        assert!(conn.requests().is_empty());
    }

    #[test]
    fn key_dispatch_ignores_lock_modifiers() {
        let conn = RecordingConn::new();

        let key_bindings = vec![crate::binding::KeyBinding {
            key_code: KeyCode {
                mask: 0x40,
                code: 10,
            },
            action: Action::Maximize,
        }];

        let mut model = Model::new(&conn, key_bindings, Vec::new(), Vec::new());
        conn.set_geometry(1, GEOMETRY);
        model.handle_map_request(1);

        // NumLock (0x10) held alongside the bound modifier
        model.handle_key(KeyCode {
            mask: 0x40 | 0x10,
            code: 10,
        });

        assert!(model.registry.find(1).unwrap().is_maximized());

        // an unbound chord falls through silently
        model.handle_key(KeyCode {
            mask: 0x40,
            code: 11,
        });
    }

    #[test]
    fn rules_apply_before_the_first_export() {
        let conn = RecordingConn::new();

        let rules = vec![crate::rule::Rule {
            class: "",
            workspace: Some(1),
            bordered: false,
        }];

        let mut model = Model::new(&conn, Vec::new(), Vec::new(), rules);
        conn.set_geometry(1, GEOMETRY);
        model.handle_map_request(1);

        let client = model.registry.find(1).unwrap();
        assert_eq!(client.workspace(), 1);
        assert!(!client.is_bordered());

        // ruled off the selected workspace: not focused, exported hidden
        assert_eq!(model.focus, None);
        assert!(conn.requests().contains(&Request::BorderWidth(1, 0)));
        assert!(conn.requests().contains(&Request::WindowDesktop(1, 1)));
        assert!(conn.requests().contains(&Request::States(1, vec![
            WindowState::Hidden
        ])));
    }

    #[test]
    fn pointer_drags_move_and_resize() {
        let conn = RecordingConn::new();

        let button_bindings = vec![
            crate::binding::ButtonBinding {
                button_code: ButtonCode {
                    mask: 0x40,
                    button: 1,
                },
                action: Action::DragMove,
            },
            crate::binding::ButtonBinding {
                button_code: ButtonCode {
                    mask: 0x40,
                    button: 3,
                },
                action: Action::DragResize,
            },
        ];

        let mut model = Model::new(&conn, Vec::new(), button_bindings, Vec::new());
        conn.set_geometry(1, GEOMETRY);
        model.handle_map_request(1);

        let press = Pos {
            x: 150,
            y: 80,
        };

        model.handle_button(
            ButtonCode {
                mask: 0x40,
                button: 1,
            },
            Some(1),
            press,
        );

        model.handle_motion(Pos {
            x: 170,
            y: 60,
        });

        assert_eq!(geometry_of(&model, 1).pos, Pos {
            x: 120,
            y: 30,
        });

        model.handle_button_release();
        assert!(model.drag.is_none());

        model.handle_button(
            ButtonCode {
                mask: 0x40,
                button: 3,
            },
            Some(1),
            press,
        );

        model.handle_motion(Pos {
            x: 200,
            y: 120,
        });

        assert_eq!(geometry_of(&model, 1).dim, Dim {
            w: 350,
            h: 240,
        });

        model.handle_button_release();
    }

    #[test]
    fn kill_addresses_the_focused_client_only() {
        let conn = RecordingConn::new();
        let mut model = managed(&conn, &[(1, GEOMETRY), (2, GEOMETRY)]);

        model.kill_focus();
        assert_eq!(conn.requests(), vec![Request::Kill(2)]);

        conn.clear_requests();
        model.focus(None);
        conn.clear_requests();

        model.kill_focus();
        assert!(conn.requests().is_empty());
    }

    #[test]
    fn a_failed_geometry_query_seeds_a_zero_rectangle() {
        let conn = RecordingConn::new();
        let mut model = Model::new(&conn, Vec::new(), Vec::new(), Vec::new());

        // no geometry configured for this window
        model.handle_map_request(7);

        assert_eq!(geometry_of(&model, 7), Region::default());
        assert_eq!(model.focus, Some(7));
    }
}
