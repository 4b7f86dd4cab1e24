use crate::connection::Connection;
use crate::event::Event;
use crate::event::ToggleAction;
use crate::geometry::Dim;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::hints::SizeHints;
use crate::input::ButtonCode;
use crate::input::KeyCode;
use crate::screen::Screen;
use crate::window::Window;
use crate::window::WindowState;
use crate::Result;

use std::collections::HashMap;
use std::convert::TryFrom;

use x11rb::connection;
use x11rb::cursor::Handle as CursorHandle;
use x11rb::errors::ReplyError;
use x11rb::properties;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt;
use x11rb::protocol::xproto::EventMask;
use x11rb::protocol::xproto::ModMask;
use x11rb::protocol::ErrorKind;
use x11rb::protocol::Event as XEvent;
use x11rb::resource_manager::Database;
use x11rb::wrapper::ConnectionExt as _;

use anyhow::anyhow;
use strum::IntoEnumIterator;

type Atom = u32;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        UTF8_STRING,

        // ICCCM client properties
        WM_CLASS,
        WM_NORMAL_HINTS,

        // EWMH root properties
        _NET_SUPPORTED,
        _NET_CLIENT_LIST,
        _NET_NUMBER_OF_DESKTOPS,
        _NET_CURRENT_DESKTOP,
        _NET_DESKTOP_NAMES,
        _NET_ACTIVE_WINDOW,
        _NET_SUPPORTING_WM_CHECK,

        // EWMH application properties
        _NET_WM_NAME,
        _NET_WM_PID,
        _NET_WM_DESKTOP,
        _NET_WM_STATE,

        // EWMH window states
        _NET_WM_STATE_MAXIMIZED_VERT,
        _NET_WM_STATE_MAXIMIZED_HORZ,
        _NET_WM_STATE_HIDDEN,
        _NET_WM_STATE_FULLSCREEN,
        _NET_WM_STATE_ABOVE,
        _NET_WM_STATE_BELOW,
    }
}

pub struct XConnection<'conn, Conn: connection::Connection> {
    conn: &'conn Conn,
    atoms: Atoms,
    state_map: HashMap<Atom, WindowState>,
    screen: Screen,
    root: Window,
    check_window: Window,
    root_event_mask: EventMask,
    window_event_mask: EventMask,
    drag_event_mask: EventMask,
}

impl<'conn, Conn: connection::Connection> XConnection<'conn, Conn> {
    pub fn new(
        conn: &'conn Conn,
        screen_num: usize,
    ) -> Result<Self> {
        let setup_screen = conn.setup().roots[screen_num].clone();
        let root = setup_screen.root;

        let root_event_mask: EventMask = EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::BUTTON_PRESS;

        let window_event_mask: EventMask =
            EventMask::PROPERTY_CHANGE | EventMask::STRUCTURE_NOTIFY;

        let drag_event_mask: EventMask =
            EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION;

        let aux = xproto::ChangeWindowAttributesAux::default().event_mask(root_event_mask);

        let res = conn.change_window_attributes(root, &aux)?.check();
        if let Err(ReplyError::X11Error(err)) = res {
            if err.error_kind == ErrorKind::Access {
                return Err(anyhow!("another window manager is already running"));
            } else {
                return Err(anyhow!("unable to set up window manager"));
            }
        }

        let atoms = Atoms::new(conn)?.reply()?;

        let state_map: HashMap<Atom, WindowState> = map!(
            atoms._NET_WM_STATE_MAXIMIZED_VERT => WindowState::MaximizedVert,
            atoms._NET_WM_STATE_MAXIMIZED_HORZ => WindowState::MaximizedHorz,
            atoms._NET_WM_STATE_HIDDEN => WindowState::Hidden,
            atoms._NET_WM_STATE_FULLSCREEN => WindowState::Fullscreen,
            atoms._NET_WM_STATE_ABOVE => WindowState::Above,
            atoms._NET_WM_STATE_BELOW => WindowState::Below,
        );

        let check_window = conn.generate_id()?;
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            check_window,
            root,
            -1,
            -1,
            1,
            1,
            0,
            xproto::WindowClass::INPUT_ONLY,
            x11rb::COPY_FROM_PARENT,
            &xproto::CreateWindowAux::default().override_redirect(1),
        )?;

        if let Ok(database) = Database::new_from_default(conn) {
            drop(CursorHandle::new(conn, screen_num, &database).map(|cookie| {
                cookie.reply().map(|reply| {
                    let aux = xproto::ChangeWindowAttributesAux::default()
                        .cursor(reply.load_cursor(conn, "left_ptr").ok());

                    drop(conn.change_window_attributes(root, &aux));
                })
            }));
        }

        let screen = Screen::new(
            Region::new(
                0,
                0,
                setup_screen.width_in_pixels as i32,
                setup_screen.height_in_pixels as i32,
            ),
            screen_num,
        );

        Ok(Self {
            conn,
            atoms,
            state_map,
            screen,
            root,
            check_window,
            root_event_mask,
            window_event_mask,
            drag_event_mask,
        })
    }

    #[inline]
    fn state_atom(
        &self,
        state: WindowState,
    ) -> Atom {
        match state {
            WindowState::MaximizedVert => self.atoms._NET_WM_STATE_MAXIMIZED_VERT,
            WindowState::MaximizedHorz => self.atoms._NET_WM_STATE_MAXIMIZED_HORZ,
            WindowState::Hidden => self.atoms._NET_WM_STATE_HIDDEN,
            WindowState::Fullscreen => self.atoms._NET_WM_STATE_FULLSCREEN,
            WindowState::Above => self.atoms._NET_WM_STATE_ABOVE,
            WindowState::Below => self.atoms._NET_WM_STATE_BELOW,
        }
    }

    #[inline]
    fn get_state(
        &self,
        atom: Atom,
    ) -> Option<WindowState> {
        self.state_map.get(&atom).copied()
    }

    fn on_key_press(
        &self,
        event: &xproto::KeyPressEvent,
    ) -> Option<Event> {
        Some(Event::Key {
            key_code: KeyCode {
                mask: event.state,
                code: event.detail,
            },
        })
    }

    fn on_button_press(
        &self,
        event: &xproto::ButtonPressEvent,
    ) -> Option<Event> {
        Some(Event::Button {
            button_code: ButtonCode {
                mask: event.state,
                button: event.detail,
            },
            window: match event.child {
                x11rb::NONE => None,
                window => Some(window),
            },
            root_pos: Pos {
                x: event.root_x as i32,
                y: event.root_y as i32,
            },
        })
    }

    fn on_motion_notify(
        &self,
        event: &xproto::MotionNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Motion {
            root_pos: Pos {
                x: event.root_x as i32,
                y: event.root_y as i32,
            },
        })
    }

    fn on_map_request(
        &self,
        event: &xproto::MapRequestEvent,
    ) -> Option<Event> {
        Some(Event::MapRequest {
            window: event.window,
        })
    }

    fn on_map_notify(
        &self,
        event: &xproto::MapNotifyEvent,
    ) -> Option<Event> {
        if event.override_redirect {
            return None;
        }

        Some(Event::Map {
            window: event.window,
        })
    }

    fn on_unmap_notify(
        &self,
        event: &xproto::UnmapNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Unmap {
            window: event.window,
        })
    }

    fn on_destroy_notify(
        &self,
        event: &xproto::DestroyNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Destroy {
            window: event.window,
        })
    }

    fn on_client_message(
        &self,
        event: &xproto::ClientMessageEvent,
    ) -> Option<Event> {
        if event.type_ != self.atoms._NET_WM_STATE {
            return None;
        }

        let data = event.data.as_data32();

        let action = match data[0] {
            0 => ToggleAction::Remove,
            1 => ToggleAction::Add,
            2 => ToggleAction::Toggle,
            _ => return None,
        };

        // a state request carries up to two properties; the first one
        // recognized wins
        data[1..=2]
            .iter()
            .find_map(|&atom| self.get_state(atom))
            .map(|state| Event::StateRequest {
                window: event.window,
                state,
                action,
            })
    }
}

impl<'conn, Conn: connection::Connection> Connection for XConnection<'conn, Conn> {
    #[inline]
    fn flush(&self) -> bool {
        self.conn.flush().is_ok()
    }

    fn step(&self) -> Option<Event> {
        self.conn
            .wait_for_event()
            .ok()
            .and_then(|event| match event {
                XEvent::KeyPress(e) => self.on_key_press(&e),
                XEvent::ButtonPress(e) => self.on_button_press(&e),
                XEvent::ButtonRelease(_) => Some(Event::ButtonRelease),
                XEvent::MotionNotify(e) => self.on_motion_notify(&e),
                XEvent::MapRequest(e) => self.on_map_request(&e),
                XEvent::MapNotify(e) => self.on_map_notify(&e),
                XEvent::UnmapNotify(e) => self.on_unmap_notify(&e),
                XEvent::DestroyNotify(e) => self.on_destroy_notify(&e),
                XEvent::ClientMessage(e) => self.on_client_message(&e),
                _ => None,
            })
    }

    #[inline]
    fn screen(&self) -> &Screen {
        &self.screen
    }

    fn top_level_windows(&self) -> Vec<Window> {
        self.conn
            .query_tree(self.root)
            .map_or(Vec::with_capacity(0), |cookie| {
                cookie.reply().map_or(Vec::with_capacity(0), |reply| {
                    reply
                        .children
                        .into_iter()
                        .filter(|&w| self.must_manage_window(w))
                        .collect()
                })
            })
    }

    fn cleanup(&self) {
        drop(
            self.conn
                .ungrab_key(xproto::Grab::ANY, self.root, xproto::ModMask::ANY),
        );

        drop(
            self.conn
                .ungrab_button(xproto::ButtonIndex::ANY, self.root, xproto::ModMask::ANY),
        );

        drop(self.conn.destroy_window(self.check_window));

        drop(
            self.conn
                .delete_property(self.root, self.atoms._NET_ACTIVE_WINDOW),
        );

        drop(
            self.conn
                .delete_property(self.root, self.atoms._NET_SUPPORTING_WM_CHECK),
        );

        drop(
            self.conn
                .delete_property(self.root, self.atoms._NET_SUPPORTED),
        );

        drop(
            self.conn
                .delete_property(self.root, self.atoms._NET_CLIENT_LIST),
        );

        self.unfocus();
        self.flush();
    }

    #[inline]
    fn init_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.change_window_attributes(
            window,
            &xproto::ChangeWindowAttributesAux::default().event_mask(self.window_event_mask),
        ));
    }

    #[inline]
    fn map_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.map_window(window));
    }

    #[inline]
    fn unmap_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.unmap_window(window));
    }

    #[inline]
    fn kill_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.kill_client(window));
    }

    fn place_window(
        &self,
        window: Window,
        region: &Region,
    ) {
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default()
                    .x(region.pos.x as i32)
                    .y(region.pos.y as i32)
                    .width(region.dim.w as u32)
                    .height(region.dim.h as u32),
            ),
        );
    }

    #[inline]
    fn move_window(
        &self,
        window: Window,
        pos: Pos,
    ) {
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default()
                    .x(pos.x as i32)
                    .y(pos.y as i32),
            ),
        );
    }

    #[inline]
    fn resize_window(
        &self,
        window: Window,
        dim: Dim,
    ) {
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default()
                    .width(dim.w as u32)
                    .height(dim.h as u32),
            ),
        );
    }

    #[inline]
    fn stack_window_above(
        &self,
        window: Window,
    ) {
        drop(self.conn.configure_window(
            window,
            &xproto::ConfigureWindowAux::default().stack_mode(xproto::StackMode::ABOVE),
        ));
    }

    #[inline]
    fn focus_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.set_input_focus(
            xproto::InputFocus::POINTER_ROOT,
            window,
            x11rb::CURRENT_TIME,
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.root,
            self.atoms._NET_ACTIVE_WINDOW,
            xproto::AtomEnum::WINDOW,
            &[window],
        ));
    }

    #[inline]
    fn unfocus(&self) {
        drop(self.conn.set_input_focus(
            xproto::InputFocus::POINTER_ROOT,
            x11rb::NONE,
            x11rb::CURRENT_TIME,
        ));

        drop(
            self.conn
                .delete_property(self.root, self.atoms._NET_ACTIVE_WINDOW),
        );
    }

    #[inline]
    fn set_window_border_width(
        &self,
        window: Window,
        width: u32,
    ) {
        drop(self.conn.configure_window(
            window,
            &xproto::ConfigureWindowAux::default().border_width(width),
        ));
    }

    #[inline]
    fn set_window_border_color(
        &self,
        window: Window,
        color: u32,
    ) {
        drop(self.conn.change_window_attributes(
            window,
            &xproto::ChangeWindowAttributesAux::default().border_pixel(color),
        ));
    }

    fn grab_bindings(
        &self,
        key_codes: &[KeyCode],
        button_codes: &[ButtonCode],
    ) {
        let lock_masks = [
            0,
            u16::from(ModMask::M2),
            u16::from(ModMask::LOCK),
            u16::from(ModMask::M2) | u16::from(ModMask::LOCK),
        ];

        for &lock_mask in &lock_masks {
            for key_code in key_codes {
                drop(self.conn.grab_key(
                    false,
                    self.root,
                    key_code.mask | lock_mask,
                    key_code.code,
                    xproto::GrabMode::ASYNC,
                    xproto::GrabMode::ASYNC,
                ));
            }

            for button_code in button_codes {
                drop(
                    self.conn.grab_button(
                        false,
                        self.root,
                        u32::from(self.drag_event_mask) as u16,
                        xproto::GrabMode::ASYNC,
                        xproto::GrabMode::ASYNC,
                        x11rb::NONE,
                        x11rb::NONE,
                        xproto::ButtonIndex::try_from(button_code.button)
                            .unwrap_or(xproto::ButtonIndex::ANY),
                        button_code.mask | lock_mask,
                    ),
                );
            }
        }

        self.flush();
    }

    #[inline]
    fn grab_pointer(&self) {
        drop(self.conn.grab_pointer(
            false,
            self.root,
            u32::from(self.drag_event_mask) as u16,
            xproto::GrabMode::ASYNC,
            xproto::GrabMode::ASYNC,
            self.root,
            x11rb::NONE,
            x11rb::CURRENT_TIME,
        ));
    }

    #[inline]
    fn ungrab_pointer(&self) {
        drop(self.conn.ungrab_pointer(x11rb::CURRENT_TIME));
    }

    #[inline]
    fn get_pointer_position(&self) -> Pos {
        self.conn
            .query_pointer(self.root)
            .map_or(Pos::default(), |cookie| {
                cookie.reply().map_or(Pos::default(), |reply| Pos {
                    x: reply.root_x as i32,
                    y: reply.root_y as i32,
                })
            })
    }

    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region> {
        let geometry = self.conn.get_geometry(window)?.reply()?;

        Ok(Region::new(
            geometry.x as i32,
            geometry.y as i32,
            geometry.width as i32,
            geometry.height as i32,
        ))
    }

    fn get_window_class(
        &self,
        window: Window,
    ) -> String {
        properties::WmClass::get(self.conn, window).map_or(String::new(), |cookie| {
            cookie.reply().map_or(String::new(), |reply| {
                std::str::from_utf8(reply.class())
                    .map_or(String::new(), |class| class.to_owned())
            })
        })
    }

    fn get_window_size_hints(
        &self,
        window: Window,
    ) -> Option<SizeHints> {
        properties::WmSizeHints::get_normal_hints(self.conn, window)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .map(|hints| {
                SizeHints::new(
                    hints.min_size.map(|(w, _)| w),
                    hints.min_size.map(|(_, h)| h),
                    hints.max_size.map(|(w, _)| w),
                    hints.max_size.map(|(_, h)| h),
                    hints.base_size.map(|(w, _)| w),
                    hints.base_size.map(|(_, h)| h),
                    hints.size_increment.map(|(w, _)| w),
                    hints.size_increment.map(|(_, h)| h),
                )
            })
    }

    fn must_manage_window(
        &self,
        window: Window,
    ) -> bool {
        self.conn
            .get_window_attributes(window)
            .map_or(false, |cookie| {
                cookie.reply().map_or(false, |reply| {
                    !reply.override_redirect
                        && reply.class != xproto::WindowClass::INPUT_ONLY
                })
            })
    }

    fn init_wm_properties(
        &self,
        wm_name: &str,
        desktop_names: &[&str],
    ) {
        let supported = [
            self.atoms._NET_SUPPORTED,
            self.atoms._NET_CLIENT_LIST,
            self.atoms._NET_NUMBER_OF_DESKTOPS,
            self.atoms._NET_CURRENT_DESKTOP,
            self.atoms._NET_DESKTOP_NAMES,
            self.atoms._NET_ACTIVE_WINDOW,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            self.atoms._NET_WM_NAME,
            self.atoms._NET_WM_DESKTOP,
            self.atoms._NET_WM_STATE,
            self.atoms._NET_WM_STATE_MAXIMIZED_VERT,
            self.atoms._NET_WM_STATE_MAXIMIZED_HORZ,
            self.atoms._NET_WM_STATE_HIDDEN,
            self.atoms._NET_WM_STATE_FULLSCREEN,
            self.atoms._NET_WM_STATE_ABOVE,
            self.atoms._NET_WM_STATE_BELOW,
        ];

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.root,
            self.atoms._NET_SUPPORTED,
            xproto::AtomEnum::ATOM,
            &supported,
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.check_window,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            xproto::AtomEnum::WINDOW,
            &[self.check_window],
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.root,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            xproto::AtomEnum::WINDOW,
            &[self.check_window],
        ));

        drop(self.conn.change_property8(
            xproto::PropMode::REPLACE,
            self.check_window,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            wm_name.as_bytes(),
        ));

        drop(self.conn.change_property8(
            xproto::PropMode::REPLACE,
            self.root,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            wm_name.as_bytes(),
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.check_window,
            self.atoms._NET_WM_PID,
            xproto::AtomEnum::CARDINAL,
            &[std::process::id()],
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.root,
            self.atoms._NET_NUMBER_OF_DESKTOPS,
            xproto::AtomEnum::CARDINAL,
            &[desktop_names.len() as u32],
        ));

        drop(self.conn.change_property8(
            xproto::PropMode::REPLACE,
            self.root,
            self.atoms._NET_DESKTOP_NAMES,
            self.atoms.UTF8_STRING,
            desktop_names.join("\0").as_bytes(),
        ));

        self.set_current_desktop(0);
    }

    #[inline]
    fn set_current_desktop(
        &self,
        index: usize,
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.root,
            self.atoms._NET_CURRENT_DESKTOP,
            xproto::AtomEnum::CARDINAL,
            &[index as u32],
        ));
    }

    #[inline]
    fn set_window_desktop(
        &self,
        window: Window,
        index: usize,
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            window,
            self.atoms._NET_WM_DESKTOP,
            xproto::AtomEnum::CARDINAL,
            &[index as u32],
        ));
    }

    fn update_window_states(
        &self,
        window: Window,
        states: &[WindowState],
    ) {
        if states.is_empty() {
            drop(self.conn.delete_property(window, self.atoms._NET_WM_STATE));
            return;
        }

        // deterministic export order, as ordered in the state enum
        let atoms: Vec<Atom> = WindowState::iter()
            .filter(|state| states.contains(state))
            .map(|state| self.state_atom(state))
            .collect();

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            window,
            self.atoms._NET_WM_STATE,
            xproto::AtomEnum::ATOM,
            &atoms,
        ));
    }

    #[inline]
    fn update_client_list(
        &self,
        clients: &[Window],
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.root,
            self.atoms._NET_CLIENT_LIST,
            xproto::AtomEnum::WINDOW,
            clients,
        ));
    }
}
