use crate::event::Event;
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

/// The display server session the window manager drives. All requests
/// are fire-and-forget unless the return type says otherwise; failures
/// at the protocol layer are not surfaced.
pub trait Connection {
    fn flush(&self) -> bool;
    fn step(&self) -> Option<Event>;
    fn screen(&self) -> &Screen;
    fn top_level_windows(&self) -> Vec<Window>;
    fn cleanup(&self);

    // window manipulation
    fn init_window(
        &self,
        window: Window,
    );
    fn map_window(
        &self,
        window: Window,
    );
    fn unmap_window(
        &self,
        window: Window,
    );
    fn kill_window(
        &self,
        window: Window,
    );
    fn place_window(
        &self,
        window: Window,
        region: &Region,
    );
    fn move_window(
        &self,
        window: Window,
        pos: Pos,
    );
    fn resize_window(
        &self,
        window: Window,
        dim: Dim,
    );
    fn stack_window_above(
        &self,
        window: Window,
    );
    fn focus_window(
        &self,
        window: Window,
    );
    fn unfocus(&self);
    fn set_window_border_width(
        &self,
        window: Window,
        width: u32,
    );
    fn set_window_border_color(
        &self,
        window: Window,
        color: u32,
    );

    // input
    fn grab_bindings(
        &self,
        key_codes: &[KeyCode],
        button_codes: &[ButtonCode],
    );
    fn grab_pointer(&self);
    fn ungrab_pointer(&self);
    fn get_pointer_position(&self) -> Pos;

    // queries
    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region>;
    fn get_window_class(
        &self,
        window: Window,
    ) -> String;
    fn get_window_size_hints(
        &self,
        window: Window,
    ) -> Option<SizeHints>;
    fn must_manage_window(
        &self,
        window: Window,
    ) -> bool;

    // EWMH
    fn init_wm_properties(
        &self,
        wm_name: &str,
        desktop_names: &[&str],
    );
    fn set_current_desktop(
        &self,
        index: usize,
    );
    fn set_window_desktop(
        &self,
        window: Window,
        index: usize,
    );
    fn update_window_states(
        &self,
        window: Window,
        states: &[WindowState],
    );
    fn update_client_list(
        &self,
        clients: &[Window],
    );
}
