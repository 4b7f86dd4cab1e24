use crate::common::Toggle;

use winsys::geometry::Axis;
use winsys::geometry::Region;
use winsys::hints::SizeHints;
use winsys::window::Window;
use winsys::window::WindowState;

use std::cell::Cell;
use std::cell::RefCell;

bitflags::bitflags! {
    /// The single source of truth for a client's boolean state, both
    /// for internal logic and for the exported protocol atom list.
    /// Full maximization is the conjunction of both axis flags, not an
    /// independent mode.
    pub struct ClientFlags: u32 {
        const VERT_MAX = 1 << 0;
        const HORZ_MAX = 1 << 1;
        const FULLSCREEN = 1 << 2;
        const ABOVE = 1 << 3;
        const BELOW = 1 << 4;
        const FIXED = 1 << 5;
        const STICKY = 1 << 6;

        const MAX = Self::VERT_MAX.bits | Self::HORZ_MAX.bits;
        const SAVES_GEOMETRY =
            Self::VERT_MAX.bits | Self::HORZ_MAX.bits | Self::FULLSCREEN.bits;
    }
}

impl ClientFlags {
    #[inline]
    pub fn of_axis(axis: Axis) -> Self {
        match axis {
            Axis::Vertical => Self::VERT_MAX,
            Axis::Horizontal => Self::HORZ_MAX,
        }
    }
}

pub struct Client {
    window: Window,
    class: RefCell<String>,
    workspace: Cell<usize>,
    geometry: Cell<Region>,
    saved_geometry: Cell<Option<Region>>,
    size_hints: Cell<Option<SizeHints>>,
    flags: Cell<ClientFlags>,
    bordered: Cell<bool>,
    focused: Cell<bool>,
    mapped: Cell<bool>,
    expected_unmap_count: Cell<u8>,
}

impl Client {
    pub fn new(
        window: Window,
        class: impl Into<String>,
        workspace: usize,
        geometry: Region,
        size_hints: Option<SizeHints>,
    ) -> Self {
        Self {
            window,
            class: RefCell::new(class.into()),
            workspace: Cell::new(workspace),
            geometry: Cell::new(geometry),
            saved_geometry: Cell::new(None),
            size_hints: Cell::new(size_hints),
            flags: Cell::new(ClientFlags::empty()),
            bordered: Cell::new(true),
            focused: Cell::new(false),
            mapped: Cell::new(false),
            expected_unmap_count: Cell::new(0),
        }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    #[inline]
    pub fn class(&self) -> String {
        self.class.borrow().to_owned()
    }

    #[inline]
    pub fn set_workspace(
        &self,
        workspace: usize,
    ) {
        self.workspace.set(workspace);
    }

    #[inline]
    pub fn workspace(&self) -> usize {
        self.workspace.get()
    }

    #[inline]
    pub fn set_geometry(
        &self,
        geometry: Region,
    ) {
        self.geometry.set(geometry);
    }

    #[inline]
    pub fn geometry(&self) -> Region {
        self.geometry.get()
    }

    #[inline]
    pub fn saved_geometry(&self) -> Option<Region> {
        self.saved_geometry.get()
    }

    #[inline]
    pub fn set_size_hints(
        &self,
        size_hints: Option<SizeHints>,
    ) {
        self.size_hints.set(size_hints);
    }

    #[inline]
    pub fn size_hints(&self) -> Option<SizeHints> {
        self.size_hints.get()
    }

    #[inline]
    pub fn flags(&self) -> ClientFlags {
        self.flags.get()
    }

    #[inline]
    fn set_flag(
        &self,
        flag: ClientFlags,
        toggle: Toggle,
    ) {
        let mut flags = self.flags.get();
        flags.set(flag, toggle.eval(flags.contains(flag)));
        self.flags.set(flags);
    }

    #[inline]
    pub fn set_maximized_axis(
        &self,
        axis: Axis,
        toggle: Toggle,
    ) {
        self.set_flag(ClientFlags::of_axis(axis), toggle);
    }

    #[inline]
    pub fn is_maximized_axis(
        &self,
        axis: Axis,
    ) -> bool {
        self.flags.get().contains(ClientFlags::of_axis(axis))
    }

    #[inline]
    pub fn set_maximized(
        &self,
        toggle: Toggle,
    ) {
        self.set_flag(ClientFlags::MAX, toggle);
    }

    #[inline]
    pub fn is_maximized(&self) -> bool {
        self.flags.get().contains(ClientFlags::MAX)
    }

    #[inline]
    pub fn set_fullscreen(
        &self,
        toggle: Toggle,
    ) {
        self.set_flag(ClientFlags::FULLSCREEN, toggle);
    }

    #[inline]
    pub fn is_fullscreen(&self) -> bool {
        self.flags.get().contains(ClientFlags::FULLSCREEN)
    }

    #[inline]
    pub fn set_sticky(
        &self,
        toggle: Toggle,
    ) {
        self.set_flag(ClientFlags::STICKY, toggle);
    }

    #[inline]
    pub fn is_sticky(&self) -> bool {
        self.flags.get().contains(ClientFlags::STICKY)
    }

    #[inline]
    pub fn set_fixed(
        &self,
        toggle: Toggle,
    ) {
        self.set_flag(ClientFlags::FIXED, toggle);
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.flags.get().contains(ClientFlags::FIXED)
    }

    #[inline]
    pub fn set_above(
        &self,
        toggle: Toggle,
    ) {
        self.set_flag(ClientFlags::ABOVE, toggle);
    }

    #[inline]
    pub fn set_below(
        &self,
        toggle: Toggle,
    ) {
        self.set_flag(ClientFlags::BELOW, toggle);
    }

    #[inline]
    pub fn set_bordered(
        &self,
        bordered: bool,
    ) {
        self.bordered.set(bordered);
    }

    #[inline]
    pub fn is_bordered(&self) -> bool {
        self.bordered.get()
    }

    #[inline]
    pub fn set_focused(
        &self,
        toggle: Toggle,
    ) {
        self.focused.set(toggle.eval(self.focused.get()));
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    /// Visible iff on the selected workspace, or pinned to every
    /// workspace through the fixed or sticky flag.
    #[inline]
    pub fn is_visible_on(
        &self,
        workspace: usize,
    ) -> bool {
        self.workspace.get() == workspace
            || self
                .flags
                .get()
                .intersects(ClientFlags::FIXED | ClientFlags::STICKY)
    }

    /// Records the given axis of the current geometry for later exact
    /// restore, merging with previously saved axes. An axis that is
    /// already maximized keeps its earlier pre-maximize values.
    pub fn save_axis(
        &self,
        axis: Axis,
    ) {
        if self.flags.get().contains(ClientFlags::of_axis(axis)) {
            return;
        }

        let geometry = self.geometry.get();
        let mut saved = self.saved_geometry.get().unwrap_or(geometry);

        match axis {
            Axis::Vertical => {
                saved.pos.y = geometry.pos.y;
                saved.dim.h = geometry.dim.h;
            },
            Axis::Horizontal => {
                saved.pos.x = geometry.pos.x;
                saved.dim.w = geometry.dim.w;
            },
        }

        self.saved_geometry.set(Some(saved));
    }

    /// Copies the given axis of the saved geometry back verbatim.
    pub fn restore_axis(
        &self,
        axis: Axis,
    ) {
        if let Some(saved) = self.saved_geometry.get() {
            let mut geometry = self.geometry.get();

            match axis {
                Axis::Vertical => {
                    geometry.pos.y = saved.pos.y;
                    geometry.dim.h = saved.dim.h;
                },
                Axis::Horizontal => {
                    geometry.pos.x = saved.pos.x;
                    geometry.dim.w = saved.dim.w;
                },
            }

            self.geometry.set(geometry);
        }
    }

    /// Drops the saved rectangle once no geometry-saving flag remains
    /// set.
    pub fn discard_saved_geometry(&self) {
        if !self.flags.get().intersects(ClientFlags::SAVES_GEOMETRY) {
            self.saved_geometry.set(None);
        }
    }

    /// The protocol states this client currently advertises, in
    /// export order.
    pub fn states(
        &self,
        selected_workspace: usize,
    ) -> Vec<WindowState> {
        let flags = self.flags.get();
        let mut states = Vec::with_capacity(4);

        if flags.contains(ClientFlags::VERT_MAX) {
            states.push(WindowState::MaximizedVert);
        }

        if flags.contains(ClientFlags::HORZ_MAX) {
            states.push(WindowState::MaximizedHorz);
        }

        if flags.contains(ClientFlags::FULLSCREEN) {
            states.push(WindowState::Fullscreen);
        }

        if !self.is_visible_on(selected_workspace) {
            states.push(WindowState::Hidden);
        }

        if flags.contains(ClientFlags::BELOW) {
            states.push(WindowState::Below);
        }

        if flags.contains(ClientFlags::ABOVE) {
            states.push(WindowState::Above);
        }

        states
    }

    #[inline]
    pub fn set_mapped(
        &self,
        toggle: Toggle,
    ) {
        self.mapped.set(toggle.eval(self.mapped.get()));
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.mapped.get()
    }

    #[inline]
    pub fn expect_unmap(&self) {
        self.expected_unmap_count
            .set(self.expected_unmap_count.get() + 1);
    }

    #[inline]
    pub fn consume_unmap_if_expecting(&self) -> bool {
        let expected_unmap_count = self.expected_unmap_count.get();
        let expecting = expected_unmap_count > 0;

        if expecting {
            self.expected_unmap_count.set(expected_unmap_count - 1);
        }

        expecting
    }
}

impl PartialEq for Client {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.window == other.window
    }
}

impl std::fmt::Debug for Client {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("window", &format_args!("{:#0x}", self.window))
            .field("class", &self.class)
            .field("workspace", &self.workspace)
            .field("geometry", &self.geometry)
            .field("saved_geometry", &self.saved_geometry)
            .field("flags", &self.flags)
            .field("focused", &self.focused)
            .finish()
    }
}
