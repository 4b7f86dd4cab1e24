pub type Window = u32;

/// Externally visible EWMH window states handled by the manager.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum WindowState {
    MaximizedVert,
    MaximizedHorz,
    Fullscreen,
    Hidden,
    Below,
    Above,
}
