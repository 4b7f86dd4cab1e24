use crate::hints::SizeHints;

use std::ops::Add;
use std::ops::Sub;

pub type Extents = Padding;

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Placement anchors within a containing region, used to teleport
/// a window without altering its dimensions.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum Anchor {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Default for Pos {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
        }
    }
}

impl Pos {
    pub fn values(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn dist(
        &self,
        pos: Self,
    ) -> Distance {
        Distance {
            dx: (pos.x - self.x),
            dy: (pos.y - self.y),
        }
    }
}

impl Add<Pos> for Pos {
    type Output = Self;

    fn add(
        self,
        other: Pos,
    ) -> Self::Output {
        Self::Output {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub struct Dim {
    pub w: i32,
    pub h: i32,
}

impl Default for Dim {
    fn default() -> Self {
        Self {
            w: 0,
            h: 0,
        }
    }
}

impl Dim {
    pub fn values(&self) -> (i32, i32) {
        (self.w, self.h)
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub struct Region {
    pub pos: Pos,
    pub dim: Dim,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            pos: Default::default(),
            dim: Default::default(),
        }
    }
}

impl Region {
    pub fn new(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Self {
        Self {
            pos: Pos {
                x,
                y,
            },
            dim: Dim {
                w,
                h,
            },
        }
    }

    pub fn values(&self) -> (Pos, Dim) {
        (self.pos, self.dim)
    }

    pub fn with_size_hints(
        self,
        size_hints: &Option<SizeHints>,
    ) -> Self {
        let mut geometry = self;

        if let Some(size_hints) = size_hints {
            size_hints.apply(&mut geometry.dim);
        }

        geometry
    }

    /// Repositions without resizing, pinning this region to the given
    /// anchor of the containing region.
    pub fn anchored_within(
        self,
        container: Region,
        anchor: Anchor,
    ) -> Self {
        let (pos, dim) = container.values();

        Self {
            pos: match anchor {
                Anchor::Center => Pos {
                    x: pos.x + (dim.w - self.dim.w) / 2,
                    y: pos.y + (dim.h - self.dim.h) / 2,
                },
                Anchor::TopLeft => pos,
                Anchor::TopRight => Pos {
                    x: pos.x + dim.w - self.dim.w,
                    y: pos.y,
                },
                Anchor::BottomLeft => Pos {
                    x: pos.x,
                    y: pos.y + dim.h - self.dim.h,
                },
                Anchor::BottomRight => Pos {
                    x: pos.x + dim.w - self.dim.w,
                    y: pos.y + dim.h - self.dim.h,
                },
            },
            dim: self.dim,
        }
    }

    pub fn encompasses(
        &self,
        pos: Pos,
    ) -> bool {
        pos.x >= self.pos.x
            && pos.y >= self.pos.y
            && pos.x <= self.pos.x + self.dim.w
            && pos.y <= self.pos.y + self.dim.h
    }

    pub fn bottom_right(&self) -> Pos {
        Pos {
            x: self.pos.x + self.dim.w,
            y: self.pos.y + self.dim.h,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Padding {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 0,
            right: 0,
            top: 0,
            bottom: 0,
        }
    }
}

impl Padding {
    pub fn with_each_edge(size: i32) -> Self {
        Self {
            left: size,
            right: size,
            top: size,
            bottom: size,
        }
    }
}

impl Sub<Padding> for Region {
    type Output = Self;

    fn sub(
        self,
        padding: Padding,
    ) -> Self::Output {
        Self::Output {
            pos: Pos {
                x: self.pos.x + padding.left,
                y: self.pos.y + padding.top,
            },
            dim: Dim {
                w: self.dim.w - padding.left - padding.right,
                h: self.dim.h - padding.top - padding.bottom,
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub struct Distance {
    pub dx: i32,
    pub dy: i32,
}

impl Distance {
    pub fn values(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }
}

impl Add<Distance> for Pos {
    type Output = Self;

    fn add(
        self,
        dist: Distance,
    ) -> Self::Output {
        Self::Output {
            x: self.x + dist.dx,
            y: self.y + dist.dy,
        }
    }
}
