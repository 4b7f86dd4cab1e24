use crate::geometry::Dim;

/// Size constraints sourced from a window's WM_NORMAL_HINTS.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SizeHints {
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_width: Option<i32>,
    pub max_height: Option<i32>,
    pub base_width: Option<i32>,
    pub base_height: Option<i32>,
    pub inc_width: Option<i32>,
    pub inc_height: Option<i32>,
}

impl SizeHints {
    pub fn new(
        min_width: Option<i32>,
        min_height: Option<i32>,
        max_width: Option<i32>,
        max_height: Option<i32>,
        base_width: Option<i32>,
        base_height: Option<i32>,
        inc_width: Option<i32>,
        inc_height: Option<i32>,
    ) -> Self {
        Self {
            min_width,
            min_height,
            max_width,
            max_height,
            base_width,
            base_height,
            inc_width,
            inc_height,
        }
    }

    #[inline]
    pub fn min_dim(&self) -> Dim {
        Dim {
            w: self.min_width.unwrap_or(1),
            h: self.min_height.unwrap_or(1),
        }
    }

    #[inline]
    pub fn max_dim(&self) -> Option<Dim> {
        match (self.max_width, self.max_height) {
            (Some(w), Some(h)) => Some(Dim {
                w,
                h,
            }),
            _ => None,
        }
    }

    /// Clamps to min/max and snaps to resize increments, leaving the
    /// base dimensions intact.
    pub fn apply(
        &self,
        dim: &mut Dim,
    ) {
        let mut dest_width = dim.w;
        let mut dest_height = dim.h;

        if let Some(min_width) = self.min_width {
            dest_width = std::cmp::max(dest_width, min_width);
        }

        if let Some(min_height) = self.min_height {
            dest_height = std::cmp::max(dest_height, min_height);
        }

        if let Some(max_width) = self.max_width {
            dest_width = std::cmp::min(dest_width, max_width);
        }

        if let Some(max_height) = self.max_height {
            dest_height = std::cmp::min(dest_height, max_height);
        }

        let base_width = self.base_width.unwrap_or(0);
        let base_height = self.base_height.unwrap_or(0);

        if let Some(inc_width) = self.inc_width {
            if inc_width > 0 && dest_width >= base_width {
                dest_width -= base_width;
                dest_width -= dest_width % inc_width;
                dest_width += base_width;
            }
        }

        if let Some(inc_height) = self.inc_height {
            if inc_height > 0 && dest_height >= base_height {
                dest_height -= base_height;
                dest_height -= dest_height % inc_height;
                dest_height += base_height;
            }
        }

        dim.w = std::cmp::max(dest_width, 1i32);
        dim.h = std::cmp::max(dest_height, 1i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applying_min_and_max_bounds() {
        let size_hints = SizeHints::new(
            Some(100),
            Some(50),
            Some(400),
            Some(300),
            None,
            None,
            None,
            None,
        );

        let mut dim = Dim {
            w: 20,
            h: 20,
        };
        size_hints.apply(&mut dim);
        assert_eq!(dim, Dim {
            w: 100,
            h: 50,
        });

        let mut dim = Dim {
            w: 1000,
            h: 1000,
        };
        size_hints.apply(&mut dim);
        assert_eq!(dim, Dim {
            w: 400,
            h: 300,
        });
    }

    #[test]
    fn snapping_to_increments() {
        let size_hints =
            SizeHints::new(None, None, None, None, Some(4), Some(8), Some(10), Some(20));

        let mut dim = Dim {
            w: 127,
            h: 133,
        };
        size_hints.apply(&mut dim);

        assert_eq!(dim, Dim {
            w: 124,
            h: 128,
        });
    }
}
