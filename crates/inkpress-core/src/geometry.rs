#![forbid(unsafe_code)]

//! Geometric primitives in device pixels.

/// An axis-aligned rectangle. Origin at the top-left of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrink by `margin` on every side, saturating at zero size.
    pub fn inner(&self, margin: Sides) -> Rect {
        let x = self.x.saturating_add(margin.left);
        let y = self.y.saturating_add(margin.top);
        let width = self.width.saturating_sub(margin.horizontal_sum());
        let height = self.height.saturating_sub(margin.vertical_sum());
        Rect::new(x, y, width, height)
    }

    /// Split off `height` pixels from the top. Returns `(top, rest)`.
    pub fn split_top(&self, height: u32) -> (Rect, Rect) {
        let height = height.min(self.height);
        (
            Rect::new(self.x, self.y, self.width, height),
            Rect::new(self.x, self.y + height, self.width, self.height - height),
        )
    }

    /// Split off `width` pixels from the left. Returns `(left, rest)`.
    pub fn split_left(&self, width: u32) -> (Rect, Rect) {
        let width = width.min(self.width);
        (
            Rect::new(self.x, self.y, width, self.height),
            Rect::new(self.x + width, self.y, self.width - width, self.height),
        )
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Per-side lengths for margins and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sides {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Sides {
    /// Equal value on every side.
    pub const fn all(val: u32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// `vertical` for top/bottom, `horizontal` for left/right.
    pub const fn symmetric(vertical: u32, horizontal: u32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

impl From<u32> for Sides {
    fn from(val: u32) -> Self {
        Self::all(val)
    }
}

impl From<(u32, u32, u32, u32)> for Sides {
    fn from((top, right, bottom, left): (u32, u32, u32, u32)) -> Self {
        Self::new(top, right, bottom, left)
    }
}

#[cfg(test)]
mod tests {
    use super::{Rect, Sides, Size};

    #[test]
    fn rect_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert!(!r.is_empty());
        assert!(Rect::new(0, 0, 0, 5).is_empty());
    }

    #[test]
    fn rect_inner_applies_margins() {
        let page = Rect::from_size(Size::new(100, 200));
        let inner = page.inner(Sides::new(10, 5, 20, 15));
        assert_eq!(inner, Rect::new(15, 10, 80, 170));
    }

    #[test]
    fn rect_inner_saturates() {
        let r = Rect::new(0, 0, 10, 10);
        let inner = r.inner(Sides::all(8));
        assert_eq!(inner.width, 0);
        assert_eq!(inner.height, 0);
    }

    #[test]
    fn split_top_and_left() {
        let r = Rect::new(5, 5, 100, 50);
        let (top, rest) = r.split_top(20);
        assert_eq!(top, Rect::new(5, 5, 100, 20));
        assert_eq!(rest, Rect::new(5, 25, 100, 30));

        let (left, rest) = r.split_left(120);
        assert_eq!(left, r);
        assert!(rest.is_empty());
    }

    #[test]
    fn contains_rect_edges() {
        let outer = Rect::new(0, 0, 10, 10);
        assert!(outer.contains_rect(&Rect::new(0, 0, 10, 10)));
        assert!(outer.contains_rect(&Rect::new(2, 2, 3, 3)));
        assert!(!outer.contains_rect(&Rect::new(8, 8, 3, 1)));
    }

    #[test]
    fn sides_sums_and_conversions() {
        let s = Sides::symmetric(4, 6);
        assert_eq!(s.horizontal_sum(), 12);
        assert_eq!(s.vertical_sum(), 8);
        assert_eq!(Sides::from(3), Sides::all(3));
        assert_eq!(Sides::from((1, 2, 3, 4)), Sides::new(1, 2, 3, 4));
    }
}
