use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self { Self { width, height } }
}

/// Parent-relative rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn from_size(size: Size) -> Self { Self::new(0, 0, size.width, size.height) }

    pub const fn origin(&self) -> Point { Point::new(self.x, self.y) }

    pub const fn size(&self) -> Size { Size::new(self.width, self.height) }

    /// Shrinks the rectangle by the given insets, clamping the extent at zero.
    /// `None` when a coordinate leaves the `i32` range.
    pub fn inset(&self, insets: Insets) -> Option<Rect> {
        if insets == Insets::default() {
            return Some(*self);
        }
        let width = self.width.checked_sub(insets.horizontal()?)?;
        let height = self.height.checked_sub(insets.vertical()?)?;
        Some(Rect {
            x: self.x.checked_add(insets.left)?,
            y: self.y.checked_add(insets.top)?,
            width: width.max(0),
            height: height.max(0),
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    pub fn horizontal(&self) -> Option<i32> { self.left.checked_add(self.right) }

    pub fn vertical(&self) -> Option<i32> { self.top.checked_add(self.bottom) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_clamps_to_zero() {
        let rect = Rect::new(10, 10, 20, 20);
        let insets = Insets { top: 5, left: 15, bottom: 30, right: 15 };
        assert_eq!(rect.inset(insets), Some(Rect::new(25, 15, 0, 0)));
    }

    #[test]
    fn empty_insets_keep_rect() {
        let rect = Rect::new(3, 4, 50, 60);
        assert_eq!(rect.inset(Insets::default()), Some(rect));
    }

    #[test]
    fn inset_out_of_range_is_none() {
        let rect = Rect::new(i32::MAX - 1, 0, 10, 10);
        assert_eq!(rect.inset(Insets { left: 5, ..Insets::default() }), None);
        let wide = Insets { left: i32::MAX, right: 1, ..Insets::default() };
        assert_eq!(wide.horizontal(), None);
        assert_eq!(Rect::new(0, 0, 10, 10).inset(wide), None);
    }
}
