use crate::layout_engine::{Attachment, Orientation, Side};

/// Per-control layout data: one optional attachment per side and optional
/// fixed dimensions. A side left unset is derived from the opposite side and
/// the control's size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    pub left: Option<Attachment>,
    pub right: Option<Attachment>,
    pub top: Option<Attachment>,
    pub bottom: Option<Attachment>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl FormData {
    pub fn new() -> Self { Self::default() }

    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn left(mut self, attachment: Attachment) -> Self {
        self.left = Some(attachment);
        self
    }

    pub fn right(mut self, attachment: Attachment) -> Self {
        self.right = Some(attachment);
        self
    }

    pub fn top(mut self, attachment: Attachment) -> Self {
        self.top = Some(attachment);
        self
    }

    pub fn bottom(mut self, attachment: Attachment) -> Self {
        self.bottom = Some(attachment);
        self
    }

    pub fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn attachment(&self, side: Side) -> Option<&Attachment> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
            Side::Top => self.top.as_ref(),
            Side::Bottom => self.bottom.as_ref(),
        }
    }

    pub fn set_attachment(&mut self, side: Side, attachment: Option<Attachment>) {
        let slot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
            Side::Top => &mut self.top,
            Side::Bottom => &mut self.bottom,
        };
        *slot = attachment;
    }

    pub fn fixed_extent(&self, orientation: Orientation) -> Option<i32> {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}
