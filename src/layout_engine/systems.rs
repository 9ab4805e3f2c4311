use crate::layout_engine::error::Result;
use crate::layout_engine::{Children, ControlId, Hints, Rect, Size, Widget};

/// A layout manager positions the children of one container.
pub trait Layout<W: Widget> {
    /// Size the container needs for its children. A present hint fixes that
    /// axis and is returned unchanged.
    fn compute_size(&mut self, children: &Children<W>, hints: Hints, flush_cache: bool) -> Result<Size>;

    /// Solves every child's bounds inside `client_area` and assigns them.
    fn layout(&mut self, children: &mut Children<W>, client_area: Rect, flush_cache: bool) -> Result<()>;

    /// Forgets anything cached for `control`. Returns whether there was
    /// anything to forget.
    fn flush_cache(&mut self, control: ControlId) -> bool;
}

mod form;
pub use form::FormLayout;
