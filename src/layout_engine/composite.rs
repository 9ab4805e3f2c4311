use slotmap::SlotMap;
use tracing::debug;

use crate::layout_engine::error::{LayoutError, Result};
use crate::layout_engine::{FormData, FormLayout, Layout, Rect, Size};

slotmap::new_key_type! { pub struct ControlId; }

/// Optional width and height constraints for a size query. `None` means
/// unconstrained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hints {
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl Hints {
    pub const UNCONSTRAINED: Hints = Hints { width: None, height: None };

    pub const fn new(width: Option<i32>, height: Option<i32>) -> Self { Self { width, height } }
}

/// The part of a widget the layout engine talks to.
pub trait Widget {
    /// Preferred size under the given hints. Widgets should honor a hint that
    /// is present.
    fn compute_size(&self, hints: Hints, flush_cache: bool) -> Size;

    /// Width of the border drawn around the widget's content.
    fn border_width(&self) -> i32 { 0 }

    fn set_bounds(&mut self, bounds: Rect);
}

#[derive(Debug)]
pub struct Child<W> {
    pub widget: W,
    pub data: FormData,
}

/// Children of a container in insertion order.
#[derive(Debug)]
pub struct Children<W> {
    map: SlotMap<ControlId, Child<W>>,
    order: Vec<ControlId>,
}

impl<W> Default for Children<W> {
    fn default() -> Self {
        Self {
            map: SlotMap::with_key(),
            order: Vec::new(),
        }
    }
}

impl<W> Children<W> {
    pub fn insert(&mut self, widget: W, data: FormData) -> ControlId {
        let id = self.map.insert(Child { widget, data });
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: ControlId) -> Option<Child<W>> {
        let child = self.map.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(child)
    }

    pub fn get(&self, id: ControlId) -> Option<&Child<W>> { self.map.get(id) }

    pub fn get_mut(&mut self, id: ControlId) -> Option<&mut Child<W>> { self.map.get_mut(id) }

    pub fn data(&self, id: ControlId) -> Option<&FormData> { self.map.get(id).map(|c| &c.data) }

    pub fn contains(&self, id: ControlId) -> bool { self.map.contains_key(id) }

    pub fn ids(&self) -> &[ControlId] { &self.order }

    pub fn iter(&self) -> impl Iterator<Item = (ControlId, &Child<W>)> {
        self.order.iter().map(|&id| (id, &self.map[id]))
    }

    pub fn len(&self) -> usize { self.order.len() }

    pub fn is_empty(&self) -> bool { self.order.is_empty() }
}

/// A container laying out its children inside a client area.
pub struct Composite<W, L = FormLayout> {
    children: Children<W>,
    layout: L,
    client_area: Rect,
}

impl<W: Widget> Composite<W, FormLayout> {
    pub fn new(client_area: Rect) -> Self { Self::with_layout(FormLayout::default(), client_area) }
}

impl<W: Widget, L: Layout<W>> Composite<W, L> {
    pub fn with_layout(layout: L, client_area: Rect) -> Self {
        Self {
            children: Children::default(),
            layout,
            client_area,
        }
    }

    pub fn add(&mut self, widget: W, data: FormData) -> ControlId {
        self.children.insert(widget, data)
    }

    /// Removes a child. Attachments of other children that still name it are
    /// treated as plain fractions from now on.
    pub fn remove(&mut self, id: ControlId) -> Option<W> {
        let child = self.children.remove(id)?;
        self.layout.flush_cache(id);
        debug!(?id, "removed control");
        Some(child.widget)
    }

    pub fn set_layout_data(&mut self, id: ControlId, data: FormData) -> Result<()> {
        let child = self.children.get_mut(id).ok_or(LayoutError::UnknownControl(id))?;
        child.data = data;
        Ok(())
    }

    pub fn layout_data(&self, id: ControlId) -> Option<&FormData> { self.children.data(id) }

    pub fn widget(&self, id: ControlId) -> Option<&W> { self.children.get(id).map(|c| &c.widget) }

    pub fn widget_mut(&mut self, id: ControlId) -> Option<&mut W> {
        self.children.get_mut(id).map(|c| &mut c.widget)
    }

    pub fn children(&self) -> &Children<W> { &self.children }

    pub fn layout_manager(&self) -> &L { &self.layout }

    pub fn layout_manager_mut(&mut self) -> &mut L { &mut self.layout }

    pub fn client_area(&self) -> Rect { self.client_area }

    pub fn set_client_area(&mut self, client_area: Rect) { self.client_area = client_area; }

    pub fn layout(&mut self, flush_cache: bool) -> Result<()> {
        self.layout.layout(&mut self.children, self.client_area, flush_cache)
    }

    pub fn compute_size(
        &mut self,
        width_hint: Option<i32>,
        height_hint: Option<i32>,
        flush_cache: bool,
    ) -> Result<Size> {
        let hints = Hints::new(width_hint, height_hint);
        self.layout.compute_size(&self.children, hints, flush_cache)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Widget with a fixed natural size that honors hints.
    #[derive(Debug, Default, Clone)]
    pub struct Block {
        pub natural: Size,
        pub bounds: Rect,
    }

    impl Block {
        pub fn new(width: i32, height: i32) -> Self {
            Self { natural: Size::new(width, height), bounds: Rect::default() }
        }
    }

    impl Widget for Block {
        fn compute_size(&self, hints: Hints, _flush_cache: bool) -> Size {
            Size::new(
                hints.width.unwrap_or(self.natural.width),
                hints.height.unwrap_or(self.natural.height),
            )
        }

        fn set_bounds(&mut self, bounds: Rect) { self.bounds = bounds; }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::testing::Block;
    use super::*;
    use crate::layout_engine::Attachment;

    #[test]
    fn children_keep_insertion_order_across_removal() {
        let mut children = Children::default();
        let a = children.insert(Block::new(1, 1), FormData::new());
        let b = children.insert(Block::new(2, 2), FormData::new());
        let c = children.insert(Block::new(3, 3), FormData::new());
        assert!(children.remove(b).is_some());
        assert!(children.remove(b).is_none());
        assert_eq!(children.ids(), &[a, c]);
        assert!(!children.contains(b));
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn set_layout_data_rejects_foreign_controls() {
        let mut composite = Composite::new(Rect::new(0, 0, 100, 100));
        let id = composite.add(Block::new(10, 10), FormData::new());
        composite.remove(id);
        let data = FormData::new().left(Attachment::percent(50, 0));
        assert_eq!(composite.set_layout_data(id, data), Err(LayoutError::UnknownControl(id)));
    }

    #[test]
    fn layout_assigns_bounds_to_widgets() {
        let mut composite = Composite::new(Rect::new(0, 0, 300, 200));
        let id = composite.add(
            Block::new(10, 10),
            FormData::new().right(Attachment::percent(100, -5)).width(40),
        );
        composite.layout(false).unwrap();
        assert_eq!(composite.widget(id).unwrap().bounds, Rect::new(255, 0, 40, 10));
    }
}
