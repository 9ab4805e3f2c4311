use tracing::{debug, instrument};

use super::Layout;
use crate::common::collections::HashMap;
use crate::common::config::FormLayoutSettings;
use crate::layout_engine::error::{LayoutError, Result};
use crate::layout_engine::{
    Children, ControlId, Hints, Orientation, Point, Rect, Side, Size, Widget,
};

mod measure;
mod resolve;

use measure::{Measurements, SizeCache};
use resolve::Resolver;

/// Positions each child by solving its side attachments against the
/// container's content area.
#[derive(Clone, Debug, Default)]
pub struct FormLayout {
    settings: FormLayoutSettings,
    caches: HashMap<ControlId, SizeCache>,
}

struct Solution {
    bounds: Vec<(ControlId, Rect)>,
    extent: Size,
}

impl FormLayout {
    pub fn new(settings: FormLayoutSettings) -> Self {
        Self { settings, caches: HashMap::default() }
    }

    pub fn settings(&self) -> &FormLayoutSettings { &self.settings }

    pub fn settings_mut(&mut self) -> &mut FormLayoutSettings { &mut self.settings }

    fn measure<W: Widget>(&mut self, children: &Children<W>, flush_cache: bool) -> Measurements {
        let mut sizes = Measurements::default();
        for (id, child) in children.iter() {
            let hints = Hints::new(child.data.width, child.data.height);
            let cache = self.caches.entry(id).or_default();
            sizes.insert(id, cache.measure(&child.widget, &child.data, hints, flush_cache));
        }
        sizes
    }

    /// Evaluates every child's attachments. Axes with a known content extent
    /// produce positions; unknown axes produce the extent children need.
    /// Bounds are only produced when both axes are known.
    #[instrument(level = "debug", skip_all, fields(?extent))]
    fn solve<W: Widget>(
        &mut self,
        children: &Children<W>,
        sizes: Measurements,
        extent: Hints,
        origin: Point,
        flush_cache: bool,
    ) -> Result<Solution> {
        let settings = self.settings;
        let mut resolver = Resolver::new(children, sizes, settings.spacing, settings.cycle_policy);
        let mut spans = Vec::with_capacity(children.len());
        let mut needed = Size::default();

        for (id, child) in children.iter() {
            let Some(width) = extent.width else {
                let preferred = resolver.preferred_extent(id, Orientation::Horizontal)?;
                needed.width = needed.width.max(preferred);
                continue;
            };
            resolver.begin_control();
            let x1 = resolver.resolve(id, Side::Left)?.solve_position(width)?;
            let x2 = resolver.resolve(id, Side::Right)?.solve_position(width)?;
            if child.data.fixed_extent(Orientation::Vertical).is_none() && !resolver.consulted(id) {
                let trim = child.widget.border_width().checked_mul(2);
                let inner = x2.checked_sub(x1).zip(trim).and_then(|(w, t)| w.checked_sub(t));
                let hints = Hints::new(Some(inner.ok_or(LayoutError::Overflow)?.max(0)), None);
                let cache = self.caches.entry(id).or_default();
                resolver.reflow(id, cache.measure(&child.widget, &child.data, hints, flush_cache));
            }
            needed.width = needed.width.max(x2);
            spans.push((x1, x2));
        }

        let mut bounds = Vec::with_capacity(spans.len());
        for (index, &id) in children.ids().iter().enumerate() {
            let Some(height) = extent.height else {
                let preferred = resolver.preferred_extent(id, Orientation::Vertical)?;
                needed.height = needed.height.max(preferred);
                continue;
            };
            let y1 = resolver.resolve(id, Side::Top)?.solve_position(height)?;
            let y2 = resolver.resolve(id, Side::Bottom)?.solve_position(height)?;
            needed.height = needed.height.max(y2);
            if let Some(&(x1, x2)) = spans.get(index) {
                bounds.push((id, place(origin, (x1, x2), (y1, y2)).ok_or(LayoutError::Overflow)?));
            }
        }

        Ok(Solution { bounds, extent: needed })
    }
}

/// Absolute bounds from solved edge positions, `None` on overflow.
fn place(origin: Point, (x1, x2): (i32, i32), (y1, y2): (i32, i32)) -> Option<Rect> {
    Some(Rect::new(
        origin.x.checked_add(x1)?,
        origin.y.checked_add(y1)?,
        x2.checked_sub(x1)?,
        y2.checked_sub(y1)?,
    ))
}

fn content_hint(hint: Option<i32>, margins: i32) -> Result<Option<i32>> {
    hint.map(|h| h.checked_sub(margins).map(|c| c.max(0)).ok_or(LayoutError::Overflow)).transpose()
}

fn outer_extent(hint: Option<i32>, extent: i32, margins: i32) -> Result<i32> {
    match hint {
        Some(h) => Ok(h),
        None => extent.checked_add(margins).ok_or(LayoutError::Overflow),
    }
}

impl<W: Widget> Layout<W> for FormLayout {
    fn compute_size(&mut self, children: &Children<W>, hints: Hints, flush_cache: bool) -> Result<Size> {
        let insets = self.settings.insets().ok_or(LayoutError::Overflow)?;
        let horizontal = insets.horizontal().ok_or(LayoutError::Overflow)?;
        let vertical = insets.vertical().ok_or(LayoutError::Overflow)?;
        let content = Hints::new(
            content_hint(hints.width, horizontal)?,
            content_hint(hints.height, vertical)?,
        );
        let sizes = self.measure(children, flush_cache);
        let solution = self.solve(children, sizes, content, Point::default(), flush_cache)?;
        let size = Size::new(
            outer_extent(hints.width, solution.extent.width, horizontal)?,
            outer_extent(hints.height, solution.extent.height, vertical)?,
        );
        debug!(?hints, ?size, "computed preferred size");
        Ok(size)
    }

    fn layout(&mut self, children: &mut Children<W>, client_area: Rect, flush_cache: bool) -> Result<()> {
        let content = self
            .settings
            .insets()
            .and_then(|insets| client_area.inset(insets))
            .ok_or(LayoutError::Overflow)?;
        let sizes = self.measure(children, flush_cache);
        let extent = Hints::new(Some(content.width), Some(content.height));
        let solution = self.solve(children, sizes, extent, content.origin(), flush_cache)?;
        for (id, bounds) in solution.bounds {
            if let Some(child) = children.get_mut(id) {
                child.widget.set_bounds(bounds);
            }
        }
        Ok(())
    }

    fn flush_cache(&mut self, control: ControlId) -> bool { self.caches.remove(&control).is_some() }
}
