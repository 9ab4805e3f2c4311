use tracing::{debug, trace, warn};

use super::measure::Measurements;
use crate::common::collections::{HashMap, HashSet};
use crate::common::config::CyclePolicy;
use crate::layout_engine::error::{LayoutError, Result};
use crate::layout_engine::{
    Alignment, Anchor, Attachment, Children, ControlId, Orientation, Side, Size,
};

/// Controls whose attachments are being resolved further up the stack.
pub(crate) type Visiting = HashSet<ControlId>;

/// Turns pegged attachments into plain equations for one layout pass.
///
/// Results are memoized per `(control, side)` for the lifetime of the
/// resolver, so a pass creates a fresh one.
pub(crate) struct Resolver<'a, W> {
    children: &'a Children<W>,
    sizes: Measurements,
    spacing: i32,
    cycle_policy: CyclePolicy,
    memo: HashMap<(ControlId, Side), Attachment>,
    consulted: HashSet<ControlId>,
}

impl<'a, W> Resolver<'a, W> {
    pub(crate) fn new(
        children: &'a Children<W>,
        sizes: Measurements,
        spacing: i32,
        cycle_policy: CyclePolicy,
    ) -> Self {
        Self {
            children,
            sizes,
            spacing,
            cycle_policy,
            memo: HashMap::default(),
            consulted: HashSet::default(),
        }
    }

    pub(crate) fn resolve(&mut self, id: ControlId, side: Side) -> Result<Attachment> {
        let mut visiting = Visiting::default();
        self.resolve_in(id, side, &mut visiting)
    }

    /// Starts tracking which sizes the next resolutions read.
    pub(crate) fn begin_control(&mut self) { self.consulted.clear(); }

    /// Whether `id`'s own size fed into a resolution since `begin_control`.
    pub(crate) fn consulted(&self, id: ControlId) -> bool { self.consulted.contains(&id) }

    /// Replaces a measured size after the control was re-measured at its
    /// solved width.
    pub(crate) fn reflow(&mut self, id: ControlId, size: Size) {
        trace!(?id, ?size, "reflowed control");
        self.sizes.insert(id, size);
    }

    /// Extent a control needs along `orientation` for its attachments to be
    /// satisfied, used when the container's extent is not known.
    pub(crate) fn preferred_extent(&mut self, id: ControlId, orientation: Orientation) -> Result<i32> {
        let leading = self.resolve(id, Side::leading(orientation))?;
        let trailing = self.resolve(id, Side::trailing(orientation))?;
        let span = trailing.minus(leading)?;
        if span.numerator() != 0 {
            let extent = self.extent(id, orientation);
            return span.solve_size(extent);
        }
        // Both edges move at the same rate, so the container extent only
        // has to keep the control inside it.
        if trailing.numerator() == 0 {
            return Ok(trailing.offset());
        }
        if trailing.numerator() == trailing.denominator() {
            return narrow(-i64::from(leading.offset()));
        }
        if trailing.offset() <= 0 {
            let scaled = -i64::from(leading.offset()) * i64::from(leading.denominator());
            return narrow(scaled / i64::from(leading.numerator()));
        }
        let divider = i64::from(trailing.denominator()) - i64::from(trailing.numerator());
        narrow(i64::from(trailing.denominator()) * i64::from(trailing.offset()) / divider)
    }

    fn extent(&mut self, id: ControlId, orientation: Orientation) -> i32 {
        self.consulted.insert(id);
        self.sizes.extent(id, orientation)
    }

    /// Where a side lands when nothing constrains it: leading sides at the
    /// origin, trailing sides one control-size past it.
    fn origin(&mut self, id: ControlId, side: Side) -> Attachment {
        if side.is_leading() {
            Attachment::percent(0, 0)
        } else {
            Attachment::percent(0, self.extent(id, side.orientation()))
        }
    }

    fn resolve_in(&mut self, id: ControlId, side: Side, visiting: &mut Visiting) -> Result<Attachment> {
        if let Some(&resolved) = self.memo.get(&(id, side)) {
            return Ok(resolved);
        }
        let resolved = self.compute(id, side, visiting)?;
        trace!(?id, %side, ?resolved, "resolved attachment");
        self.memo.insert((id, side), resolved);
        Ok(resolved)
    }

    fn compute(&mut self, id: ControlId, side: Side, visiting: &mut Visiting) -> Result<Attachment> {
        if visiting.contains(&id) {
            return match self.cycle_policy {
                CyclePolicy::Tolerate => {
                    warn!(?id, %side, "cyclic attachment, anchoring side at the origin");
                    Ok(self.origin(id, side))
                }
                CyclePolicy::Reject => Err(LayoutError::Cycle { control: id, side }),
            };
        }
        let children = self.children;
        let data = children.data(id).ok_or(LayoutError::UnknownControl(id))?;
        let Some(attachment) = data.attachment(side).copied() else {
            if data.attachment(side.opposite()).is_none() {
                return Ok(self.origin(id, side));
            }
            let opposite = self.resolve_in(id, side.opposite(), visiting)?;
            let extent = self.extent(id, side.orientation());
            return if side.is_leading() {
                opposite.minus_px(extent)
            } else {
                opposite.plus_px(extent)
            };
        };
        let Some(anchor) = attachment.anchor() else {
            return Ok(attachment);
        };
        if !children.contains(anchor.control) {
            debug!(?id, %side, target = ?anchor.control, "attachment target is gone");
            return Ok(attachment.detached());
        }

        visiting.insert(id);
        let pegged = self.peg(id, side, attachment.offset(), anchor, visiting);
        visiting.remove(&id);
        pegged
    }

    fn peg(
        &mut self,
        id: ControlId,
        side: Side,
        offset: i32,
        anchor: Anchor,
        visiting: &mut Visiting,
    ) -> Result<Attachment> {
        let same = self.resolve_in(anchor.control, side, visiting)?;
        if anchor.alignment.is_edge(side) {
            return same.plus_px(offset);
        }
        let other = self.resolve_in(anchor.control, side.opposite(), visiting)?;
        if anchor.alignment == Alignment::Center {
            let (leading, trailing) = if side.is_leading() { (same, other) } else { (other, same) };
            let extent = self.extent(id, side.orientation());
            let slack = trailing.minus(leading)?.minus_px(extent)?.divide(2)?;
            return if side.is_leading() { leading.plus(slack) } else { trailing.minus(slack) };
        }
        let gap = if side.is_leading() {
            offset.checked_add(self.spacing)
        } else {
            offset.checked_sub(self.spacing)
        };
        other.plus_px(gap.ok_or(LayoutError::Overflow)?)
    }
}

fn narrow(value: i64) -> Result<i32> { i32::try_from(value).map_err(|_| LayoutError::Overflow) }
