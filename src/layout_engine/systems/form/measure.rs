use tracing::trace;

use crate::common::collections::HashMap;
use crate::layout_engine::{ControlId, FormData, Hints, Orientation, Size, Widget};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Sample {
    hints: Hints,
    size: Size,
}

/// Remembers a control's preferred size for two hint combinations: the one
/// derived from its layout data and the most recent other one (used when the
/// width is fixed by the solve pass).
#[derive(Clone, Debug, Default)]
pub(crate) struct SizeCache {
    default: Option<Sample>,
    current: Option<Sample>,
}

impl SizeCache {
    pub(crate) fn measure<W: Widget>(
        &mut self,
        widget: &W,
        data: &FormData,
        hints: Hints,
        flush_cache: bool,
    ) -> Size {
        let slot = if hints == Hints::new(data.width, data.height) {
            &mut self.default
        } else {
            &mut self.current
        };
        let size = match *slot {
            Some(sample) if sample.hints == hints && !flush_cache => sample.size,
            _ => {
                let size = widget.compute_size(hints, flush_cache);
                trace!(?hints, ?size, "measured control");
                *slot = Some(Sample { hints, size });
                size
            }
        };
        Size::new(data.width.unwrap_or(size.width), data.height.unwrap_or(size.height))
    }
}

/// Sizes of every child for one layout pass.
#[derive(Clone, Debug, Default)]
pub(crate) struct Measurements {
    sizes: HashMap<ControlId, Size>,
}

impl Measurements {
    pub(crate) fn insert(&mut self, id: ControlId, size: Size) { self.sizes.insert(id, size); }

    pub(crate) fn size(&self, id: ControlId) -> Size {
        self.sizes.get(&id).copied().unwrap_or_default()
    }

    pub(crate) fn extent(&self, id: ControlId, orientation: Orientation) -> i32 {
        let size = self.size(id);
        match orientation {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }
}
