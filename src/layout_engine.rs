pub mod attachment;
pub mod composite;
pub mod error;
mod form_data;
mod geometry;
pub(crate) mod graph;
pub mod systems;

pub use attachment::{Anchor, Attachment, DEFAULT_DENOMINATOR};
pub use composite::{Child, Children, Composite, ControlId, Hints, Widget};
pub use error::LayoutError;
pub use form_data::FormData;
pub use geometry::{Insets, Point, Rect, Size};
pub use graph::{Alignment, Orientation, Side};
pub use systems::{FormLayout, Layout};
