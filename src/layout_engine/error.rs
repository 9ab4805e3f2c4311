use thiserror::Error;

use crate::layout_engine::{ControlId, Side};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Attachment denominator cannot be zero")]
    ZeroDenominator,
    #[error("Cannot solve for a size through an attachment with a zero numerator")]
    ZeroNumerator,
    #[error("Attachment cannot be divided by zero")]
    DivideByZero,
    #[error("Attachment arithmetic overflowed")]
    Overflow,
    #[error("Cyclic attachment reached the {side} side of {control:?}")]
    Cycle { control: ControlId, side: Side },
    #[error("Control {0:?} does not belong to this container")]
    UnknownControl(ControlId),
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
