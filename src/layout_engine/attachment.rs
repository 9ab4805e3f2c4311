//! Side attachments: the linear equation `y = (numerator / denominator) * x + offset`
//! that positions one edge of a control inside its container.

use crate::layout_engine::error::{LayoutError, Result};
use crate::layout_engine::{Alignment, ControlId};

/// Denominator used when only a numerator is given, i.e. percentages.
pub const DEFAULT_DENOMINATOR: i32 = 100;

/// Peg of an attachment to a side of a sibling control.
///
/// The control is a handle into the owning container, looked up on every
/// resolution. It does not keep the sibling alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub control: ControlId,
    pub alignment: Alignment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Attachment {
    numerator: i32,
    denominator: i32,
    offset: i32,
    anchor: Option<Anchor>,
}

impl Default for Attachment {
    fn default() -> Self { Self::percent(0, 0) }
}

impl Attachment {
    pub fn new(numerator: i32, denominator: i32, offset: i32) -> Result<Self> {
        if denominator == 0 {
            return Err(LayoutError::ZeroDenominator);
        }
        Ok(Self { numerator, denominator, offset, anchor: None })
    }

    pub const fn percent(numerator: i32, offset: i32) -> Self {
        Self {
            numerator,
            denominator: DEFAULT_DENOMINATOR,
            offset,
            anchor: None,
        }
    }

    pub const fn to_control(control: ControlId, offset: i32, alignment: Alignment) -> Self {
        Self {
            numerator: 0,
            denominator: DEFAULT_DENOMINATOR,
            offset,
            anchor: Some(Anchor { control, alignment }),
        }
    }

    pub const fn control(control: ControlId) -> Self {
        Self::to_control(control, 0, Alignment::Default)
    }

    pub fn numerator(&self) -> i32 { self.numerator }

    pub fn denominator(&self) -> i32 { self.denominator }

    pub fn offset(&self) -> i32 { self.offset }

    pub fn anchor(&self) -> Option<Anchor> { self.anchor }

    /// The same equation without its peg to a sibling.
    pub fn detached(self) -> Self { Self { anchor: None, ..self } }

    pub fn plus(self, other: Attachment) -> Result<Self> { self.combine(other, 1) }

    pub fn minus(self, other: Attachment) -> Result<Self> { self.combine(other, -1) }

    pub fn plus_px(self, pixels: i32) -> Result<Self> {
        let offset = self.offset.checked_add(pixels).ok_or(LayoutError::Overflow)?;
        Ok(Self { offset, anchor: None, ..self })
    }

    pub fn minus_px(self, pixels: i32) -> Result<Self> {
        let offset = self.offset.checked_sub(pixels).ok_or(LayoutError::Overflow)?;
        Ok(Self { offset, anchor: None, ..self })
    }

    /// Scales the whole equation by `1 / value`. The offset is truncated.
    pub fn divide(self, value: i32) -> Result<Self> {
        if value == 0 {
            return Err(LayoutError::DivideByZero);
        }
        let denominator = i64::from(self.denominator) * i64::from(value);
        reduced(
            i64::from(self.numerator),
            denominator,
            i64::from(self.offset) / i64::from(value),
        )
    }

    /// Evaluates the equation for an axis `extent`, giving a pixel position.
    pub fn solve_position(&self, extent: i32) -> Result<i32> {
        if self.denominator == 0 {
            return Err(LayoutError::ZeroDenominator);
        }
        let scaled = i64::from(self.numerator) * i64::from(extent) / i64::from(self.denominator);
        narrow(scaled + i64::from(self.offset))
    }

    /// Inverse evaluation: the extent at which this equation yields `size`.
    pub fn solve_size(&self, size: i32) -> Result<i32> {
        if self.numerator == 0 {
            return Err(LayoutError::ZeroNumerator);
        }
        let span = i64::from(size) - i64::from(self.offset);
        let scaled = span.checked_mul(i64::from(self.denominator)).ok_or(LayoutError::Overflow)?;
        narrow(scaled / i64::from(self.numerator))
    }

    fn combine(self, other: Attachment, sign: i64) -> Result<Self> {
        let lhs = i64::from(self.numerator) * i64::from(other.denominator);
        let rhs = i64::from(self.denominator) * i64::from(other.numerator) * sign;
        let numerator = lhs.checked_add(rhs).ok_or(LayoutError::Overflow)?;
        let denominator = i64::from(self.denominator) * i64::from(other.denominator);
        let offset = i64::from(self.offset) + i64::from(other.offset) * sign;
        reduced(numerator, denominator, offset)
    }
}

pub(crate) fn gcd(m: i64, n: i64) -> i64 {
    let (mut m, mut n) = (m.abs(), n.abs());
    while n != 0 {
        (m, n) = (n, m % n);
    }
    m
}

/// Builds an attachment in lowest terms with a positive denominator.
fn reduced(numerator: i64, denominator: i64, offset: i64) -> Result<Attachment> {
    if denominator == 0 {
        return Err(LayoutError::ZeroDenominator);
    }
    let divisor = gcd(denominator, numerator) * denominator.signum();
    Ok(Attachment {
        numerator: narrow(numerator / divisor)?,
        denominator: narrow(denominator / divisor)?,
        offset: narrow(offset)?,
        anchor: None,
    })
}

fn narrow(value: i64) -> Result<i32> { i32::try_from(value).map_err(|_| LayoutError::Overflow) }
