use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One edge of a control. Left and top are the leading edges of their axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    pub fn orientation(self) -> Orientation {
        match self {
            Side::Left | Side::Right => Orientation::Horizontal,
            Side::Top | Side::Bottom => Orientation::Vertical,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    pub fn is_leading(self) -> bool { matches!(self, Side::Left | Side::Top) }

    pub fn leading(orientation: Orientation) -> Side {
        match orientation {
            Orientation::Horizontal => Side::Left,
            Orientation::Vertical => Side::Top,
        }
    }

    pub fn trailing(orientation: Orientation) -> Side { Side::leading(orientation).opposite() }
}

/// Which part of a referenced control an attachment pegs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Alignment {
    /// The side of the referenced control adjacent to the attached side.
    #[default]
    Default,
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

impl Alignment {
    /// Whether this alignment names the same edge as `side`. Edges of the
    /// other axis never match and fall back to the adjacent side.
    pub fn is_edge(self, side: Side) -> bool {
        matches!(
            (self, side),
            (Alignment::Left, Side::Left)
                | (Alignment::Right, Side::Right)
                | (Alignment::Top, Side::Top)
                | (Alignment::Bottom, Side::Bottom)
        )
    }
}
