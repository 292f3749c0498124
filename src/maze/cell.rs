use std::fmt;

/// State of a single grid cell.
///
/// The discriminants are the codes stored in `.lab` files.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// A built wall: the grid border, an island or a cell raised during generation.
    Wall,
    /// An open cell.
    #[default]
    Free,
    /// An open cell on which a wall can currently be raised.
    Constructible,
}

impl Cell {
    pub const WALL_CODE: i32 = 0;
    pub const FREE_CODE: i32 = 1;
    pub const CONSTRUCTIBLE_CODE: i32 = -1;

    pub fn code(self) -> i32 {
        match self {
            Cell::Wall => Self::WALL_CODE,
            Cell::Free => Self::FREE_CODE,
            Cell::Constructible => Self::CONSTRUCTIBLE_CODE,
        }
    }

    /// Only `Wall` blocks; both open states look the same to the constructibility check.
    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

/// Error returned when decoding a cell code that is not one of the three valid ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid cell code {0}")]
pub struct InvalidCellCode(pub i32);

impl TryFrom<i32> for Cell {
    type Error = InvalidCellCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            Cell::WALL_CODE => Ok(Cell::Wall),
            Cell::FREE_CODE => Ok(Cell::Free),
            Cell::CONSTRUCTIBLE_CODE => Ok(Cell::Constructible),
            other => Err(InvalidCellCode(other)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Cell::Wall => '#',
            Cell::Free => ' ',
            Cell::Constructible => '+',
        };
        write!(f, "{}", symbol)
    }
}
