use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use std::fmt;

use super::{GRID_CELLS, GRID_SIZE};

/// Row of a flattened grid position.
pub const fn row(position: u32) -> u32 {
    position / GRID_SIZE
}

/// Column of a flattened grid position.
pub const fn column(position: u32) -> u32 {
    position % GRID_SIZE
}

/// Whether `position` addresses a cell on the grid.
pub const fn in_bounds(position: u32) -> bool {
    position < GRID_CELLS
}

/// Direction of a single move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell reached by moving one step from `position`, or `None` if the step leaves the grid.
    ///
    /// Horizontal steps never wrap onto the neighbouring row: moving left from column 0 or right
    /// from the last column is out of bounds even though the raw index would still be valid.
    pub fn step(self, position: u32) -> Option<u32> {
        if !in_bounds(position) {
            return None;
        }
        let next = match self {
            Self::Up => position.checked_sub(GRID_SIZE)?,
            Self::Down => position.checked_add(GRID_SIZE)?,
            Self::Left if column(position) == 0 => return None,
            Self::Left => position - 1,
            Self::Right if column(position) == GRID_SIZE - 1 => return None,
            Self::Right => position + 1,
        };
        in_bounds(next).then_some(next)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Direction {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Up),
            1 => Ok(Self::Down),
            2 => Ok(Self::Left),
            3 => Ok(Self::Right),
            i => Err(i),
        }
    }
}

impl Write for Direction {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Direction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        Self::try_from(value).map_err(Error::InvalidEnum)
    }
}

impl FixedSize for Direction {
    const SIZE: usize = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_from_origin() {
        assert_eq!(Direction::Up.step(0), None);
        assert_eq!(Direction::Left.step(0), None);
        assert_eq!(Direction::Down.step(0), Some(GRID_SIZE));
        assert_eq!(Direction::Right.step(0), Some(1));
    }

    #[test]
    fn test_step_never_wraps_rows() {
        let last_column = GRID_SIZE - 1;
        for r in 0..GRID_SIZE {
            let left_edge = r * GRID_SIZE;
            let right_edge = left_edge + last_column;
            assert_eq!(Direction::Left.step(left_edge), None);
            assert_eq!(Direction::Right.step(right_edge), None);
        }
    }

    #[test]
    fn test_step_bottom_row() {
        let bottom_left = GRID_CELLS - GRID_SIZE;
        assert_eq!(Direction::Down.step(bottom_left), None);
        assert_eq!(Direction::Down.step(GRID_CELLS - 1), None);
        assert_eq!(Direction::Up.step(bottom_left), Some(bottom_left - GRID_SIZE));
    }

    #[test]
    fn test_step_rejects_off_grid_origin() {
        for direction in Direction::ALL {
            assert_eq!(direction.step(GRID_CELLS), None);
        }
    }

    #[test]
    fn test_row_and_column() {
        assert_eq!((row(0), column(0)), (0, 0));
        assert_eq!((row(GRID_SIZE + 1), column(GRID_SIZE + 1)), (1, 1));
        assert_eq!(
            (row(GRID_CELLS - 1), column(GRID_CELLS - 1)),
            (GRID_SIZE - 1, GRID_SIZE - 1)
        );
    }
}
