use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};

use super::in_bounds;

/// Player record stored per participant.
///
/// Records are created on admission and never removed, even after the player wins.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Player {
    /// Index into the flattened grid.
    pub position: u32,
    pub has_participated: bool,
}

impl Player {
    /// A freshly admitted player standing on the origin cell.
    pub fn new() -> Self {
        Self {
            position: 0,
            has_participated: true,
        }
    }
}

impl Write for Player {
    fn write(&self, writer: &mut impl BufMut) {
        self.position.write(writer);
        self.has_participated.write(writer);
    }
}

impl Read for Player {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let position = u32::read(reader)?;
        if !in_bounds(position) {
            return Err(Error::Invalid("Player", "position outside grid"));
        }
        Ok(Self {
            position,
            has_participated: bool::read(reader)?,
        })
    }
}

impl EncodeSize for Player {
    fn encode_size(&self) -> usize {
        self.position.encode_size() + self.has_participated.encode_size()
    }
}
