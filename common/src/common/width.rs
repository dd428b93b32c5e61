// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

/// Width of a value to be read/written from memory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Halfword,
    #[default]
    Word,
    Doubleword,
}

impl Width {
    /// Returns the size of the values represented by this width.
    pub fn size(&self) -> u32 {
        match self {
            Width::Byte => 1,
            Width::Halfword => 2,
            Width::Word => 4,
            Width::Doubleword => 8,
        }
    }

    /// Returns the mask for the width, to be applied when working with values
    /// of this width.
    pub fn mask(&self) -> u64 {
        match self {
            Width::Byte => 0xFF,
            Width::Halfword => 0xFFFF,
            Width::Word => 0xFFFF_FFFF,
            Width::Doubleword => u64::MAX,
        }
    }

    /// Get the width for an access of the given amount of bytes.
    pub fn from_size(size: u32) -> Option<Width> {
        match size {
            1 => Some(Width::Byte),
            2 => Some(Width::Halfword),
            4 => Some(Width::Word),
            8 => Some(Width::Doubleword),
            _ => None,
        }
    }
}
