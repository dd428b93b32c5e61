// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use common::{common::width::Width, numutil::NumExt};

const PAGE_SHIFT: u64 = 12;
const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
const PAGE_MASK: u64 = PAGE_SIZE as u64 - 1;

/// Guest RAM. Pages are only allocated once written, so that large
/// configured sizes cost nothing until the guest touches them.
/// Untouched memory reads as zero.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    base: u64,
    size: u64,
    pages: BTreeMap<u64, Box<[u8]>>,
}

impl Memory {
    pub fn new(base: u64, size: u64) -> Self {
        Self {
            base,
            size,
            pages: BTreeMap::new(),
        }
    }

    /// Is the whole access inside RAM?
    pub fn contains(&self, addr: u64, width: Width) -> bool {
        addr >= self.base
            && addr
                .checked_add(width.size().u64())
                .is_some_and(|end| end <= self.base + self.size)
    }

    /// Read a little-endian value. The caller checks [Memory::contains].
    pub fn read(&self, addr: u64, width: Width) -> u64 {
        let mut value = 0;
        for idx in (0..width.size().u64()).rev() {
            value = (value << 8) | self.byte(addr + idx).u64();
        }
        value
    }

    /// Write a little-endian value. The caller checks [Memory::contains].
    pub fn write(&mut self, addr: u64, value: u64, width: Width) {
        for idx in 0..width.size().u64() {
            self.set_byte(addr + idx, (value >> (idx * 8)) as u8);
        }
    }

    /// Amount of pages that were written to.
    pub fn allocated_pages(&self) -> usize {
        self.pages.len()
    }

    fn byte(&self, addr: u64) -> u8 {
        let offset = addr - self.base;
        self.pages
            .get(&(offset >> PAGE_SHIFT))
            .map_or(0, |page| page[(offset & PAGE_MASK).us()])
    }

    fn set_byte(&mut self, addr: u64, value: u8) {
        let offset = addr - self.base;
        let page = self
            .pages
            .entry(offset >> PAGE_SHIFT)
            .or_insert_with(|| vec![0; PAGE_SIZE].into_boxed_slice());
        page[(offset & PAGE_MASK).us()] = value;
    }
}
