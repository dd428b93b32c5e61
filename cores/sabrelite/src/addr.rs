// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

//! Memory map and interrupt assignments of the board.

/// Start of the DDR window served by the memory controller.
pub const MMDC_ADDR: u64 = 0x1000_0000;
/// Size of the DDR window; the most RAM the board supports.
pub const MMDC_SIZE: u64 = 0xF000_0000;

/// Base of the mytest device's I/O region.
pub const MYTEST_ADDR: u64 = MMDC_ADDR + 0x4000_0000;
/// Last address of the mytest device's I/O region.
pub const MYTEST_LAST: u64 = MYTEST_ADDR + mytest::MMIO_SIZE - 1;
/// Interrupt controller input the mytest device is wired to.
pub const MYTEST_IRQ: usize = 42;

/// Amount of interrupt inputs on the interrupt controller.
pub const NUM_IRQ_PINS: usize = 160;
