// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use common::common::{diagnostics::Severity, width::Width};

use crate::{addr::*, Sabrelite};

/// Diagnostic event type for accesses nothing is mapped at.
pub const EVT_UNASSIGNED: &str = "unassigned-access";

impl Sabrelite {
    /// Read from the system bus.
    /// Unassigned addresses read 0.
    pub fn read(&self, addr: u64, width: Width) -> u64 {
        match addr {
            MYTEST_ADDR..=MYTEST_LAST => self.mytest.read(addr - MYTEST_ADDR, width.size()),
            _ if self.memory.contains(addr, width) => self.memory.read(addr, width),
            _ => {
                self.unassigned("read", addr, width);
                0
            }
        }
    }

    /// Write to the system bus. The value is truncated to the access width.
    /// Writes to unassigned addresses are dropped.
    pub fn write(&mut self, addr: u64, value: u64, width: Width) {
        let value = value & width.mask();
        match addr {
            MYTEST_ADDR..=MYTEST_LAST => {
                self.mytest
                    .write(&mut self.scheduler, addr - MYTEST_ADDR, value, width.size())
            }
            _ if self.memory.contains(addr, width) => self.memory.write(addr, value, width),
            _ => self.unassigned("write", addr, width),
        }
    }

    fn unassigned(&self, kind: &str, addr: u64, width: Width) {
        self.c.diagnostics.log(
            EVT_UNASSIGNED,
            format!("{kind} of {width:?} at unassigned address 0x{addr:08X}"),
            Severity::Warning,
        );
    }
}
