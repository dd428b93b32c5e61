// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A bank of level-triggered interrupt inputs, as seen from the interrupt
/// controller. Devices drive single pins through [IrqLine] handles;
/// the board reads the levels.
#[derive(Debug)]
pub struct IrqPins {
    levels: Box<[AtomicBool]>,
}

impl IrqPins {
    /// Create a bank of the given amount of pins, all deasserted.
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            levels: (0..count).map(|_| AtomicBool::new(false)).collect(),
        })
    }

    /// Restore a bank from saved levels.
    pub fn from_levels(levels: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            levels: levels.iter().map(|l| AtomicBool::new(*l)).collect(),
        })
    }

    /// Get a handle driving the given pin.
    /// Pins outside the bank yield a disconnected line.
    pub fn line(self: &Arc<Self>, pin: usize) -> IrqLine {
        if pin < self.levels.len() {
            IrqLine {
                target: Some((Arc::clone(self), pin)),
            }
        } else {
            log::warn!("IRQ pin {pin} does not exist, leaving line disconnected");
            IrqLine::default()
        }
    }

    /// Level of the given pin. Unknown pins read as deasserted.
    pub fn level(&self, pin: usize) -> bool {
        self.levels
            .get(pin)
            .is_some_and(|l| l.load(Ordering::Acquire))
    }

    /// All currently asserted pins, in ascending order.
    pub fn raised(&self) -> Vec<usize> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.load(Ordering::Acquire))
            .map(|(pin, _)| pin)
            .collect()
    }

    /// Snapshot of every pin's level.
    pub fn levels(&self) -> Vec<bool> {
        self.levels.iter().map(|l| l.load(Ordering::Acquire)).collect()
    }
}

/// A device's interrupt output, connected to one input of an [IrqPins]
/// bank. A default line is not connected to anything, and driving it
/// does nothing.
#[derive(Debug, Clone, Default)]
pub struct IrqLine {
    target: Option<(Arc<IrqPins>, usize)>,
}

impl IrqLine {
    /// Drive the line to the given level.
    pub fn set(&self, level: bool) {
        if let Some((pins, pin)) = &self.target {
            pins.levels[*pin].store(level, Ordering::Release);
        }
    }

    #[inline]
    pub fn raise(&self) {
        self.set(true);
    }

    #[inline]
    pub fn lower(&self) {
        self.set(false);
    }

    /// Current level of the line. Disconnected lines are always low.
    pub fn is_raised(&self) -> bool {
        self.target
            .as_ref()
            .is_some_and(|(pins, pin)| pins.level(*pin))
    }

    pub fn is_connected(&self) -> bool {
        self.target.is_some()
    }
}
