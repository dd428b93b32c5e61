// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

//! An i.MX6 SABRE Lite style board carrying a mytest device.
//! Only the parts needed to drive the device are modelled: guest RAM,
//! the interrupt controller's input pins and the virtual clock.

use std::sync::Arc;

use addr::*;
use common::{
    common::{options::SystemConfig, Common},
    components::{irq::IrqPins, scheduler::Scheduler},
    misc::StateError,
    Time, NANOSECONDS_PER_SECOND,
};
use memory::Memory;
use mytest::{Mytest, MytestClass, PropertyError, TYPE_MYTEST};
pub use scheduling::SabreEvent;
use thiserror::Error;

pub mod addr;
mod io;
pub mod memory;
mod scheduling;

pub use io::EVT_UNASSIGNED;

/// Board struct. Contains all state and is used for system emulation.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Sabrelite {
    pub mytest: Mytest<SabreEvent>,
    pub memory: Memory,
    #[cfg_attr(feature = "serde", serde(with = "irq_pins"))]
    irq: Arc<IrqPins>,

    scheduler: Scheduler<SabreEvent>,
    pub c: Common,
}

impl Sabrelite {
    /// Build the board from the given configuration.
    /// Device properties from the configuration's globals are applied
    /// before the devices are realized.
    pub fn new(config: &SystemConfig) -> Result<Box<Self>, BoardError> {
        if config.ram_size > MMDC_SIZE {
            return Err(BoardError::RamTooLarge {
                size: config.ram_size,
                max: MMDC_SIZE,
            });
        }
        if MMDC_ADDR + config.ram_size > MYTEST_ADDR {
            return Err(BoardError::RamOverlapsDevice {
                size: config.ram_size,
                device: MYTEST_ADDR,
            });
        }
        if let Some(global) = config.globals.iter().find(|g| g.driver != TYPE_MYTEST) {
            return Err(BoardError::UnknownDriver(global.driver.clone()));
        }

        let c = Common::with_config(config.clone());
        let irq = IrqPins::new(NUM_IRQ_PINS);

        let mut mytest =
            Mytest::new(SabreEvent::MytestTimer).with_diagnostics(Arc::clone(&c.diagnostics));
        for global in config.globals_for(TYPE_MYTEST) {
            mytest.set_property(&global.property, &global.value)?;
        }
        mytest.connect_irq(irq.line(MYTEST_IRQ));
        MytestClass::realize(&mut mytest)?;

        log::info!(
            "sabrelite: {} MiB RAM at 0x{MMDC_ADDR:08X}, {TYPE_MYTEST} at 0x{MYTEST_ADDR:08X} (IRQ {MYTEST_IRQ})",
            config.ram_size >> 20
        );
        Ok(Box::new(Self {
            mytest,
            memory: Memory::new(MMDC_ADDR, config.ram_size),
            irq,
            scheduler: Scheduler::default(),
            c,
        }))
    }

    /// Advance the virtual clock by the given delta in seconds,
    /// handling every event that becomes due on the way.
    /// The clock stops at `Time::MAX`.
    pub fn advance_delta(&mut self, delta: f64) {
        let target = (delta * NANOSECONDS_PER_SECOND as f64).round();
        if target < 0.0 {
            log::warn!("sabrelite: refusing to advance by negative delta {delta}s");
            return;
        }
        self.run_until(self.now().saturating_add(target as Time));
    }

    /// Advance the virtual clock to the given time. Does nothing
    /// if that time has already passed.
    pub fn advance_to(&mut self, time: Time) {
        if time >= self.now() {
            self.run_until(time);
        }
    }

    /// Handle the next event, moving the clock forward to it.
    pub fn advance(&mut self) {
        match self.scheduler.pop() {
            Some(evt) => evt.kind.dispatch(self, evt.late_by),
            None => self.c.ticking = false,
        }
    }

    fn run_until(&mut self, time: Time) {
        self.scheduler.schedule_at(SabreEvent::PauseEmulation, time);
        self.c.ticking = true;
        while self.c.ticking {
            self.advance();
        }
        // Events due at the exact pause time still belong to this step
        while let Some(evt) = self.scheduler.get_next_pending() {
            evt.kind.dispatch(self, evt.late_by);
        }
    }

    /// Current virtual clock time.
    pub fn now(&self) -> Time {
        self.scheduler.now()
    }

    /// Level of an interrupt controller input.
    pub fn irq_level(&self, pin: usize) -> bool {
        self.irq.level(pin)
    }

    /// All asserted interrupt controller inputs.
    pub fn raised_irqs(&self) -> Vec<usize> {
        self.irq.raised()
    }

    /// Amount of pending scheduler events.
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// Reset the machine. Devices go back to their reset state,
    /// the clock keeps running and RAM contents are kept.
    pub fn reset(&mut self) {
        log::info!("sabrelite: machine reset");
        mytest::mytest_reset(&mut self.mytest, &mut self.scheduler);
        self.scheduler.cancel(SabreEvent::PauseEmulation);
        self.c.ticking = false;
    }

    /// Invoke the mytest device's class method.
    pub fn mytest_method(&mut self) {
        mytest::mytest_method(&mut self.mytest);
    }

    /// Create a save state that can be loaded with [Sabrelite::load_state].
    #[cfg(feature = "serde")]
    pub fn save_state(&self) -> Result<Vec<u8>, BoardError> {
        Ok(common::misc::serialize(
            self,
            self.c.config.compress_savestates,
        )?)
    }

    /// Load a state produced by [Sabrelite::save_state].
    /// Will keep the current configuration and diagnostics.
    #[cfg(feature = "serde")]
    pub fn load_state(&mut self, state: &[u8]) -> Result<(), BoardError> {
        let new: Self = common::misc::deserialize(state, self.c.config.compress_savestates)?;
        let old_self = std::mem::replace(self, new);
        self.restore_from(old_self);
        Ok(())
    }

    /// Take over state that is not part of save states from an old
    /// instance, and reconnect the devices to this instance's wiring.
    pub fn restore_from(&mut self, old_self: Self) {
        self.c.restore_from(old_self.c);
        self.mytest.set_diagnostics(Arc::clone(&self.c.diagnostics));
        self.mytest.connect_irq(self.irq.line(MYTEST_IRQ));
    }
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("RAM size above max supported: 0x{size:X} > 0x{max:X}")]
    RamTooLarge { size: u64, max: u64 },
    #[error("RAM size 0x{size:X} overlaps device region at 0x{device:08X}")]
    RamOverlapsDevice { size: u64, device: u64 },
    #[error("no device driver named '{0}'")]
    UnknownDriver(String),
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// Interrupt levels are saved as plain levels and get a fresh bank
/// on load.
#[cfg(feature = "serde")]
mod irq_pins {
    use std::sync::Arc;

    use common::components::irq::IrqPins;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(pins: &Arc<IrqPins>, ser: S) -> Result<S::Ok, S::Error> {
        pins.levels().serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Arc<IrqPins>, D::Error> {
        let levels = Vec::<bool>::deserialize(de)?;
        Ok(IrqPins::from_levels(&levels))
    }
}

#[cfg(test)]
mod tests;
