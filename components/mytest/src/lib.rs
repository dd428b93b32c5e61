// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

//! The mytest device: a single 32-bit register mapped on the system bus
//! that can raise a delayed interrupt.
//!
//! Writes to the register are commands:
//! - `0` clears the interrupt and cancels a pending one,
//! - `1` requests an interrupt half a second of virtual time later;
//!   the register then reads as [SENTINEL] until the next write,
//! - anything else is stored incremented by one.

use std::sync::Arc;

use common::{
    common::diagnostics::Diagnostics,
    components::{
        irq::IrqLine,
        scheduler::{Kind, Time},
        timer::{OneShotTimer, TimerService},
    },
    numutil::NumExt,
    NANOSECONDS_PER_SECOND,
};

pub use class::{mytest_method, mytest_reset, MytestClass};
pub use props::{help, MytestProps, PropertyError, PropertyInfo, PROPERTIES};

mod class;
mod props;

/// Name of the device type, used for properties and diagnostics.
pub const TYPE_MYTEST: &str = "mytest";
/// Size of the device's I/O region.
pub const MMIO_SIZE: u64 = 4;
/// Register value while an interrupt is requested.
pub const SENTINEL: u32 = 0xFFFF_FFFF;
/// Delay between requesting an interrupt and it being raised.
pub const IRQ_DELAY: Time = NANOSECONDS_PER_SECOND / 2;

/// Diagnostic event type for accesses not aligned to the register.
pub const EVT_UNALIGNED: &str = "mytest-unaligned-access";
/// Diagnostic event type for accesses past the register.
pub const EVT_OUT_OF_RANGE: &str = "mytest-offset-out-of-range";

/// State of a mytest device.
/// `E` is the event the owning board's scheduler uses for this device's
/// timer; the board routes it back to [Mytest::timer_expired].
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Mytest<E: Kind> {
    data: u32,
    #[cfg_attr(feature = "serde", serde(bound = ""))]
    timer: OneShotTimer<E>,
    #[cfg_attr(feature = "serde", serde(skip))]
    irq: IrqLine,
    pub props: MytestProps,
    realized: bool,
    state: MytestState,

    #[cfg_attr(feature = "serde", serde(skip))]
    diagnostics: Arc<Diagnostics>,
}

/// State of the device, as set by the last transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MytestState {
    /// Reset, realized or cleared with a zero write.
    Idle,
    /// An interrupt was requested and is waiting for the timer.
    ArmedPending,
    /// The timer fired and the interrupt is asserted.
    Fired,
    /// A value other than 0 or 1 was written and stored incremented.
    Counting,
}

impl<E: Kind> Mytest<E> {
    /// Create a device whose timer fires the given event.
    /// The register is zero, the timer is not armed and the interrupt
    /// output is not connected yet.
    pub fn new(timer_event: E) -> Self {
        log::debug!("{TYPE_MYTEST}: init");
        Self {
            data: 0,
            timer: OneShotTimer::new(timer_event),
            irq: IrqLine::default(),
            props: MytestProps::default(),
            realized: false,
            state: MytestState::Idle,
            diagnostics: Arc::default(),
        }
    }

    /// Report guest errors to the given diagnostics instead of a private one.
    pub fn with_diagnostics(mut self, diagnostics: Arc<Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn set_diagnostics(&mut self, diagnostics: Arc<Diagnostics>) {
        self.diagnostics = diagnostics;
    }

    /// Connect the interrupt output.
    pub fn connect_irq(&mut self, irq: IrqLine) {
        self.irq = irq;
    }

    /// Set a property. Only possible before the device is realized.
    pub fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        if self.realized {
            return Err(PropertyError::Realized(name.to_string()));
        }
        self.props.set(name, value)
    }

    /// Finish construction: load the register from the properties.
    pub fn realize(&mut self) -> Result<(), PropertyError> {
        if self.realized {
            return Err(PropertyError::AlreadyRealized);
        }
        log::debug!("{TYPE_MYTEST}: realize");
        self.data = self.props.data;
        self.realized = true;
        self.state = MytestState::Idle;
        Ok(())
    }

    /// Guest read from the I/O region.
    pub fn read(&self, offset: u64, size: u32) -> u64 {
        if !offset.is_aligned(4) {
            self.diagnostics.guest_error(
                EVT_UNALIGNED,
                format!("[{TYPE_MYTEST}] read: only aligned access allowed, offset 0x{offset:X}"),
            );
            return 0;
        }

        match offset {
            0 => {
                log::debug!("{TYPE_MYTEST}: read(offset=0x{offset:X}, size={size})");
                self.data.u64()
            }
            _ => {
                self.diagnostics.guest_error(
                    EVT_OUT_OF_RANGE,
                    format!("[{TYPE_MYTEST}] read: offset 0x{offset:X} out of range"),
                );
                0
            }
        }
    }

    /// Guest write to the I/O region.
    pub fn write(
        &mut self,
        timers: &mut (impl TimerService<E> + ?Sized),
        offset: u64,
        value: u64,
        size: u32,
    ) {
        if !offset.is_aligned(4) {
            self.diagnostics.guest_error(
                EVT_UNALIGNED,
                format!("[{TYPE_MYTEST}] write: only aligned access allowed, offset 0x{offset:X}"),
            );
            return;
        }

        match offset {
            0 => {
                self.data = u32::from_u64(value);
                match self.data {
                    0 => {
                        log::debug!("{TYPE_MYTEST}: clear IRQ");
                        self.timer.cancel(timers);
                        self.irq.lower();
                        self.state = MytestState::Idle;
                    }
                    1 => {
                        self.data = SENTINEL;
                        log::debug!("{TYPE_MYTEST}: raise postponed");
                        let deadline = timers.now().saturating_add(IRQ_DELAY);
                        self.timer.arm(timers, deadline);
                        self.state = MytestState::ArmedPending;
                    }
                    _ => {
                        self.data = self.data.wrapping_add(1);
                        self.state = MytestState::Counting;
                    }
                }
                log::debug!(
                    "{TYPE_MYTEST}: write(offset=0x{offset:X}, size={size}, value=0x{:08X})",
                    self.data
                );
            }
            _ => {
                self.diagnostics.guest_error(
                    EVT_OUT_OF_RANGE,
                    format!("[{TYPE_MYTEST}] write: offset 0x{offset:X} out of range"),
                );
            }
        }
    }

    /// The timer's deadline passed: raise the interrupt.
    /// Expiries for a timer that is no longer armed are ignored.
    pub fn timer_expired(&mut self, timers: &mut (impl TimerService<E> + ?Sized)) {
        if !self.timer.expire(timers.now()) {
            log::debug!("{TYPE_MYTEST}: ignoring stale timer expiry");
            return;
        }
        log::debug!("{TYPE_MYTEST}: timer expired, raise IRQ");
        self.irq.raise();
        self.state = MytestState::Fired;
    }

    /// Return to the reset state: register at its configured value,
    /// no pending timer and the interrupt deasserted.
    pub fn reset(&mut self, timers: &mut (impl TimerService<E> + ?Sized)) {
        log::debug!("{TYPE_MYTEST}: reset");
        self.data = self.props.data;
        // Reset always deasserts the interrupt
        self.timer.cancel(timers);
        self.irq.lower();
        self.state = MytestState::Idle;
    }

    /// Tear the device down, releasing its timer.
    pub fn finalize(self, timers: &mut (impl TimerService<E> + ?Sized)) {
        log::debug!("{TYPE_MYTEST}: finalize");
        self.timer.release(timers);
    }

    /// Current register value.
    pub fn data(&self) -> u32 {
        self.data
    }

    pub fn is_realized(&self) -> bool {
        self.realized
    }

    pub fn irq(&self) -> &IrqLine {
        &self.irq
    }

    pub fn is_irq_raised(&self) -> bool {
        self.irq.is_raised()
    }

    /// Deadline of the pending interrupt, if one is requested.
    pub fn pending_deadline(&self) -> Option<Time> {
        self.timer.deadline()
    }

    /// State entered by the last write, timer expiry or reset.
    pub fn state(&self) -> MytestState {
        self.state
    }
}
