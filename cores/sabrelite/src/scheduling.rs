// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use common::{components::scheduler::Kind, TimeS};
use SabreEvent::*;

use crate::Sabrelite;

/// All scheduler events on the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u16)]
pub enum SabreEvent {
    /// Pause the emulation. Used by `advance_delta` to advance by a certain
    /// amount.
    #[default]
    PauseEmulation,
    /// The mytest device's interrupt timer expired.
    MytestTimer,
}

impl SabreEvent {
    /// Handle the event by delegating to the appropriate handler.
    pub fn dispatch(self, sb: &mut Sabrelite, late_by: TimeS) {
        match self {
            PauseEmulation => sb.c.ticking = false,
            MytestTimer => {
                if late_by > 0 {
                    log::trace!("mytest timer handled {late_by}ns late");
                }
                sb.mytest.timer_expired(&mut sb.scheduler);
            }
        }
    }
}

impl Kind for SabreEvent {}
