// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

//! This crate contains structures shared by the board and its devices:
//! the virtual clock, interrupt lines, diagnostics and configuration.

pub use components::scheduler::{Time, TimeS};

pub mod common;
pub mod components;
pub mod misc;
pub mod numutil;

/// Nanoseconds in one second of virtual time.
pub const NANOSECONDS_PER_SECOND: Time = 1_000_000_000;
