// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use diagnostics::Diagnostics;
use options::SystemConfig;

pub mod diagnostics;
pub mod options;
pub mod width;

/// Common fields shared by all boards.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Common {
    #[cfg_attr(feature = "serde", serde(skip))]
    #[cfg_attr(feature = "serde", serde(default))]
    pub diagnostics: Arc<Diagnostics>,
    pub config: SystemConfig,
    /// If the board is currently advancing time. Cleared by the pause event.
    pub ticking: bool,
}

impl Common {
    pub fn with_config(config: SystemConfig) -> Self {
        Self {
            diagnostics: Arc::new(Diagnostics::with_level(config.diagnostic_level)),
            config,
            ticking: false,
        }
    }

    /// Take over the parts of an old instance that are not part of
    /// saved state.
    pub fn restore_from(&mut self, old: Self) {
        self.diagnostics = old.diagnostics;
        self.config = old.config;
    }
}
