// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use common::components::{scheduler::Kind, timer::TimerService};

use crate::{props::PropertyError, Mytest};

/// Overridable behaviour of a mytest device.
/// Types building on the device implement this, override what they need
/// and call into the base [Mytest] for the rest.
pub trait MytestClass<E: Kind> {
    fn device(&self) -> &Mytest<E>;
    fn device_mut(&mut self) -> &mut Mytest<E>;

    /// Public extension point. Does nothing on the base device.
    fn method(&mut self) {}

    /// Reset, as called on board reset.
    fn reset(&mut self, timers: &mut dyn TimerService<E>) {
        self.device_mut().reset(timers);
    }

    /// Finish construction, after properties were set.
    fn realize(&mut self) -> Result<(), PropertyError> {
        self.device_mut().realize()
    }
}

impl<E: Kind> MytestClass<E> for Mytest<E> {
    fn device(&self) -> &Mytest<E> {
        self
    }

    fn device_mut(&mut self) -> &mut Mytest<E> {
        self
    }
}

/// Call the device's [MytestClass::method].
pub fn mytest_method<E: Kind>(obj: &mut (impl MytestClass<E> + ?Sized)) {
    obj.method();
}

/// Reset the device independently of a full board reset.
pub fn mytest_reset<E: Kind>(
    obj: &mut (impl MytestClass<E> + ?Sized),
    timers: &mut dyn TimerService<E>,
) {
    obj.reset(timers);
}
