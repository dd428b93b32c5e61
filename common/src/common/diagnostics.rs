// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use std::{fmt, sync::Mutex, time::Instant};

/// Collector for diagnostic events raised by the board and its devices,
/// most importantly guest errors like invalid register accesses.
/// Every logged event is also forwarded to the `log` facade.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// The diagnostic level that is currently enabled.
    /// Any diagnostic events with a severity lower than this will not be
    /// recorded, but are still passed on to `log`.
    pub diagnostic_level: Severity,
    /// Diagnostic events that have occurred.
    pub diagnostic_events: Mutex<Vec<DiagnosticEvent>>,
}

impl Diagnostics {
    pub fn with_level(diagnostic_level: Severity) -> Self {
        Self {
            diagnostic_level,
            ..Default::default()
        }
    }

    /// Log a diagnostic event that occured, recording it if the
    /// corresponding level is enabled.
    pub fn log(&self, evt_type: &str, event: String, severity: Severity) {
        log::log!(severity.log_level(), "{evt_type}: {event}");
        if severity >= self.diagnostic_level && severity != Severity::None {
            self.events().push(DiagnosticEvent {
                evt_type: evt_type.to_string(),
                event,
                severity,
                time: Instant::now(),
            });
        }
    }

    /// Log a guest error: an access by emulated software that the
    /// hardware does not support.
    pub fn guest_error(&self, evt_type: &str, event: String) {
        self.log(evt_type, event, Severity::Warning);
    }

    /// Take all recorded events, leaving the list empty.
    pub fn take_events(&self) -> Vec<DiagnosticEvent> {
        std::mem::take(&mut *self.events())
    }

    /// Amount of recorded events of the given type.
    pub fn count(&self, evt_type: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.evt_type == evt_type)
            .count()
    }

    fn events(&self) -> std::sync::MutexGuard<'_, Vec<DiagnosticEvent>> {
        // A poisoned list only means a panic happened while pushing; the
        // events themselves are still intact.
        self.diagnostic_events
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

/// A diagnostic event that might be interesting during debugging.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// The type of the event.
    pub evt_type: String,
    /// The display message of what occurred.
    pub event: String,
    /// The severity of the event.
    pub severity: Severity,
    /// The time the event occurred .
    pub time: Instant,
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.severity, self.evt_type, self.event)
    }
}

/// The severity of a diagnostic event.
/// Event severity is decided by the system and can be used to filter.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde_config", derive(serde::Deserialize, serde::Serialize))]
#[repr(C)]
pub enum Severity {
    Debug = 0,
    Info = 10,
    #[default]
    Warning = 100,
    Error = 1000,
    None = 10000,
}

impl Severity {
    fn log_level(self) -> log::Level {
        match self {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error | Severity::None => log::Level::Error,
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some((*self as u32).cmp(&(*other as u32)))
    }
}
